//! Query string serialization
//!
//! Parameters are written in key order. Values are percent-encoded, except
//! for `:` and `,` which the CDN reads literally (`ar=3:2`, `rect=0,0,10,10`).
//! Keys ending in `64` carry a base64url value without padding instead.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::ParameterMap;

/// Suffix marking a parameter whose value is base64url encoded
const BASE64_SUFFIX: &str = "64";

/// Serialize parameters into `k=v&k=v` form (no leading `?`)
pub fn encode_query(params: &ParameterMap) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_key(key), encode_value(key, value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

fn encode_value(key: &str, value: &str) -> String {
    if key.ends_with(BASE64_SUFFIX) {
        URL_SAFE_NO_PAD.encode(value.as_bytes())
    } else {
        urlencoding::encode(value)
            .replace("%3A", ":")
            .replace("%2C", ",")
    }
}
