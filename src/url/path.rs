//! Source path encoding

use crate::error::UrlError;

/// Encode a source path for use in a CDN URL
///
/// - Plain paths (`image.jpg`, `/dir/a b.png`) have every segment
///   percent-encoded and always start with `/`.
/// - Web-proxy paths (`http://...`, `https://...`) are encoded as a single
///   component, so the whole upstream URL becomes one path segment.
pub fn encode_path(path: &str) -> Result<String, UrlError> {
    if path.is_empty() {
        return Err(UrlError::InvalidPath);
    }

    let trimmed = path.strip_prefix('/').unwrap_or(path);

    if is_proxy_source(trimmed) {
        return Ok(format!("/{}", urlencoding::encode(trimmed)));
    }

    let encoded = trimmed
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    Ok(format!("/{}", encoded))
}

fn is_proxy_source(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
