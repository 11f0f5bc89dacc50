//! Single URL construction
//!
//! Builds one absolute CDN URL from a source path and a parameter map:
//! ```text
//! https://{domain}{encoded path}?{query}&s={signature}
//! ```
//!
//! The query is serialized in key order, the library parameter is added when
//! enabled, and the signature (if a sign key is configured) always comes last.

pub mod path;
pub mod query;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::BuilderConfig;
use crate::error::UrlError;
use crate::signing::{self, SignatureAlgorithm, SIGNATURE_PARAM};
use crate::srcset::{self, SrcsetOptions};

pub use path::encode_path;
pub use query::encode_query;

/// Caller-supplied transformation parameters, keyed by parameter name
pub type ParameterMap = BTreeMap<String, String>;

/// Name of the parameter identifying the client library
pub const LIBRARY_PARAM: &str = "ixlib";

/// Value of the library parameter
pub const LIBRARY_VERSION: &str = concat!("rust-", env!("CARGO_PKG_VERSION"));

/// Builds one signed URL for a path and parameter map
///
/// This is the seam the srcset builder consumes; tests substitute their own
/// implementation to observe the per-candidate parameters.
pub trait SignedUrlBuilder {
    fn build_signed_url(&self, path: &str, params: &ParameterMap) -> Result<String, UrlError>;
}

/// URL builder bound to one CDN domain
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    domain: String,
    use_https: bool,
    sign_key: Option<String>,
    algorithm: SignatureAlgorithm,
    include_library_param: bool,
    srcset_options: SrcsetOptions,
}

impl UrlBuilder {
    /// Create a builder for `domain` using https, no signing and the
    /// library parameter enabled
    pub fn new(domain: impl Into<String>) -> Result<Self, UrlError> {
        let domain = domain.into();
        validate_domain(&domain)?;

        Ok(Self {
            domain,
            use_https: true,
            sign_key: None,
            algorithm: SignatureAlgorithm::default(),
            include_library_param: true,
            srcset_options: SrcsetOptions::default(),
        })
    }

    /// Create a builder from a loaded configuration
    pub fn from_config(config: &BuilderConfig) -> Result<Self, UrlError> {
        let builder = Self::new(config.domain.clone())?
            .with_https(config.use_https)
            .with_algorithm(config.signature_algorithm)
            .with_library_param(config.include_library_param)
            .with_srcset_options(config.srcset.clone());

        Ok(match &config.sign_key {
            Some(key) => builder.with_sign_key(key.clone()),
            None => builder,
        })
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Sign every URL with `key`; an empty key disables signing
    pub fn with_sign_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.sign_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_library_param(mut self, include: bool) -> Self {
        self.include_library_param = include;
        self
    }

    pub fn with_srcset_options(mut self, options: SrcsetOptions) -> Self {
        self.srcset_options = options;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn is_signed(&self) -> bool {
        self.sign_key.is_some()
    }

    pub fn srcset_options(&self) -> &SrcsetOptions {
        &self.srcset_options
    }

    /// Build one absolute URL for `path` with `params`
    pub fn create_url(&self, path: &str, params: &ParameterMap) -> Result<String, UrlError> {
        let encoded_path = encode_path(path)?;

        let query = if self.include_library_param {
            let mut with_lib = params.clone();
            with_lib.insert(LIBRARY_PARAM.to_string(), LIBRARY_VERSION.to_string());
            encode_query(&with_lib)
        } else {
            encode_query(params)
        };

        let mut url = format!("{}://{}{}", self.scheme(), self.domain, encoded_path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        if let Some(key) = &self.sign_key {
            let signature = signing::sign(self.algorithm, key, &encoded_path, &query)?;
            url.push(if query.is_empty() { '?' } else { '&' });
            url.push_str(SIGNATURE_PARAM);
            url.push('=');
            url.push_str(&signature);
        }

        Ok(url)
    }

    /// Build the `srcset` attribute value for `path` with `params`
    pub fn create_srcset(&self, path: &str, params: &ParameterMap) -> Result<String, UrlError> {
        srcset::build_srcset_with(self, path, params, &self.srcset_options)
            .map(|srcset| srcset.to_string())
    }

    fn scheme(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }
}

impl SignedUrlBuilder for UrlBuilder {
    fn build_signed_url(&self, path: &str, params: &ParameterMap) -> Result<String, UrlError> {
        self.create_url(path, params)
    }
}

/// Longest host name DNS allows
const MAX_DOMAIN_LEN: usize = 253;

fn domain_pattern() -> Result<&'static Regex, UrlError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(?:[a-z0-9_-]{1,62}\.)+[a-z0-9]{1,63}$"))
        .as_ref()
        .map_err(|e| UrlError::Config(format!("domain pattern: {}", e)))
}

/// Reject domains carrying a scheme, port, path or uppercase letters
pub fn validate_domain(domain: &str) -> Result<(), UrlError> {
    if domain.len() <= MAX_DOMAIN_LEN && domain_pattern()?.is_match(domain) {
        Ok(())
    } else {
        Err(UrlError::invalid_domain(domain))
    }
}
