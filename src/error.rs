// Error types module

use thiserror::Error;

/// Errors produced while building, signing or verifying URLs
///
/// Every failure is returned to the caller of the operation that hit it;
/// nothing is retried and no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The source path was empty
    #[error("Invalid path: path must not be empty")]
    InvalidPath,

    /// The configured domain is not a bare host name
    #[error("Invalid domain '{domain}': expected a host name without scheme, port or path")]
    InvalidDomain { domain: String },

    /// A custom srcset width range cannot produce a series
    #[error("Invalid width range {min}..{max}: {reason}")]
    InvalidWidthRange { min: u32, max: u32, reason: String },

    /// The digest could not be computed
    #[error("Signing failed: {message}")]
    Signing { message: String },

    /// A URL handed to verification could not be taken apart
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Configuration errors (invalid YAML, missing env vars, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UrlError {
    pub fn invalid_domain(domain: impl Into<String>) -> Self {
        UrlError::InvalidDomain {
            domain: domain.into(),
        }
    }

    pub fn invalid_width_range(min: u32, max: u32, reason: impl Into<String>) -> Self {
        UrlError::InvalidWidthRange {
            min,
            max,
            reason: reason.into(),
        }
    }

    pub fn signing(message: impl Into<String>) -> Self {
        UrlError::Signing {
            message: message.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        UrlError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
