// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::UrlError;
use crate::signing::SignatureAlgorithm;
use crate::srcset::SrcsetOptions;
use crate::url::validate_domain;

/// Settings for one [`UrlBuilder`](crate::url::UrlBuilder)
///
/// ```yaml
/// domain: "test.imgix.net"
/// use_https: true
/// sign_key: "${IMGIX_TOKEN}"
/// srcset:
///   variable_quality: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// CDN host name, without scheme or path
    pub domain: String,

    /// Use https URLs (default: true)
    #[serde(default = "default_use_https")]
    pub use_https: bool,

    /// Shared secret used to sign URLs; unset or empty disables signing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_key: Option<String>,

    /// Digest used for signatures (default: md5)
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,

    /// Append the `ixlib` parameter to every URL (default: true)
    #[serde(default = "default_include_library_param")]
    pub include_library_param: bool,

    /// Candidate set tuning
    #[serde(default)]
    pub srcset: SrcsetOptions,
}

fn default_use_https() -> bool {
    true
}

fn default_include_library_param() -> bool {
    true
}

impl BuilderConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            use_https: default_use_https(),
            sign_key: None,
            signature_algorithm: SignatureAlgorithm::default(),
            include_library_param: default_include_library_param(),
            srcset: SrcsetOptions::default(),
        }
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, UrlError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| UrlError::Config(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(UrlError::Config(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        serde_yaml::from_str(&substituted).map_err(|e| UrlError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, UrlError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| UrlError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), UrlError> {
        validate_domain(&self.domain)?;
        self.srcset.resolve_widths()?;
        Ok(())
    }
}
