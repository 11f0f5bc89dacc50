// imgix-url: signed CDN URLs and responsive srcset candidates

pub mod config;
pub mod error;
pub mod logging;
pub mod signing;
pub mod srcset;
pub mod url;

pub use config::BuilderConfig;
pub use error::UrlError;
pub use signing::{verify_signature, SignatureAlgorithm};
pub use srcset::{build_srcset, build_srcset_with, Candidate, Descriptor, Srcset, SrcsetOptions};
pub use url::{ParameterMap, SignedUrlBuilder, UrlBuilder};
