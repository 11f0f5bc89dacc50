//! Responsive image candidate sets
//!
//! Produces the value of an HTML `srcset` attribute for one source image.
//!
//! # Modes
//!
//! ## Width series
//! When the caller fixes none of `w`, `h` or `ar`, one candidate is emitted
//! per width of the series, each carrying `w={width}`:
//! ```text
//! https://host/image.jpg?w=100 100w, https://host/image.jpg?w=116 116w, ...
//! ```
//!
//! ## Device pixel ratio
//! When any of `w`, `h` or `ar` is given, the dimensions are kept verbatim
//! and five candidates are emitted with `dpr=1..5`:
//! ```text
//! https://host/image.jpg?dpr=1&w=300 1x, https://host/image.jpg?dpr=2&w=300 2x, ...
//! ```

pub mod widths;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::UrlError;
use crate::url::{ParameterMap, SignedUrlBuilder};

pub use widths::{
    target_widths, target_widths_between, DPR_QUALITIES, DPR_SERIES, INCREMENT_PERCENTAGE,
    MAX_WIDTH, MIN_WIDTH,
};

/// Parameters that switch the candidate set into DPR mode
pub const FIXED_DIMENSION_PARAMS: [&str; 3] = ["w", "h", "ar"];

const WIDTH_PARAM: &str = "w";
const DPR_PARAM: &str = "dpr";
const QUALITY_PARAM: &str = "q";

/// Tuning for generated candidate sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrcsetOptions {
    /// First width of a generated series
    #[serde(default = "default_min_width")]
    pub min_width: u32,

    /// Last width of a generated series
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    /// Half of the growth factor between neighbouring widths
    #[serde(default = "default_width_tolerance")]
    pub width_tolerance: f64,

    /// Explicit widths, used instead of a generated series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<u32>>,

    /// Lower the quality as the DPR grows (only when the caller set no `q`)
    #[serde(default)]
    pub variable_quality: bool,
}

impl Default for SrcsetOptions {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            max_width: MAX_WIDTH,
            width_tolerance: INCREMENT_PERCENTAGE,
            widths: None,
            variable_quality: false,
        }
    }
}

fn default_min_width() -> u32 {
    MIN_WIDTH
}

fn default_max_width() -> u32 {
    MAX_WIDTH
}

fn default_width_tolerance() -> f64 {
    INCREMENT_PERCENTAGE
}

impl SrcsetOptions {
    /// Widths used in width-series mode, sorted and without duplicates
    pub fn resolve_widths(&self) -> Result<Vec<u32>, UrlError> {
        if let Some(explicit) = &self.widths {
            let mut widths = explicit.clone();
            widths.sort_unstable();
            widths.dedup();
            return match (widths.first(), widths.last()) {
                (Some(&0), Some(&max)) => Err(UrlError::invalid_width_range(
                    0,
                    max,
                    "widths must be positive",
                )),
                (Some(_), Some(_)) => Ok(widths),
                _ => Err(UrlError::invalid_width_range(0, 0, "widths must not be empty")),
            };
        }

        target_widths_between(self.min_width, self.max_width, self.width_tolerance)
    }
}

/// Size hint following a URL in a srcset entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    /// Intrinsic width in pixels, rendered `{n}w`
    Width(u32),
    /// Pixel density multiplier, rendered `{n}x`
    Density(u32),
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Width(width) => write!(f, "{}w", width),
            Descriptor::Density(ratio) => write!(f, "{}x", ratio),
        }
    }
}

/// One srcset entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub descriptor: Descriptor,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.url, self.descriptor)
    }
}

/// Which series a candidate set was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrcsetMode {
    Widths,
    DevicePixelRatio,
}

impl SrcsetMode {
    /// Pick the mode for a caller parameter map
    pub fn for_params(params: &ParameterMap) -> Self {
        if FIXED_DIMENSION_PARAMS
            .iter()
            .any(|key| params.contains_key(*key))
        {
            SrcsetMode::DevicePixelRatio
        } else {
            SrcsetMode::Widths
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Widths => "widths",
            Self::DevicePixelRatio => "dpr",
        }
    }
}

/// Ordered candidate set; `Display` renders the attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Srcset {
    mode: SrcsetMode,
    candidates: Vec<Candidate>,
}

impl Srcset {
    pub fn mode(&self) -> SrcsetMode {
        self.mode
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl IntoIterator for Srcset {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a Srcset {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl fmt::Display for Srcset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, candidate) in self.candidates.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", candidate)?;
        }
        Ok(())
    }
}

/// Build the candidate set for `path` with the default options
pub fn build_srcset<B>(builder: &B, path: &str, params: &ParameterMap) -> Result<Srcset, UrlError>
where
    B: SignedUrlBuilder + ?Sized,
{
    build_srcset_with(builder, path, params, &SrcsetOptions::default())
}

/// Build the candidate set for `path`
///
/// The caller's map is copied per candidate; the key driving the series
/// (`w` or `dpr`) is inserted last and always wins. The first URL builder
/// error aborts the whole set.
pub fn build_srcset_with<B>(
    builder: &B,
    path: &str,
    params: &ParameterMap,
    options: &SrcsetOptions,
) -> Result<Srcset, UrlError>
where
    B: SignedUrlBuilder + ?Sized,
{
    let mode = SrcsetMode::for_params(params);

    let candidates = match mode {
        SrcsetMode::Widths => width_candidates(builder, path, params, options)?,
        SrcsetMode::DevicePixelRatio => dpr_candidates(builder, path, params, options)?,
    };

    debug!(
        path = %path,
        mode = mode.as_str(),
        candidates = candidates.len(),
        "Built srcset"
    );

    Ok(Srcset { mode, candidates })
}

fn width_candidates<B>(
    builder: &B,
    path: &str,
    params: &ParameterMap,
    options: &SrcsetOptions,
) -> Result<Vec<Candidate>, UrlError>
where
    B: SignedUrlBuilder + ?Sized,
{
    let mut base = params.clone();
    // a caller dpr would make the w descriptors lie
    base.remove(DPR_PARAM);

    options
        .resolve_widths()?
        .into_iter()
        .map(|width| {
            let mut candidate_params = base.clone();
            candidate_params.insert(WIDTH_PARAM.to_string(), width.to_string());

            let url = builder.build_signed_url(path, &candidate_params)?;
            trace!(width, url = %url, "srcset width candidate");

            Ok(Candidate {
                url,
                descriptor: Descriptor::Width(width),
            })
        })
        .collect()
}

fn dpr_candidates<B>(
    builder: &B,
    path: &str,
    params: &ParameterMap,
    options: &SrcsetOptions,
) -> Result<Vec<Candidate>, UrlError>
where
    B: SignedUrlBuilder + ?Sized,
{
    let vary_quality = options.variable_quality && !params.contains_key(QUALITY_PARAM);

    DPR_SERIES
        .iter()
        .zip(DPR_QUALITIES.iter())
        .map(|(&ratio, &quality)| {
            let mut candidate_params = params.clone();
            candidate_params.insert(DPR_PARAM.to_string(), ratio.to_string());
            if vary_quality {
                candidate_params.insert(QUALITY_PARAM.to_string(), quality.to_string());
            }

            let url = builder.build_signed_url(path, &candidate_params)?;
            trace!(dpr = ratio, url = %url, "srcset density candidate");

            Ok(Candidate {
                url,
                descriptor: Descriptor::Density(ratio),
            })
        })
        .collect()
}
