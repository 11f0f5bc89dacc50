//! Candidate series for responsive images
//!
//! The width series grows geometrically from [`MIN_WIDTH`] to [`MAX_WIDTH`]
//! so that two neighbouring candidates never differ by more than twice the
//! increment percentage. Each value is rounded to the nearest even number;
//! the accumulator itself stays unrounded, so rounding never compounds.

use crate::error::UrlError;

/// Smallest generated width in pixels
pub const MIN_WIDTH: u32 = 100;

/// Largest generated width in pixels, always the last element
pub const MAX_WIDTH: u32 = 8192;

/// Half of the growth factor between two neighbouring widths
pub const INCREMENT_PERCENTAGE: f64 = 0.08;

/// Device pixel ratios emitted when a dimension is fixed
pub const DPR_SERIES: [u32; 5] = [1, 2, 3, 4, 5];

/// Quality paired with each entry of [`DPR_SERIES`] when variable quality is on
pub const DPR_QUALITIES: [u32; 5] = [75, 50, 35, 23, 20];

/// Upper bound on generated widths for a custom range
pub const MAX_SERIES_LEN: usize = 1000;

/// The canonical width series: 31 widths from 100 to 8192
pub fn target_widths() -> Vec<u32> {
    generate(MIN_WIDTH, MAX_WIDTH, INCREMENT_PERCENTAGE)
}

/// Width series for a custom range and increment
pub fn target_widths_between(
    min_width: u32,
    max_width: u32,
    increment_percentage: f64,
) -> Result<Vec<u32>, UrlError> {
    if min_width == 0 {
        return Err(UrlError::invalid_width_range(
            min_width,
            max_width,
            "min width must be positive",
        ));
    }
    if min_width > max_width {
        return Err(UrlError::invalid_width_range(
            min_width,
            max_width,
            "min width must not exceed max width",
        ));
    }
    if !increment_percentage.is_finite() || increment_percentage <= 0.0 {
        return Err(UrlError::invalid_width_range(
            min_width,
            max_width,
            format!("increment must be positive, got {}", increment_percentage),
        ));
    }

    let growth = 1.0 + increment_percentage * 2.0;
    if growth <= 1.0 {
        return Err(UrlError::invalid_width_range(
            min_width,
            max_width,
            format!("increment {} is too small to grow", increment_percentage),
        ));
    }

    let steps = (f64::from(max_width) / f64::from(min_width)).ln() / growth.ln();
    if steps > MAX_SERIES_LEN as f64 {
        return Err(UrlError::invalid_width_range(
            min_width,
            max_width,
            format!(
                "increment {} would need more than {} widths",
                increment_percentage, MAX_SERIES_LEN
            ),
        ));
    }

    Ok(generate(min_width, max_width, increment_percentage))
}

fn generate(min_width: u32, max_width: u32, increment_percentage: f64) -> Vec<u32> {
    let growth = 1.0 + increment_percentage * 2.0;
    let max = f64::from(max_width);

    let mut widths = Vec::new();
    let mut current = f64::from(min_width);

    while current < max {
        let width = round_to_even(current);
        // tiny increments can round two steps onto the same value
        if widths.last() != Some(&width) {
            widths.push(width);
        }
        current *= growth;
    }

    if widths.last() != Some(&max_width) {
        widths.push(max_width);
    }

    widths
}

fn round_to_even(value: f64) -> u32 {
    ((value / 2.0).round() * 2.0) as u32
}
