// Srcset tests: width series, DPR series and signatures of every candidate

use imgix_url::srcset::{target_widths, Descriptor, SrcsetMode};
use imgix_url::{ParameterMap, Srcset, UrlBuilder, UrlError};
use md5::{Digest, Md5};
use rstest::rstest;

const TOKEN: &str = "MYT0KEN";

const TARGET_WIDTHS: [u32; 31] = [
    100, 116, 134, 156, 182, 210, 244, 282, 328, 380, 442, 512, 594, 688, 798, 926, 1074, 1246,
    1446, 1678, 1946, 2258, 2618, 3038, 3524, 4088, 4742, 5500, 6380, 7400, 8192,
];

fn signed_builder() -> UrlBuilder {
    UrlBuilder::new("test.imgix.net")
        .expect("valid domain")
        .with_https(true)
        .with_sign_key(TOKEN)
        .with_library_param(false)
}

fn params(pairs: &[(&str, &str)]) -> ParameterMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn srcset_for(pairs: &[(&str, &str)]) -> Srcset {
    imgix_url::build_srcset(&signed_builder(), "image.jpg", &params(pairs))
        .expect("srcset builds")
}

fn width_of(descriptor: &Descriptor) -> u32 {
    match descriptor {
        Descriptor::Width(width) => *width,
        Descriptor::Density(_) => panic!("expected a width descriptor, got {}", descriptor),
    }
}

/// Recompute md5(token + path + "?" + query-without-s) and compare with `s=`
fn assert_signed(url: &str) {
    let sig_start = url.find("s=").expect("url carries a signature");
    let generated = &url[sig_start + 2..];

    let query_start = url.find('?').expect("url has a query");
    let parameters = &url[query_start..sig_start - 1];
    let base = format!("{}/image.jpg{}", TOKEN, parameters);

    let expected = hex::encode(Md5::digest(base.as_bytes()));
    assert_eq!(generated, expected, "bad signature on {}", url);
}

#[test]
fn test_no_parameters_generates_correct_widths() {
    let widths: Vec<u32> = srcset_for(&[])
        .iter()
        .map(|c| width_of(&c.descriptor))
        .collect();
    assert_eq!(widths, TARGET_WIDTHS.to_vec());
}

#[test]
fn test_no_parameters_returns_expected_number_of_pairs() {
    let srcset = srcset_for(&[]);
    assert_eq!(srcset.len(), 31);
    assert_eq!(srcset.mode(), SrcsetMode::Widths);
    assert_eq!(srcset.to_string().split(", ").count(), 31);
}

#[test]
fn test_no_parameters_does_not_exceed_bounds() {
    let srcset = srcset_for(&[]);
    let candidates = srcset.candidates();
    assert_eq!(candidates[0].descriptor.to_string(), "100w");
    assert_eq!(candidates[30].descriptor.to_string(), "8192w");
}

// a 17% threshold absorbs the rounding to even widths
#[test]
fn test_no_parameters_does_not_increase_more_than_17_percent() {
    let widths: Vec<u32> = srcset_for(&[])
        .iter()
        .map(|c| width_of(&c.descriptor))
        .collect();
    for pair in widths.windows(2) {
        assert!(f64::from(pair[1]) / f64::from(pair[0]) < 1.17);
    }
}

#[test]
fn test_no_parameters_signs_urls() {
    for candidate in &srcset_for(&[]) {
        assert_signed(&candidate.url);
    }
}

#[test]
fn test_no_parameters_urls_carry_width() {
    for (candidate, width) in srcset_for(&[]).iter().zip(target_widths()) {
        assert!(candidate.url.contains(&format!("w={}", width)));
    }
}

#[test]
fn test_rendered_format() {
    let srcset = srcset_for(&[]);
    let rendered = srcset.to_string();
    let first = &srcset.candidates()[0];

    assert!(rendered.starts_with(&format!("{} 100w, ", first.url)));
    assert!(rendered.ends_with(" 8192w"));
    assert!(!rendered.ends_with(", "));
}

#[rstest]
#[case::width(&[("w", "300")])]
#[case::height(&[("h", "300")])]
#[case::aspect_ratio(&[("ar", "3:2")])]
#[case::width_and_height(&[("w", "300"), ("h", "300")])]
#[case::width_and_aspect_ratio(&[("w", "300"), ("ar", "3:2")])]
#[case::height_and_aspect_ratio(&[("h", "300"), ("ar", "3:2")])]
#[case::width_height_and_aspect_ratio(&[("w", "300"), ("h", "300"), ("ar", "3:2")])]
fn test_fixed_dimensions_in_dpr_form(#[case] pairs: &[(&str, &str)]) {
    let srcset = srcset_for(pairs);
    assert_eq!(srcset.mode(), SrcsetMode::DevicePixelRatio);

    let descriptors: Vec<String> = srcset.iter().map(|c| c.descriptor.to_string()).collect();
    assert_eq!(descriptors, vec!["1x", "2x", "3x", "4x", "5x"]);
}

#[rstest]
#[case::width(&[("w", "300")])]
#[case::height(&[("h", "300")])]
#[case::aspect_ratio(&[("ar", "3:2")])]
#[case::width_and_height(&[("w", "300"), ("h", "300")])]
#[case::width_and_aspect_ratio(&[("w", "300"), ("ar", "3:2")])]
#[case::height_and_aspect_ratio(&[("h", "300"), ("ar", "3:2")])]
#[case::width_height_and_aspect_ratio(&[("w", "300"), ("h", "300"), ("ar", "3:2")])]
fn test_fixed_dimensions_sign_urls(#[case] pairs: &[(&str, &str)]) {
    for candidate in &srcset_for(pairs) {
        assert_signed(&candidate.url);
    }
}

#[rstest]
#[case::width(&[("w", "300")])]
#[case::height(&[("h", "300")])]
#[case::aspect_ratio(&[("ar", "3:2")])]
#[case::width_and_height(&[("w", "300"), ("h", "300")])]
#[case::width_and_aspect_ratio(&[("w", "300"), ("ar", "3:2")])]
#[case::height_and_aspect_ratio(&[("h", "300"), ("ar", "3:2")])]
#[case::width_height_and_aspect_ratio(&[("w", "300"), ("h", "300"), ("ar", "3:2")])]
fn test_fixed_dimensions_include_dpr_and_keep_dimensions(#[case] pairs: &[(&str, &str)]) {
    for (idx, candidate) in srcset_for(pairs).iter().enumerate() {
        assert!(candidate.url.contains(&format!("dpr={}", idx + 1)));
        for (key, value) in pairs {
            assert!(
                candidate.url.contains(&format!("{}={}", key, value)),
                "{} missing {}={}",
                candidate.url,
                key,
                value
            );
        }
    }
}

#[test]
fn test_passthrough_params_on_every_candidate() {
    for candidate in &srcset_for(&[("fm", "webp"), ("auto", "format")]) {
        assert!(candidate.url.contains("fm=webp"));
        assert!(candidate.url.contains("auto=format"));
    }
}

#[test]
fn test_srcset_is_idempotent() {
    let builder = signed_builder();
    let caller = params(&[("h", "300"), ("ar", "3:2")]);
    let first = builder.create_srcset("image.jpg", &caller).unwrap();
    let second = builder.create_srcset("image.jpg", &caller).unwrap();
    assert_eq!(first, second);

    let first = builder.create_srcset("image.jpg", &ParameterMap::new()).unwrap();
    let second = builder.create_srcset("image.jpg", &ParameterMap::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_create_srcset_matches_structured_rendering() {
    let builder = signed_builder();
    let caller = params(&[("w", "300")]);
    let joined = builder.create_srcset("image.jpg", &caller).unwrap();
    let structured = imgix_url::build_srcset(&builder, "image.jpg", &caller).unwrap();
    assert_eq!(joined, structured.to_string());
}

#[test]
fn test_invalid_path_produces_no_srcset() {
    let result = signed_builder().create_srcset("", &ParameterMap::new());
    assert_eq!(result, Err(UrlError::InvalidPath));
}

#[test]
fn test_unsigned_builder_omits_signature() {
    let builder = UrlBuilder::new("test.imgix.net")
        .unwrap()
        .with_library_param(false);
    for candidate in &imgix_url::build_srcset(&builder, "image.jpg", &ParameterMap::new()).unwrap()
    {
        assert!(!candidate.url.contains("s="));
    }
}

#[test]
fn test_builder_shared_across_threads() {
    let builder = std::sync::Arc::new(signed_builder());
    let expected = builder.create_srcset("image.jpg", &ParameterMap::new()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let builder = builder.clone();
            std::thread::spawn(move || {
                builder
                    .create_srcset("image.jpg", &ParameterMap::new())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
