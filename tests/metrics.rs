//! Validates information metrics, the compressibility probe, and composite scoring

use gridscore::eval::record::Component;
use gridscore::grid::assign::ScreenResolution;
use gridscore::metrics::compression;
use gridscore::metrics::information;
use gridscore::metrics::score::ScoreWeights;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

fn component_with_tag(tag: &str) -> Component {
    Component {
        tag: tag.to_string(),
        text: String::new(),
        role: String::new(),
        class: String::new(),
        x: 0,
        y: 0,
        width: 100,
        height: 50,
        annotation: None,
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[test]
fn test_entropy_zero_for_single_tag_type() {
    let components = vec![
        component_with_tag("div"),
        component_with_tag("DIV"),
        component_with_tag("Div"),
    ];

    // Case-insensitive: three spellings of one tag carry no information
    assert!(information::tag_entropy(&components).abs() < f64::EPSILON);
}

#[test]
fn test_entropy_one_bit_for_two_equal_tags() {
    let components = vec![
        component_with_tag("div"),
        component_with_tag("button"),
        component_with_tag("div"),
        component_with_tag("button"),
    ];

    assert!((information::tag_entropy(&components) - 1.0).abs() < 1e-12);
}

#[test]
fn test_entropy_of_empty_input() {
    assert!(information::tag_entropy(&[]).abs() < f64::EPSILON);
}

#[test]
fn test_entropy_maximal_for_uniform_tags() {
    let components = vec![
        component_with_tag("div"),
        component_with_tag("button"),
        component_with_tag("input"),
        component_with_tag("img"),
    ];

    // Four equally frequent tags carry exactly two bits
    assert!((information::tag_entropy(&components) - 2.0).abs() < 1e-12);
}

#[test]
fn test_density_over_reference_screen() {
    let screen = ScreenResolution::new(1920, 1080);
    let density = information::component_density(10, screen);

    assert!((density - 10.0 / 2_073_600.0).abs() < 1e-15);
}

#[test]
fn test_bbox_coverage_may_exceed_one() {
    let screen = ScreenResolution::new(1920, 1080);
    let full_screen = Component {
        width: 1920,
        height: 1080,
        ..component_with_tag("div")
    };
    let components = vec![full_screen.clone(), full_screen];

    let coverage = information::bbox_coverage(&components, screen);
    assert!((coverage - 2.0).abs() < 1e-12);
}

#[test]
fn test_default_weights_sum_to_one() {
    let weights = ScoreWeights::default();
    assert!((weights.sum() - 1.0).abs() < 1e-12);
    weights.validate().unwrap();
}

#[test]
fn test_invalid_weights_are_rejected() {
    let weights = ScoreWeights {
        hit_rate: 0.5,
        ..ScoreWeights::default()
    };
    assert!(weights.validate().is_err());
}

#[test]
fn test_score_reduces_to_hit_rate_weight() {
    let weights = ScoreWeights::default();

    // With full density the sparsity term vanishes, leaving only the
    // hit-rate term
    let score = weights.score(1.0, 1.0, 0.0, 0.0, Some(0.0));
    assert!((score - 0.30).abs() < 1e-12);

    // At zero density the sparsity term contributes its full weight
    let score_sparse = weights.score(1.0, 0.0, 0.0, 0.0, Some(0.0));
    assert!((score_sparse - 0.50).abs() < 1e-12);
}

#[test]
fn test_unavailable_compression_substitutes_zero() {
    let weights = ScoreWeights::default();

    let degraded = weights.score(0.8, 0.1, 1.5, 0.4, None);
    let explicit_zero = weights.score(0.8, 0.1, 1.5, 0.4, Some(0.0));
    assert!((degraded - explicit_zero).abs() < f64::EPSILON);
}

#[test]
fn test_compression_probe_measures_size_reduction() {
    let bytes = png_bytes(128, 128);
    let probe = compression::probe(&bytes, 85).unwrap();

    assert_eq!(probe.lossless_bytes, bytes.len() as u64);
    assert!(probe.lossy_bytes > 0);
    assert!(probe.ratio <= 1.0);

    let expected = 1.0 - probe.lossy_bytes as f64 / probe.lossless_bytes as f64;
    assert!((probe.ratio - expected).abs() < f64::EPSILON);
}

#[test]
fn test_compression_probe_is_deterministic() {
    let bytes = png_bytes(64, 64);

    let first = compression::probe(&bytes, 85).unwrap();
    let second = compression::probe(&bytes, 85).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compression_probe_rejects_undecodable_bytes() {
    assert!(compression::probe(b"not an image", 85).is_err());
    assert!(compression::probe(&[], 85).is_err());
}
