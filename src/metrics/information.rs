//! Information-theoretic layout metrics over a component set

use crate::eval::record::Component;
use crate::grid::assign::ScreenResolution;
use std::collections::HashMap;

/// Shannon entropy (base 2) of the tag-type distribution
///
/// Tags are compared case-insensitively. The entropy is maximal when all
/// distinct tags are equally frequent and zero when only one tag type is
/// present. An empty component set has entropy 0.0.
pub fn tag_entropy(components: &[Component]) -> f64 {
    if components.is_empty() {
        return 0.0;
    }

    let mut tag_frequencies: HashMap<String, usize> = HashMap::new();
    for component in components {
        *tag_frequencies.entry(component.tag.to_lowercase()).or_insert(0) += 1;
    }

    let total = components.len() as f64;
    let mut weighted_log_sum = 0.0;
    for frequency in tag_frequencies.values() {
        let probability = *frequency as f64 / total;
        weighted_log_sum = probability.mul_add(probability.log2(), weighted_log_sum);
    }

    -weighted_log_sum
}

/// Component count normalized by screen area
///
/// A zero-area screen yields 0.0 rather than a division error; geometry
/// validation upstream makes that case unreachable in normal operation.
pub const fn component_density(component_count: usize, screen: ScreenResolution) -> f64 {
    let area = screen.area();
    if area == 0 {
        return 0.0;
    }
    component_count as f64 / area as f64
}

/// Summed component bounding-box area over screen area
///
/// Overlapping boxes are counted once each, so the ratio may exceed 1.0.
/// That is intentional: heavy overlap is itself a layout signal.
pub fn bbox_coverage(components: &[Component], screen: ScreenResolution) -> f64 {
    let area = screen.area();
    if area == 0 {
        return 0.0;
    }

    let summed: u64 = components
        .iter()
        .map(|c| u64::from(c.width) * u64::from(c.height))
        .sum();

    summed as f64 / area as f64
}
