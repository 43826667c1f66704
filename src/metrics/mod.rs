//! Per-record layout metrics
//!
//! Information-theoretic measures over the component set, the screenshot
//! compressibility probe, and the weighted composite score that combines them.

/// Screenshot re-encoding probe for image compressibility
pub mod compression;
/// Tag entropy, component density, and bounding-box coverage
pub mod information;
/// Weighted composite layout-quality score
pub mod score;

pub use compression::CompressionProbe;
pub use score::ScoreWeights;
