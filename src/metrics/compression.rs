//! Screenshot compressibility probe
//!
//! Re-encodes a lossless screenshot as JPEG at a fixed quality and reports the
//! fractional size reduction. The transient encoding lives in an owned buffer
//! that is released on every exit path, so concurrent probes of different
//! records cannot collide on a shared artifact.

use crate::io::error::{EvalError, Result};
use image::codecs::jpeg::JpegEncoder;

/// Outcome of one compressibility probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionProbe {
    /// Fractional size reduction: `1 - lossy / lossless`
    ///
    /// At most 1.0; negative when the lossy re-encoding is larger than the
    /// lossless source.
    pub ratio: f64,
    /// Byte size of the lossless source image
    pub lossless_bytes: u64,
    /// Byte size of the lossy re-encoding
    pub lossy_bytes: u64,
}

/// Re-encode lossless image bytes as JPEG and measure the size reduction
///
/// The alpha channel is discarded before encoding since JPEG carries none.
/// A zero-size source yields ratio 0.0 instead of a division error.
///
/// # Errors
///
/// Returns an error if the source bytes fail to decode or the JPEG encoding
/// fails. Callers treat either case as the probe being unavailable for the
/// record; the record's remaining metrics still compute.
pub fn probe(lossless: &[u8], quality: u8) -> Result<CompressionProbe> {
    let decoded = image::load_from_memory(lossless).map_err(|e| EvalError::Image {
        operation: "screenshot decode",
        source: e,
    })?;
    let rgb = decoded.to_rgb8();

    let mut encoded: Vec<u8> = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| EvalError::Image {
            operation: "lossy re-encode",
            source: e,
        })?;

    let lossless_bytes = lossless.len() as u64;
    let lossy_bytes = encoded.len() as u64;
    let ratio = if lossless_bytes == 0 {
        0.0
    } else {
        1.0 - lossy_bytes as f64 / lossless_bytes as f64
    };

    Ok(CompressionProbe {
        ratio,
        lossless_bytes,
        lossy_bytes,
    })
}
