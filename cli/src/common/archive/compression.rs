//! # EvType Compression Utilities (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! ## Overview
//!
//! Gzip helpers for uploaded datasets. Uploads are held entirely in memory,
//! so everything here works on byte slices rather than files.
//!
//! Inflation is always bounded: a small upload can expand by a factor of a
//! thousand or more, so callers pass the largest output they will accept.
//!
//! ```rust
//! if compression::is_gzip(&bytes) {
//!     let raw = compression::decompress_gzip(&bytes, MAX_INFLATED_BYTES)?;
//! }
//! ```
//!
use crate::core::error::{EvError, Result};
use anyhow::Context;
use flate2::read::GzDecoder;
use std::io::Read;

/// The two magic bytes every gzip member starts with.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns `true` if `data` starts with the gzip magic bytes.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Inflates a gzip stream held in memory.
///
/// ## Arguments
///
/// * `data`: the compressed bytes.
/// * `limit`: the largest inflated size, in bytes, that is accepted.
///
/// ## Returns
///
/// * `Result<Vec<u8>>`: the inflated bytes, at most `limit` of them.
///
/// ## Errors
///
/// Returns an `Err` if `data` is not a valid gzip stream, is truncated, or
/// inflates to more than `limit` bytes (`EvError::Dataset`).
pub fn decompress_gzip(data: &[u8], limit: u64) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .context("Failed to decompress gzip data")?;
    if out.len() as u64 > limit {
        return Err(EvError::Dataset(format!(
            "Decompressed data exceeds the limit of {} bytes.",
            limit
        ))
        .into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_decompress_gzip() -> Result<()> {
        let compressed = gzip(b"Make,Model\nTESLA,Model 3\n");
        assert!(is_gzip(&compressed));
        assert_eq!(
            decompress_gzip(&compressed, 1024)?,
            b"Make,Model\nTESLA,Model 3\n"
        );
        Ok(())
    }

    #[test]
    fn test_plain_text_is_not_gzip() {
        assert!(!is_gzip(b"Make,Model\n"));
        assert!(!is_gzip(b""));
    }

    #[test]
    fn test_truncated_gzip_fails() {
        let compressed = gzip(b"some longer payload that will be cut short");
        let truncated = &compressed[..compressed.len() / 2];
        assert!(decompress_gzip(truncated, 1024).is_err());
    }

    #[test]
    fn test_inflation_beyond_limit_is_rejected() {
        // 4 MiB of zeros compresses to a few KiB.
        let compressed = gzip(&vec![0u8; 4 * 1024 * 1024]);
        assert!(compressed.len() < 64 * 1024);

        let err = decompress_gzip(&compressed, 1024 * 1024).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvError>(),
            Some(EvError::Dataset(message)) if message.contains("1048576")
        ));
    }

    #[test]
    fn test_output_exactly_at_limit_is_accepted() -> Result<()> {
        let compressed = gzip(&[b'x'; 100]);
        assert_eq!(decompress_gzip(&compressed, 100)?.len(), 100);
        assert!(decompress_gzip(&compressed, 99).is_err());
        Ok(())
    }
}
