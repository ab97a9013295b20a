//! # EvType TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! Pulls the dataset out of an uploaded tar archive. The archive is read from
//! memory with the `tar` crate; the first regular file whose name ends in
//! `.csv` (case-insensitive) is returned. Hidden files and macOS resource forks
//! (`._name.csv`, `__MACOSX/`) are skipped.
//!
//! Gzipped tarballs are expected to be inflated first with
//! `compression::decompress_gzip`.
//!
//! ```rust
//! let csv_bytes = tar::extract_first_csv(&tar_bytes, MAX_INFLATED_BYTES)?;
//! ```
//!
use crate::core::error::{EvError, Result};
use anyhow::Context;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Finds the dataset inside a tar archive held in memory.
///
/// ## Arguments
///
/// * `tar_bytes`: the uncompressed archive.
/// * `limit`: the largest entry size, in bytes, that is accepted.
///
/// ## Returns
///
/// * `Result<Option<(String, Vec<u8>)>>`: the entry name and contents of the
///   first `.csv` file, or `None` if there is no such entry.
///
/// ## Errors
///
/// Returns an `Err` if the bytes are not a readable tar archive, or if the
/// selected entry is larger than `limit` (`EvError::Dataset`).
pub fn extract_first_csv(tar_bytes: &[u8], limit: u64) -> Result<Option<(String, Vec<u8>)>> {
    let mut archive = tar::Archive::new(tar_bytes);
    let entries = archive
        .entries()
        .context("Failed to read tar archive entries")?;

    for entry_result in entries {
        let mut entry = entry_result.context("Failed to read tar archive entry")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry
            .path()
            .context("Tar entry has an invalid path")?
            .into_owned();
        if !is_dataset_entry(&path) {
            debug!("Skipping archive entry: {}", path.display());
            continue;
        }

        let mut contents = Vec::new();
        entry
            .by_ref()
            .take(limit.saturating_add(1))
            .read_to_end(&mut contents)
            .with_context(|| format!("Failed to read archive entry '{}'", path.display()))?;
        if contents.len() as u64 > limit {
            return Err(EvError::Dataset(format!(
                "Archive entry '{}' exceeds the limit of {} bytes.",
                path.display(),
                limit
            ))
            .into());
        }
        debug!("Using archive entry: {}", path.display());
        return Ok(Some((path.to_string_lossy().into_owned(), contents)));
    }

    Ok(None)
}

fn is_dataset_entry(path: &Path) -> bool {
    let hidden = path
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.') && c.as_os_str() != ".")
        || path.components().any(|c| c.as_os_str() == "__MACOSX");
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    is_csv && !hidden
}
