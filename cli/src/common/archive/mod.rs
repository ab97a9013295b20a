//! # EvType Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! In-memory handling of uploaded dataset archives.
//!
//! - **`compression`**: gzip detection and decompression
//! - **`tar`**: locating the dataset CSV inside a tar archive
//!
//! The upload loader (`common::loader::upload`) combines the two to accept
//! `.csv.gz`, `.tar` and `.tar.gz` uploads.
//!

pub mod compression;
pub mod tar;

/// Largest dataset accepted after decompression, in bytes (1 GiB).
pub const MAX_INFLATED_BYTES: u64 = 1024 * 1024 * 1024;
