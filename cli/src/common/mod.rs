//! # EvType Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared plumbing around the predictor core: getting data in and getting
//! conversations out.
//!
//! - **`archive`**: gzip and tar handling for uploaded datasets
//! - **`loader`**: the `DatasetLoader` capability and its CSV / upload implementations
//! - **`ui`**: terminal transcript rendering
//!
//! ```rust
//! use crate::common::{loader, ui::TranscriptRenderer};
//!
//! let dataset = loader::load_from_path(&path)?;
//! let mut renderer = TranscriptRenderer::new(std::io::stdout());
//! ```
//!

/// Gzip and tar helpers for in-memory uploads.
pub mod archive;
/// Dataset loaders (CSV file, uploaded archive).
pub mod loader;
/// Terminal presentation.
pub mod ui;
