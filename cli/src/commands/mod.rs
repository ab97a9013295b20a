//! # EvType Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level commands of the `evtype` CLI. Every command talks to the same
//! predictor core; they differ only in how messages arrive and how replies are
//! shown.
//!
//! - `ask`: one-shot classification of a single make/model
//! - `chat`: interactive conversation on the terminal
//! - `srv`: web chat page plus JSON API, with dataset upload
//!
//! Each command defines its own arguments structure and handler function.
//!
use crate::common::loader;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::predictor::Dataset;
use anyhow::Context;
use std::path::Path;

/// One-shot lookup: `evtype ask "Tesla Model 3" --range 270`.
pub mod ask;
/// Interactive terminal conversation.
pub mod chat;
/// Web chat server with session and dataset endpoints.
pub mod srv;

/// Loads configuration and the dataset it (or `--data`) points to.
///
/// ## Arguments
///
/// * `data_override`: Path from `--data` or `EVTYPE_DATA`; wins over `[dataset] path`.
///
/// ## Returns
///
/// * `Result<(Config, Dataset)>`: The merged configuration and the loaded dataset.
///
/// ## Errors
///
/// Fails if either configuration file is invalid, or if the dataset is missing,
/// in an unsupported format or lacks a required column.
pub fn load_dataset(data_override: Option<&Path>) -> Result<(Config, Dataset)> {
    let cfg = config::load_config().context("Failed to load evtype configuration")?;
    let path = cfg.dataset_path(data_override);
    let dataset = loader::load_from_path(&path)
        .with_context(|| format!("Could not load the vehicle dataset from '{}'", path.display()))?;
    Ok((cfg, dataset))
}
