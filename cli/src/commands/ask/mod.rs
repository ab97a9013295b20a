//! # EvType Ask Command
//!
//! File: cli/src/commands/ask/mod.rs
//!
//! ## Overview
//!
//! Classifies a single make/model without a conversation. Useful in scripts:
//! the verdict goes to stdout, and an unknown vehicle exits with status 1.
//!
//! ```bash
//! evtype ask Tesla Model 3
//! evtype ask "toyota prius prime" --range 25
//! ```
//!
use crate::core::error::{EvError, Result};
use crate::predictor::{classify, Dataset, Verdict, VehicleLookup};
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Make and model to look up, e.g. `Tesla Model 3`. Quoting is optional.
    #[arg(required = true, num_args = 1..)]
    pub make_model: Vec<String>,

    /// Your estimate of the vehicle's electric range, in miles.
    #[arg(long, short)]
    pub range: Option<f64>,
}

/// Entry point for `evtype ask`: prints one verdict to stdout.
///
/// ## Arguments
///
/// * `args`: The make/model words and the optional `--range`.
/// * `data`: The global `--data` override, if given.
///
/// ## Errors
///
/// Returns an error if the dataset cannot be loaded, the make/model is blank,
/// or no record matches it (`EvError::VehicleNotFound`).
pub async fn handle_ask(args: AskArgs, data: Option<&Path>) -> Result<()> {
    info!("Handling ask command with args: {:?}", args);
    let (_cfg, dataset) = super::load_dataset(data)?;

    let query = args.make_model.join(" ");
    let verdict = answer(&dataset, &query, args.range)?;
    println!("{}", verdict);
    Ok(())
}

/// Looks `query` up and classifies it; a miss is `EvError::VehicleNotFound`.
fn answer(dataset: &Dataset, query: &str, range: Option<f64>) -> Result<Verdict> {
    if query.trim().is_empty() {
        anyhow::bail!("Make and model cannot be empty.");
    }
    let lookup = VehicleLookup::new(dataset);
    let matches = lookup.find(query).ok_or_else(|| EvError::VehicleNotFound {
        query: query.to_string(),
    })?;
    debug!("'{}' matched {} record(s)", query, matches.len());
    Ok(classify(query, &matches, range))
}
