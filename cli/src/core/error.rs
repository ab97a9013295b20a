//! # EvType Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the EV Type Predictor.
//! Conversation-level problems (an unknown make/model, a range answer without
//! digits) are *not* errors: the dialogue controller answers them with a
//! re-prompt. The errors here cover everything around the conversation:
//! configuration, dataset loading, uploaded archives and page rendering.
//!
//! ## Architecture
//!
//! - `EvError`: A custom error enum using `thiserror` for specific failure kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so call sites can attach context
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !headers.iter().any(|h| h == "Make") {
//!     return Err(EvError::MissingColumn { column: "Make".into() })?;
//! }
//!
//! // Check for a specific error kind further up
//! if let Some(EvError::VehicleNotFound { query }) = err.downcast_ref::<EvError>() {
//!     println!("No match for {}", query);
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the EV Type Predictor.
#[derive(Error, Debug)]
pub enum EvError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Dataset is missing required column '{column}'.")]
    MissingColumn { column: String },

    #[error("Unsupported dataset format: '{name}'. Expected .csv, .csv.gz, .tar, .tar.gz or .tgz.")]
    UnsupportedFormat { name: String },

    #[error("Archive '{name}' does not contain a .csv file.")]
    NoCsvInArchive { name: String },

    #[error("CSV parsing failed: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Sorry, I couldn't find '{query}' in the dataset. Please try another make and model.")]
    VehicleNotFound { query: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = EvError::Config("Missing setting 'port'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'port'"
        );

        let missing = EvError::MissingColumn {
            column: "Electric Range".into(),
        };
        assert_eq!(
            missing.to_string(),
            "Dataset is missing required column 'Electric Range'."
        );

        let not_found = EvError::VehicleNotFound {
            query: "Rivian R1T".into(),
        };
        assert!(not_found.to_string().contains("'Rivian R1T'"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = EvError::NoCsvInArchive {
            name: "upload.tgz".into(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<EvError>(),
            Some(EvError::NoCsvInArchive { .. })
        ));
    }
}
