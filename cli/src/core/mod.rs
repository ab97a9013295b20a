//! # EvType Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `templating`: Rendering of the web chat page
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{EvError, Result};
//! use crate::core::templating;
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
