//! # EvType UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal presentation helpers. For now this is the transcript renderer used
//! by `evtype chat`; the web front-end renders its transcript in the browser.
//!

pub mod transcript;

pub use transcript::TranscriptRenderer;
