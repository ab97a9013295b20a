//! # EvType Predictor Core
//!
//! File: cli/src/predictor/mod.rs
//!
//! ## Overview
//!
//! The conversation core shared by every front-end (`evtype chat`,
//! `evtype ask`, `evtype srv`). It never touches files, sockets or terminals:
//! loaders hand it a `Dataset`, front-ends hand it one message at a time.
//!
//! ## Architecture
//!
//! - `dataset`: `VehicleRecord`, `Dataset` and the text normalization both sides share
//! - `lookup`: substring search over make/model keys
//! - `classifier`: BEV/PHEV verdict with optional range commentary
//! - `dialogue`: the four-state conversation and its transcript
//!
//! ```rust
//! let lookup = VehicleLookup::new(&dataset);
//! let controller = DialogueController::new(lookup);
//! let (state, reply) = controller.advance(ConversationState::new(), "hi");
//! ```
//!
pub mod classifier;
pub mod dataset;
pub mod dialogue;
pub mod lookup;

pub use classifier::{classify, Verdict};
pub use dataset::{Dataset, DatasetSummary, VehicleRecord};
pub use dialogue::{ConversationState, DialogueController, Speaker, Step, Turn};
pub use lookup::VehicleLookup;
