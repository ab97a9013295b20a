//! # Dialogue Controller
//!
//! File: cli/src/predictor/dialogue.rs
//!
//! ## Overview
//!
//! A four-state conversation that collects a make/model, then a range
//! estimate, answers with a classification and offers another lookup.
//!
//! ```text
//! Greet ──any──▶ AwaitMakeModel ──match──▶ AwaitRange ──digits──▶ Followup
//!   ▲               │  ▲ not found            │  ▲ no digits         │
//!   │               └──┘                      └──┘                  │
//!   └────────────── "no" / "n" / "exit" / "quit" ◀──────────────────┤
//!                   anything else ──▶ AwaitMakeModel ◀──────────────┘
//! ```
//!
//! ## Architecture
//!
//! `ConversationState` is a plain owned value. `DialogueController::advance`
//! consumes it together with one user message and returns the next state and
//! the reply, so the controller itself holds nothing but a borrowed lookup and
//! can be shared by any number of conversations.
//!
//! Each call appends exactly two turns to the history: the user's message and
//! the reply.
//!
use super::classifier::classify;
use super::dataset::normalize_text;
use super::lookup::{MatchSet, VehicleLookup};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

const EXIT_WORDS: [&str; 4] = ["no", "n", "exit", "quit"];

pub const ASK_MAKE_MODEL: &str =
    "What's the make and model of the electric vehicle you want me to look up?";
pub const MAKE_MODEL_NOT_FOUND: &str =
    "Sorry, I couldn't find that make and model. Please try another.";
pub const ASK_VALID_RANGE: &str = "Please provide a valid numeric range, like '333 miles'.";
pub const OFFER_ANOTHER: &str = "Would you like to check another vehicle?";
pub const FAREWELL: &str = "Goodbye! Have a great day!";
pub const ASK_NEXT_VEHICLE: &str = "Alright! What's the make and model of the next vehicle?";

/// Where the conversation currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Greet,
    AwaitMakeModel,
    AwaitRange,
    Followup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Per-conversation state. `pending_make_model` is always set while `step` is `AwaitRange`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    pub step: Step,
    pub pending_make_model: Option<String>,
    pub history: Vec<Turn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The clear action: back to `Greet` with an empty transcript.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Drives conversations against one dataset.
#[derive(Debug, Clone, Copy)]
pub struct DialogueController<'a> {
    lookup: VehicleLookup<'a>,
}

impl<'a> DialogueController<'a> {
    pub fn new(lookup: VehicleLookup<'a>) -> Self {
        Self { lookup }
    }

    /// Processes one user message and returns the updated state and the reply.
    ///
    /// ## Arguments
    ///
    /// * `state`: The conversation so far, taken by value.
    /// * `message`: The user's message; surrounding whitespace is ignored.
    ///
    /// ## Returns
    ///
    /// * `(ConversationState, String)`: The next state, with the message and the
    ///   reply appended to its history, and the reply itself.
    pub fn advance(
        &self,
        mut state: ConversationState,
        message: &str,
    ) -> (ConversationState, String) {
        let message = message.trim();
        let from = state.step;

        let reply = match state.step {
            Step::Greet => {
                state.step = Step::AwaitMakeModel;
                ASK_MAKE_MODEL.to_string()
            }
            Step::AwaitMakeModel => match self.find_make_model(message) {
                None => MAKE_MODEL_NOT_FOUND.to_string(),
                Some(matches) => {
                    debug!("'{}' matched {} record(s)", message, matches.len());
                    state.pending_make_model = Some(message.to_string());
                    state.step = Step::AwaitRange;
                    format!(
                        "Great! Can you tell me the approximate electric range (in miles) for the {}?",
                        message
                    )
                }
            },
            Step::AwaitRange => match extract_range(message) {
                None => ASK_VALID_RANGE.to_string(),
                Some(user_range) => {
                    state.step = Step::Followup;
                    let vehicle = state.pending_make_model.as_deref().unwrap_or_default();
                    format!("{} {}", self.verdict_text(vehicle, user_range), OFFER_ANOTHER)
                }
            },
            Step::Followup => {
                state.pending_make_model = None;
                if is_exit_word(message) {
                    state.step = Step::Greet;
                    FAREWELL.to_string()
                } else {
                    state.step = Step::AwaitMakeModel;
                    ASK_NEXT_VEHICLE.to_string()
                }
            }
        };

        debug!("Dialogue step {:?} -> {:?}", from, state.step);
        state.history.push(Turn::new(Speaker::User, message));
        state.history.push(Turn::new(Speaker::Assistant, reply.clone()));
        (state, reply)
    }

    /// A blank query would match every record, so it counts as not found.
    fn find_make_model(&self, message: &str) -> Option<MatchSet<'a>> {
        if normalize_text(message).is_empty() {
            return None;
        }
        self.lookup.find(message)
    }

    /// The pending vehicle can disappear when the dataset is replaced mid-conversation.
    fn verdict_text(&self, vehicle: &str, user_range: f64) -> String {
        match self.lookup.find(vehicle) {
            Some(matches) => classify(vehicle, &matches, Some(user_range)).to_string(),
            None => format!(
                "Sorry, I couldn't find '{}' in the dataset. Please try another make and model.",
                vehicle
            ),
        }
    }
}

/// First run of ASCII digits anywhere in `message`, as miles.
///
/// Runs too long for a `u64` saturate at `u64::MAX`, so the result is always finite.
pub fn extract_range(message: &str) -> Option<f64> {
    DIGIT_RUN
        .find(message)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX) as f64)
}

fn is_exit_word(message: &str) -> bool {
    let lowered = message.to_lowercase();
    EXIT_WORDS.contains(&lowered.as_str())
}
