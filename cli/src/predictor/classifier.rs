//! # Vehicle Type Classifier
//!
//! File: cli/src/predictor/classifier.rs
//!
//! ## Overview
//!
//! Turns a lookup result plus an optional user-stated range into a verdict.
//! The type label of the first match is authoritative for the whole match set;
//! the mean range across all matches is only used to comment on the user's
//! estimate, never to change the type.
//!
//! ## Branches
//!
//! - no range given: type only
//! - `|range - average| > 50`: the discrepancy is reported, the type still stands
//! - otherwise: the type plus a fixed description, picked by whether the label
//!   contains `"BEV"` (anything else reads as a plug-in hybrid)
//!
use super::lookup::MatchSet;
use std::fmt;

/// Largest gap, in miles, between the user's estimate and the dataset mean
/// that still counts as consistent.
pub const RANGE_TOLERANCE_MILES: f64 = 50.0;

/// Two-way reading of a free-form type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    BatteryElectric,
    PlugInHybrid,
}

impl VehicleKind {
    /// `"BEV"` anywhere in the label wins; every other label is treated as a plug-in hybrid.
    pub fn from_type_label(label: &str) -> Self {
        if label.contains("BEV") {
            VehicleKind::BatteryElectric
        } else {
            VehicleKind::PlugInHybrid
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VehicleKind::BatteryElectric => {
                "Battery Electric Vehicle (BEV) that runs solely on electricity."
            }
            VehicleKind::PlugInHybrid => {
                "Plug-in Hybrid Electric Vehicle (PHEV) that combines electric and gasoline power."
            }
        }
    }
}

/// Outcome of `classify`. `Display` renders the message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    TypeOnly {
        vehicle: String,
        ev_type: String,
    },
    RangeMismatch {
        vehicle: String,
        ev_type: String,
        user_range: f64,
        average_range: f64,
    },
    RangeConsistent {
        vehicle: String,
        ev_type: String,
        user_range: f64,
        kind: VehicleKind,
    },
}

/// Classifies `matches`. `vehicle` is the make/model as the user typed it.
///
/// ## Arguments
///
/// * `vehicle`: Echoed back in the verdict text.
/// * `matches`: Non-empty result of `VehicleLookup::find`.
/// * `user_range`: The user's range estimate in miles, if any.
///
/// ## Returns
///
/// * `Verdict`: Type only without a range. With a range, consistent when it is
///   within `RANGE_TOLERANCE_MILES` of the matches' mean, otherwise a mismatch.
pub fn classify(vehicle: &str, matches: &MatchSet<'_>, user_range: Option<f64>) -> Verdict {
    let vehicle = vehicle.to_string();
    let ev_type = matches.representative().ev_type.clone();

    let Some(user_range) = user_range else {
        return Verdict::TypeOnly { vehicle, ev_type };
    };

    let average_range = matches.average_range();
    if (user_range - average_range).abs() > RANGE_TOLERANCE_MILES {
        Verdict::RangeMismatch {
            vehicle,
            ev_type,
            user_range,
            average_range,
        }
    } else {
        let kind = VehicleKind::from_type_label(&ev_type);
        Verdict::RangeConsistent {
            vehicle,
            ev_type,
            user_range,
            kind,
        }
    }
}

impl Verdict {
    pub fn ev_type(&self) -> &str {
        match self {
            Verdict::TypeOnly { ev_type, .. }
            | Verdict::RangeMismatch { ev_type, .. }
            | Verdict::RangeConsistent { ev_type, .. } => ev_type,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::TypeOnly { vehicle, ev_type } => write!(
                f,
                "According to the dataset, the {} is classified as a {}.",
                vehicle, ev_type
            ),
            Verdict::RangeMismatch {
                vehicle,
                ev_type,
                user_range,
                average_range,
            } => write!(
                f,
                "The range you mentioned ({:.0} miles) differs from the dataset's average ({:.0} miles). \
                 However, according to records, the {} is a {}.",
                user_range, average_range, vehicle, ev_type
            ),
            Verdict::RangeConsistent {
                vehicle,
                ev_type,
                user_range,
                kind,
            } => write!(
                f,
                "Based on your provided range ({:.0} miles) and the dataset, the {} is a {}: a {}",
                user_range,
                vehicle,
                ev_type,
                kind.description()
            ),
        }
    }
}
