//! Parameter kinds
//!
//! The closed set of physical quantities that describe a carafe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::constants::*;
use crate::parameters::ParameterError;

/// Which physical quantity a [`Parameter`](crate::Parameter) represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Height of the carafe body
    BodyHeight,
    /// Diameter of the base
    BaseDiameter,
    /// Diameter of the opening at the top of the body
    OpeningDiameter,
    /// Height of the lid
    LidHeight,
    /// Length of the handle
    HandleLength,
    /// Angle of the handle relative to the body
    HandleAngle,
}

impl ParameterKind {
    /// Number of kinds
    pub const COUNT: usize = 6;

    /// Every kind, in table order
    pub const ALL: [ParameterKind; Self::COUNT] = [
        ParameterKind::BodyHeight,
        ParameterKind::BaseDiameter,
        ParameterKind::OpeningDiameter,
        ParameterKind::LidHeight,
        ParameterKind::HandleLength,
        ParameterKind::HandleAngle,
    ];

    /// Position of this kind in [`ParameterKind::ALL`]
    pub const fn index(self) -> usize {
        match self {
            ParameterKind::BodyHeight => 0,
            ParameterKind::BaseDiameter => 1,
            ParameterKind::OpeningDiameter => 2,
            ParameterKind::LidHeight => 3,
            ParameterKind::HandleLength => 4,
            ParameterKind::HandleAngle => 5,
        }
    }

    /// Machine name (snake_case), used in design files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            ParameterKind::BodyHeight => "body_height",
            ParameterKind::BaseDiameter => "base_diameter",
            ParameterKind::OpeningDiameter => "opening_diameter",
            ParameterKind::LidHeight => "lid_height",
            ParameterKind::HandleLength => "handle_length",
            ParameterKind::HandleAngle => "handle_angle",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            ParameterKind::BodyHeight => "Body height",
            ParameterKind::BaseDiameter => "Base diameter",
            ParameterKind::OpeningDiameter => "Opening diameter",
            ParameterKind::LidHeight => "Lid height",
            ParameterKind::HandleLength => "Handle length",
            ParameterKind::HandleAngle => "Handle angle",
        }
    }

    /// Unit symbol
    pub fn unit(self) -> &'static str {
        match self {
            ParameterKind::HandleAngle => "deg",
            _ => "mm",
        }
    }

    /// Absolute minimum, also the initial value
    pub fn absolute_min(self) -> f64 {
        match self {
            ParameterKind::BodyHeight => MIN_BODY_HEIGHT,
            ParameterKind::BaseDiameter => MIN_BASE_DIAMETER,
            ParameterKind::OpeningDiameter => MIN_OPENING_DIAMETER,
            ParameterKind::LidHeight => MIN_LID_HEIGHT,
            ParameterKind::HandleLength => MIN_HANDLE_LENGTH,
            ParameterKind::HandleAngle => MIN_HANDLE_ANGLE,
        }
    }

    /// Absolute maximum, or `None` when the maximum is derived from another kind
    pub fn absolute_max(self) -> Option<f64> {
        match self {
            ParameterKind::BodyHeight => Some(MAX_BODY_HEIGHT),
            ParameterKind::BaseDiameter => Some(MAX_BASE_DIAMETER),
            ParameterKind::LidHeight => Some(MAX_LID_HEIGHT),
            ParameterKind::HandleAngle => Some(MAX_HANDLE_ANGLE),
            ParameterKind::OpeningDiameter | ParameterKind::HandleLength => None,
        }
    }

    /// Optional component this kind belongs to
    pub fn component(self) -> Option<Component> {
        match self {
            ParameterKind::LidHeight => Some(Component::Lid),
            ParameterKind::HandleLength | ParameterKind::HandleAngle => Some(Component::Handle),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ParameterKind {
    type Err = ParameterError;

    /// Accepts the snake_case name or the variant name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        ParameterKind::ALL
            .into_iter()
            .find(|kind| kind.name().replace('_', "") == normalized)
            .ok_or_else(|| ParameterError::UnknownKind(s.to_string()))
    }
}
