//! Absolute bounds for every carafe parameter
//!
//! These seed the initial state of a [`ParameterSet`](crate::ParameterSet).
//! Opening diameter and handle length have no fixed maximum: theirs is
//! derived from another parameter's value (see [`crate::dependency`]).

/// Minimum body height (mm)
pub const MIN_BODY_HEIGHT: f64 = 100.0;

/// Maximum body height (mm)
pub const MAX_BODY_HEIGHT: f64 = 300.0;

/// Minimum base diameter (mm)
pub const MIN_BASE_DIAMETER: f64 = 50.0;

/// Maximum base diameter (mm)
pub const MAX_BASE_DIAMETER: f64 = 100.0;

/// Minimum opening diameter (mm)
pub const MIN_OPENING_DIAMETER: f64 = 25.0;

/// Minimum lid height (mm)
pub const MIN_LID_HEIGHT: f64 = 10.0;

/// Maximum lid height (mm)
pub const MAX_LID_HEIGHT: f64 = 50.0;

/// Minimum handle length (mm)
pub const MIN_HANDLE_LENGTH: f64 = 25.0;

/// Minimum handle angle (degrees)
pub const MIN_HANDLE_ANGLE: f64 = 0.0;

/// Maximum handle angle (degrees)
pub const MAX_HANDLE_ANGLE: f64 = 90.0;

/// Decimal places kept when a bound is derived from another value
pub const DERIVED_BOUND_DECIMALS: i32 = 2;

/// Current design file format version
pub const DESIGN_FORMAT_VERSION: u32 = 1;
