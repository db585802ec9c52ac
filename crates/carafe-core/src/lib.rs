//! Carafe Design Parameters
//!
//! This crate provides:
//! - Bounded parameters with clamp-on-write semantics
//! - The fixed set of carafe parameter kinds and their absolute bounds
//! - A data-driven dependency table that derives one parameter's maximum
//!   from another parameter's value
//! - Design files for persisting finalized values

pub mod component;
pub mod constants;
pub mod dependency;
pub mod design;
pub mod kind;
pub mod parameter;
pub mod parameters;
pub mod shared;

// Re-exports for convenience
pub use component::{Component, ComponentState, Components};
pub use dependency::{CARAFE_RULES, DependencyGraph, DependencyRule, RecomputeFn, round_to};
pub use design::{Design, DesignError};
pub use kind::ParameterKind;
pub use parameter::Parameter;
pub use parameters::{ParameterError, ParameterSet};
pub use shared::SharedParameterSet;
