//! The parameter set: one bounded parameter per kind plus the rules that tie
//! them together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dependency::{CARAFE_RULES, DependencyGraph, DependencyRule};
use crate::kind::ParameterKind;
use crate::parameter::Parameter;

/// Parameter-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Value {value} is out of range for {kind} (min: {min} | max: {max})")]
    OutOfRange {
        kind: ParameterKind,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown parameter kind: {0}")]
    UnknownKind(String),

    #[error("Cyclic dependency involving {kind}")]
    CyclicDependency { kind: ParameterKind },
}

/// Serialized form: the current value of each kind
type ParameterValues = BTreeMap<ParameterKind, f64>;

/// Every carafe parameter with its current range and value
///
/// All invariants hold between calls: each minimum is at most its maximum,
/// each value lies in its range, and each derived maximum reflects the
/// current value of its driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ParameterValues", into = "ParameterValues")]
pub struct ParameterSet {
    params: [Parameter; ParameterKind::COUNT],
    graph: DependencyGraph,
}

impl From<ParameterSet> for ParameterValues {
    fn from(set: ParameterSet) -> Self {
        set.iter().map(|(kind, p)| (kind, p.value())).collect()
    }
}

impl TryFrom<ParameterValues> for ParameterSet {
    type Error = ParameterError;

    /// Replays the stored values on a fresh set, drivers first, so that every
    /// value is checked against the bounds its drivers produce.
    fn try_from(values: ParameterValues) -> Result<Self, Self::Error> {
        let mut set = ParameterSet::new();
        let order = set.graph.order().to_vec();
        for kind in order {
            if let Some(&value) = values.get(&kind) {
                set.set_value(kind, value)?;
            }
        }
        Ok(set)
    }
}

impl PartialEq for ParameterSet {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSet {
    /// Create a set with every value at its minimum and derived maxima
    /// computed from their drivers' minima
    pub fn new() -> Self {
        Self::with_rules(&CARAFE_RULES).expect("built-in dependency table must be acyclic")
    }

    /// Create a set governed by a custom dependency table
    pub fn with_rules(rules: &[DependencyRule]) -> Result<Self, ParameterError> {
        let graph = DependencyGraph::new(rules)?;

        let params = ParameterKind::ALL.map(|kind| {
            let min = kind.absolute_min();
            // Derived maxima are filled in by the first propagation
            let max = kind.absolute_max().unwrap_or(min);
            Parameter::new(min, max, min)
        });

        let mut set = Self { params, graph };
        set.graph.propagate(&mut set.params, &ParameterKind::ALL);
        Ok(set)
    }

    /// The parameter of a kind
    pub fn parameter(&self, kind: ParameterKind) -> &Parameter {
        &self.params[kind.index()]
    }

    /// Current lower bound of a kind
    pub fn min_value(&self, kind: ParameterKind) -> f64 {
        self.parameter(kind).min_value()
    }

    /// Current upper bound of a kind
    pub fn max_value(&self, kind: ParameterKind) -> f64 {
        self.parameter(kind).max_value()
    }

    /// Current value of a kind
    pub fn value(&self, kind: ParameterKind) -> f64 {
        self.parameter(kind).value()
    }

    /// Whether `value` is within the current inclusive range of `kind`
    pub fn is_valid(&self, kind: ParameterKind, value: f64) -> bool {
        self.parameter(kind).contains(value)
    }

    /// Set the value of a kind and update everything that depends on it
    ///
    /// Values outside the current range are rejected without touching any
    /// state. On success the value is committed, every dependent bound is
    /// recomputed, and dependent values that fell out of range are snapped
    /// to the nearest bound.
    pub fn set_value(&mut self, kind: ParameterKind, value: f64) -> Result<(), ParameterError> {
        let current = self.parameter(kind);
        if !current.contains(value) {
            tracing::debug!("Rejected {} = {}", kind, value);
            return Err(ParameterError::OutOfRange {
                kind,
                value,
                min: current.min_value(),
                max: current.max_value(),
            });
        }

        let mut next = self.params;
        next[kind.index()].set_value(value);
        tracing::debug!("{} set to {}", kind, value);

        self.graph.propagate(&mut next, &[kind]);
        self.params = next;
        Ok(())
    }

    /// Try to set a value, keeping the previous one if it is rejected.
    /// Returns the value held afterwards.
    pub fn commit_or_revert(&mut self, kind: ParameterKind, value: f64) -> f64 {
        if let Err(e) = self.set_value(kind, value) {
            tracing::debug!("Keeping previous value: {}", e);
        }
        self.value(kind)
    }

    /// Iterate over every kind and its parameter in table order
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, &Parameter)> {
        ParameterKind::ALL.into_iter().zip(self.params.iter())
    }

    /// Range hint for display, e.g. `(min: 25 | max: 66.67 mm)`
    pub fn range_hint(&self, kind: ParameterKind) -> String {
        format!(
            "(min: {} | max: {} {})",
            self.min_value(kind),
            self.max_value(kind),
            kind.unit()
        )
    }

    /// The dependency rules governing this set
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::*;
    use crate::dependency::round_to;

    fn assert_invariants(set: &ParameterSet) {
        for (kind, p) in set.iter() {
            assert!(p.min_value() <= p.max_value(), "{kind}: bounds out of order");
            assert!(
                p.min_value() <= p.value() && p.value() <= p.max_value(),
                "{kind}: value out of range"
            );
        }
        assert_eq!(
            set.max_value(ParameterKind::OpeningDiameter),
            set.value(ParameterKind::BaseDiameter)
        );
        assert_eq!(
            set.max_value(ParameterKind::HandleLength),
            round_to(2.0 * set.value(ParameterKind::BodyHeight) / 3.0, 2)
        );
    }

    #[test]
    fn test_initial_minimums() {
        let set = ParameterSet::new();
        assert_eq!(set.min_value(ParameterKind::BaseDiameter), MIN_BASE_DIAMETER);
        assert_eq!(set.min_value(ParameterKind::OpeningDiameter), MIN_OPENING_DIAMETER);
        assert_eq!(set.min_value(ParameterKind::BodyHeight), MIN_BODY_HEIGHT);
        assert_eq!(set.min_value(ParameterKind::HandleLength), MIN_HANDLE_LENGTH);
        assert_eq!(set.min_value(ParameterKind::LidHeight), MIN_LID_HEIGHT);
        assert_eq!(set.min_value(ParameterKind::HandleAngle), MIN_HANDLE_ANGLE);

        for kind in ParameterKind::ALL {
            assert_eq!(set.value(kind), kind.absolute_min());
        }
    }

    #[test]
    fn test_initial_maximums() {
        let set = ParameterSet::new();
        assert_eq!(set.max_value(ParameterKind::BaseDiameter), MAX_BASE_DIAMETER);
        assert_eq!(set.max_value(ParameterKind::BodyHeight), MAX_BODY_HEIGHT);
        assert_eq!(set.max_value(ParameterKind::LidHeight), MAX_LID_HEIGHT);
        assert_eq!(set.max_value(ParameterKind::HandleAngle), MAX_HANDLE_ANGLE);
        // Derived from the drivers' minimums
        assert_eq!(set.max_value(ParameterKind::OpeningDiameter), MIN_BASE_DIAMETER);
        assert_relative_eq!(set.max_value(ParameterKind::HandleLength), 66.67);
        assert_invariants(&set);
    }

    #[test]
    fn test_set_value_in_range() {
        let cases = [
            (ParameterKind::BaseDiameter, 75.0),
            (ParameterKind::BodyHeight, 200.0),
            (ParameterKind::OpeningDiameter, 30.0),
            (ParameterKind::LidHeight, 35.0),
            (ParameterKind::HandleLength, 30.0),
            (ParameterKind::HandleAngle, 45.0),
        ];
        for (kind, value) in cases {
            let mut set = ParameterSet::new();
            set.set_value(kind, value).unwrap();
            assert_eq!(set.value(kind), value);
            assert_invariants(&set);
        }
    }

    #[test]
    fn test_set_value_out_of_range_is_rejected_atomically() {
        let mut set = ParameterSet::new();
        let before = set.clone();

        let err = set.set_value(ParameterKind::BaseDiameter, -10.0).unwrap_err();
        assert_eq!(
            err,
            ParameterError::OutOfRange {
                kind: ParameterKind::BaseDiameter,
                value: -10.0,
                min: MIN_BASE_DIAMETER,
                max: MAX_BASE_DIAMETER,
            }
        );
        assert_eq!(set, before);
        assert_eq!(set.max_value(ParameterKind::OpeningDiameter), MIN_BASE_DIAMETER);
    }

    #[test]
    fn test_set_value_above_max_rejected() {
        let mut set = ParameterSet::new();
        for kind in ParameterKind::ALL {
            let too_big = set.max_value(kind) + 1.0;
            assert!(set.set_value(kind, too_big).is_err());
        }
        assert_eq!(set, ParameterSet::new());
    }

    #[test]
    fn test_nan_rejected() {
        let mut set = ParameterSet::new();
        assert!(!set.is_valid(ParameterKind::LidHeight, f64::NAN));
        assert!(set.set_value(ParameterKind::LidHeight, f64::NAN).is_err());
    }

    #[test]
    fn test_bounds_inclusive() {
        let set = ParameterSet::new();
        for kind in ParameterKind::ALL {
            assert!(set.is_valid(kind, set.min_value(kind)));
            assert!(set.is_valid(kind, set.max_value(kind)));
        }
        assert!(!set.is_valid(ParameterKind::HandleAngle, 90.5));
    }

    #[test]
    fn test_opening_tracks_base() {
        let mut set = ParameterSet::new();
        for base in [50.0, 62.5, 77.7, 100.0, 51.0] {
            set.set_value(ParameterKind::BaseDiameter, base).unwrap();
            assert_eq!(set.max_value(ParameterKind::OpeningDiameter), base);
            assert_invariants(&set);
        }
    }

    #[test]
    fn test_handle_length_shrinks_with_body() {
        let mut set = ParameterSet::new();
        set.set_value(ParameterKind::BodyHeight, 300.0).unwrap();
        assert_eq!(set.max_value(ParameterKind::HandleLength), 200.0);

        set.set_value(ParameterKind::HandleLength, 150.0).unwrap();
        assert_eq!(set.value(ParameterKind::HandleLength), 150.0);

        // Lowering the body pulls the handle down to the new maximum
        set.set_value(ParameterKind::BodyHeight, MIN_BODY_HEIGHT).unwrap();
        assert_relative_eq!(set.max_value(ParameterKind::HandleLength), 66.67);
        assert_eq!(
            set.value(ParameterKind::HandleLength),
            set.max_value(ParameterKind::HandleLength)
        );
        assert_invariants(&set);
    }

    #[test]
    fn test_opening_snaps_when_base_shrinks() {
        let mut set = ParameterSet::new();
        set.set_value(ParameterKind::BaseDiameter, 90.0).unwrap();
        set.set_value(ParameterKind::OpeningDiameter, 80.0).unwrap();

        set.set_value(ParameterKind::BaseDiameter, 60.0).unwrap();
        assert_eq!(set.value(ParameterKind::OpeningDiameter), 60.0);

        // Growing the base again does not move the value back up
        set.set_value(ParameterKind::BaseDiameter, 90.0).unwrap();
        assert_eq!(set.value(ParameterKind::OpeningDiameter), 60.0);
        assert_eq!(set.max_value(ParameterKind::OpeningDiameter), 90.0);
    }

    #[test]
    fn test_dependent_within_new_bound_untouched() {
        let mut set = ParameterSet::new();
        set.set_value(ParameterKind::BodyHeight, 240.0).unwrap();
        set.set_value(ParameterKind::HandleLength, 40.0).unwrap();
        set.set_value(ParameterKind::BodyHeight, 150.0).unwrap();
        assert_eq!(set.value(ParameterKind::HandleLength), 40.0);
        assert_eq!(set.max_value(ParameterKind::HandleLength), 100.0);
    }

    #[test]
    fn test_set_value_idempotent() {
        let mut once = ParameterSet::new();
        once.set_value(ParameterKind::BodyHeight, 222.0).unwrap();

        let mut twice = ParameterSet::new();
        twice.set_value(ParameterKind::BodyHeight, 222.0).unwrap();
        twice.set_value(ParameterKind::BodyHeight, 222.0).unwrap();

        assert_eq!(once, twice);
        assert_relative_eq!(twice.max_value(ParameterKind::HandleLength), 148.0);
    }

    #[test]
    fn test_commit_or_revert() {
        let mut set = ParameterSet::new();
        assert_eq!(set.commit_or_revert(ParameterKind::LidHeight, 20.0), 20.0);
        assert_eq!(set.commit_or_revert(ParameterKind::LidHeight, 500.0), 20.0);
        assert_eq!(set.value(ParameterKind::LidHeight), 20.0);
    }

    #[test]
    fn test_range_hint() {
        let set = ParameterSet::new();
        assert_eq!(
            set.range_hint(ParameterKind::HandleLength),
            "(min: 25 | max: 66.67 mm)"
        );
        assert_eq!(
            set.range_hint(ParameterKind::HandleAngle),
            "(min: 0 | max: 90 deg)"
        );
    }

    fn two_thirds(value: f64) -> f64 {
        round_to(2.0 * value / 3.0, 2)
    }

    fn identity(value: f64) -> f64 {
        value
    }

    #[test]
    fn test_transitive_cascade() {
        // body -> handle length -> handle angle
        let rules = [
            DependencyRule::new(ParameterKind::BodyHeight, ParameterKind::HandleLength, two_thirds),
            DependencyRule::new(ParameterKind::HandleLength, ParameterKind::HandleAngle, identity),
        ];
        let mut set = ParameterSet::with_rules(&rules).unwrap();
        assert_relative_eq!(set.max_value(ParameterKind::HandleAngle), MIN_HANDLE_LENGTH);

        set.set_value(ParameterKind::BodyHeight, 300.0).unwrap();
        set.set_value(ParameterKind::HandleLength, 80.0).unwrap();
        assert_eq!(set.max_value(ParameterKind::HandleAngle), 80.0);
        set.set_value(ParameterKind::HandleAngle, 75.0).unwrap();

        // Shrinking the body snaps the handle, which in turn snaps the angle
        set.set_value(ParameterKind::BodyHeight, 100.0).unwrap();
        assert_relative_eq!(set.value(ParameterKind::HandleLength), 66.67);
        assert_relative_eq!(set.max_value(ParameterKind::HandleAngle), 66.67);
        assert_relative_eq!(set.value(ParameterKind::HandleAngle), 66.67);
    }

    #[test]
    fn test_with_rules_rejects_cycle() {
        let rules = [
            DependencyRule::new(ParameterKind::BodyHeight, ParameterKind::HandleLength, identity),
            DependencyRule::new(ParameterKind::HandleLength, ParameterKind::BodyHeight, identity),
        ];
        assert!(matches!(
            ParameterSet::with_rules(&rules),
            Err(ParameterError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_serde_replays_values() {
        let mut set = ParameterSet::new();
        set.set_value(ParameterKind::BodyHeight, 270.0).unwrap();
        set.set_value(ParameterKind::HandleLength, 170.0).unwrap();
        set.set_value(ParameterKind::BaseDiameter, 80.0).unwrap();
        set.set_value(ParameterKind::OpeningDiameter, 70.0).unwrap();

        let text = ron::to_string(&set).unwrap();
        let restored: ParameterSet = ron::from_str(&text).unwrap();
        assert_eq!(restored, set);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        // Opening wider than the stored base
        let text = "{BaseDiameter: 60.0, OpeningDiameter: 70.0}";
        assert!(ron::from_str::<ParameterSet>(text).is_err());
    }

    #[test]
    fn test_deserialize_missing_kinds_keep_defaults() {
        let set: ParameterSet = ron::from_str("{LidHeight: 12.5}").unwrap();
        assert_eq!(set.value(ParameterKind::LidHeight), 12.5);
        assert_eq!(set.value(ParameterKind::BodyHeight), MIN_BODY_HEIGHT);
    }
}
