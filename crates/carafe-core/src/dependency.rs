//! Dependency rules between parameters
//!
//! A rule says that the value of a *driver* kind determines the maximum of a
//! *dependent* kind. Rules live in a plain table; [`DependencyGraph`] checks
//! the table once for cycles and fixes the order in which dependents are
//! recomputed after a value changes.

use std::collections::VecDeque;

use crate::constants::DERIVED_BOUND_DECIMALS;
use crate::kind::ParameterKind;
use crate::parameter::Parameter;
use crate::parameters::ParameterError;

/// Computes a dependent's maximum from its driver's value
pub type RecomputeFn = fn(f64) -> f64;

/// One edge of the dependency table
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    /// Kind whose value drives the bound
    pub driver: ParameterKind,
    /// Kind whose maximum is derived
    pub dependent: ParameterKind,
    /// Maps the driver's value to the dependent's maximum
    pub recompute: RecomputeFn,
}

impl DependencyRule {
    pub const fn new(driver: ParameterKind, dependent: ParameterKind, recompute: RecomputeFn) -> Self {
        Self {
            driver,
            dependent,
            recompute,
        }
    }
}

/// Round to a number of decimal places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// The opening can never be wider than the base
fn opening_from_base(base_diameter: f64) -> f64 {
    base_diameter
}

/// The handle can never be longer than two thirds of the body
fn handle_from_body(body_height: f64) -> f64 {
    round_to(2.0 * body_height / 3.0, DERIVED_BOUND_DECIMALS)
}

/// Dependency table of the carafe
pub const CARAFE_RULES: [DependencyRule; 2] = [
    DependencyRule::new(
        ParameterKind::BaseDiameter,
        ParameterKind::OpeningDiameter,
        opening_from_base,
    ),
    DependencyRule::new(
        ParameterKind::BodyHeight,
        ParameterKind::HandleLength,
        handle_from_body,
    ),
];

/// A validated, acyclic dependency table
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    rules: Vec<DependencyRule>,
    /// Every kind, drivers before their dependents
    order: Vec<ParameterKind>,
}

impl DependencyGraph {
    /// Validate a rule table and compute its topological order
    pub fn new(rules: &[DependencyRule]) -> Result<Self, ParameterError> {
        let mut in_degree = [0usize; ParameterKind::COUNT];
        for rule in rules {
            in_degree[rule.dependent.index()] += 1;
        }

        let mut queue: VecDeque<ParameterKind> = ParameterKind::ALL
            .into_iter()
            .filter(|kind| in_degree[kind.index()] == 0)
            .collect();
        let mut order = Vec::with_capacity(ParameterKind::COUNT);

        while let Some(kind) = queue.pop_front() {
            order.push(kind);
            for rule in rules.iter().filter(|r| r.driver == kind) {
                let degree = &mut in_degree[rule.dependent.index()];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(rule.dependent);
                }
            }
        }

        if order.len() < ParameterKind::COUNT {
            // Anything left unordered sits on or behind a cycle
            if let Some(kind) = ParameterKind::ALL
                .into_iter()
                .find(|kind| !order.contains(kind))
            {
                return Err(ParameterError::CyclicDependency { kind });
            }
        }

        Ok(Self {
            rules: rules.to_vec(),
            order,
        })
    }

    /// The carafe's own dependency table
    pub fn carafe() -> Result<Self, ParameterError> {
        Self::new(&CARAFE_RULES)
    }

    /// All rules
    pub fn rules(&self) -> &[DependencyRule] {
        &self.rules
    }

    /// Every kind, drivers before their dependents
    pub fn order(&self) -> &[ParameterKind] {
        &self.order
    }

    /// Whether changing this kind can move another kind's bound
    pub fn is_driver(&self, kind: ParameterKind) -> bool {
        self.rules.iter().any(|r| r.driver == kind)
    }

    /// Whether this kind's maximum is derived
    pub fn is_dependent(&self, kind: ParameterKind) -> bool {
        self.rules.iter().any(|r| r.dependent == kind)
    }

    /// Direct dependents of a kind
    pub fn dependents(&self, kind: ParameterKind) -> impl Iterator<Item = ParameterKind> + '_ {
        self.rules
            .iter()
            .filter(move |r| r.driver == kind)
            .map(|r| r.dependent)
    }

    /// Maximum of `dependent` given the current table, or `None` if it has no rules.
    /// Several rules on one dependent combine to the tightest bound.
    pub fn derived_max(
        &self,
        dependent: ParameterKind,
        params: &[Parameter; ParameterKind::COUNT],
    ) -> Option<f64> {
        self.rules
            .iter()
            .filter(|r| r.dependent == dependent)
            .map(|r| (r.recompute)(params[r.driver.index()].value()))
            .chain(dependent.absolute_max())
            .reduce(f64::min)
            .filter(|_| self.is_dependent(dependent))
    }

    /// Recompute every bound downstream of `changed` and pull the affected
    /// values back into range.
    pub(crate) fn propagate(
        &self,
        params: &mut [Parameter; ParameterKind::COUNT],
        changed: &[ParameterKind],
    ) {
        let mut dirty = [false; ParameterKind::COUNT];
        for kind in changed {
            dirty[kind.index()] = true;
        }

        for &kind in &self.order {
            let driven = self
                .rules
                .iter()
                .any(|r| r.dependent == kind && dirty[r.driver.index()]);
            if !driven {
                continue;
            }
            let Some(max) = self.derived_max(kind, params) else {
                continue;
            };

            let parameter = &mut params[kind.index()];
            let before = *parameter;
            parameter.set_max_value(max);
            if parameter.reclamp() {
                tracing::warn!(
                    "{} snapped from {} to {}",
                    kind,
                    before.value(),
                    parameter.value()
                );
            }

            if *parameter != before {
                tracing::debug!(
                    "{} range now {}..={}",
                    kind,
                    parameter.min_value(),
                    parameter.max_value()
                );
                dirty[kind.index()] = true;
            }
        }
    }
}
