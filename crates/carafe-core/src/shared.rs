//! Thread-safe handle to a parameter set
//!
//! `set_value` and its cascade run under one write lock, so readers never
//! observe a committed value without its updated dependent bounds.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::kind::ParameterKind;
use crate::parameters::{ParameterError, ParameterSet};

/// Shared parameter set; clones refer to the same instance
#[derive(Debug, Clone, Default)]
pub struct SharedParameterSet {
    inner: Arc<RwLock<ParameterSet>>,
}

impl SharedParameterSet {
    /// Create a shared handle around a fresh parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing parameter set
    pub fn from_set(set: ParameterSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Run a read-only closure against a consistent view
    pub fn read<R>(&self, f: impl FnOnce(&ParameterSet) -> R) -> R {
        f(&self.inner.read())
    }

    /// Current value of a kind
    pub fn value(&self, kind: ParameterKind) -> f64 {
        self.inner.read().value(kind)
    }

    /// Whether a value is valid for a kind right now
    pub fn is_valid(&self, kind: ParameterKind, value: f64) -> bool {
        self.inner.read().is_valid(kind, value)
    }

    /// Set a value as a single critical section
    pub fn set_value(&self, kind: ParameterKind, value: f64) -> Result<(), ParameterError> {
        self.inner.write().set_value(kind, value)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ParameterSet {
        self.inner.read().clone()
    }
}
