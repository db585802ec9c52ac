//! Optional carafe components
//!
//! A carafe may be built without a handle or without a lid. Marking a
//! component missing does not change any bound or value; it only tells
//! consumers which parameters are relevant.

use serde::{Deserialize, Serialize};

use crate::kind::ParameterKind;

/// A part of the carafe that can be left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Handle,
    Lid,
}

impl Component {
    pub const ALL: [Component; 2] = [Component::Handle, Component::Lid];

    /// Machine name
    pub fn name(self) -> &'static str {
        match self {
            Component::Handle => "handle",
            Component::Lid => "lid",
        }
    }

    /// Parse a machine name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Kinds that only matter when this component is present
    pub fn kinds(self) -> impl Iterator<Item = ParameterKind> {
        ParameterKind::ALL
            .into_iter()
            .filter(move |kind| kind.component() == Some(self))
    }
}

/// Whether a component is part of the design
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentState {
    #[default]
    Present,
    Missing,
}

impl ComponentState {
    /// Parse `present` / `missing`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "present" => Some(ComponentState::Present),
            "missing" => Some(ComponentState::Missing),
            _ => None,
        }
    }
}

/// Presence of every optional component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub handle: ComponentState,
    #[serde(default)]
    pub lid: ComponentState,
}

impl Components {
    /// State of a component
    pub fn state(&self, component: Component) -> ComponentState {
        match component {
            Component::Handle => self.handle,
            Component::Lid => self.lid,
        }
    }

    /// Change the state of a component
    pub fn set_state(&mut self, component: Component, state: ComponentState) {
        match component {
            Component::Handle => self.handle = state,
            Component::Lid => self.lid = state,
        }
    }

    pub fn is_present(&self, component: Component) -> bool {
        self.state(component) == ComponentState::Present
    }

    /// Whether a kind is relevant for the design (its component, if any, is present)
    pub fn is_active(&self, kind: ParameterKind) -> bool {
        kind.component().is_none_or(|c| self.is_present(c))
    }
}
