//! Design file serialization

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::component::Components;
use crate::constants::DESIGN_FORMAT_VERSION;
use crate::kind::ParameterKind;
use crate::parameters::{ParameterError, ParameterSet};

/// A finalized carafe design: parameter values plus component presence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// File format version
    pub version: u32,
    /// Design name
    pub name: String,
    /// Parameter values (validated again on load)
    pub parameters: ParameterSet,
    /// Optional components
    #[serde(default)]
    pub components: Components,
}

impl Default for Design {
    fn default() -> Self {
        Self::new("New Carafe")
    }
}

impl Design {
    /// Create a design with every parameter at its minimum
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: DESIGN_FORMAT_VERSION,
            name: name.into(),
            parameters: ParameterSet::new(),
            components: Components::default(),
        }
    }

    /// Set a parameter value (see [`ParameterSet::set_value`])
    pub fn set_value(&mut self, kind: ParameterKind, value: f64) -> Result<(), ParameterError> {
        self.parameters.set_value(kind, value)
    }

    /// Values of the kinds whose component is present, in table order
    pub fn active_values(&self) -> impl Iterator<Item = (ParameterKind, f64)> + '_ {
        self.parameters
            .iter()
            .filter(|(kind, _)| self.components.is_active(*kind))
            .map(|(kind, p)| (kind, p.value()))
    }

    /// Save design to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DesignError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| DesignError::Io(e.to_string()))?;
        tracing::info!("Saved design '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Serialize design to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DesignError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| DesignError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load design from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DesignError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| DesignError::Io(e.to_string()))?;
        let design = Self::load_from_bytes(&content)?;
        tracing::info!("Loaded design '{}' from {:?}", design.name, path);
        Ok(design)
    }

    /// Load design from bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, DesignError> {
        let content =
            std::str::from_utf8(data).map_err(|e| DesignError::Deserialize(e.to_string()))?;
        let design: Design =
            ron::from_str(content).map_err(|e| DesignError::Deserialize(e.to_string()))?;
        if design.version > DESIGN_FORMAT_VERSION {
            return Err(DesignError::UnsupportedVersion(design.version));
        }
        Ok(design)
    }
}

/// Design-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DesignError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported design format version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentState};

    fn sample() -> Design {
        let mut design = Design::new("Tall");
        design.set_value(ParameterKind::BodyHeight, 280.0).unwrap();
        design.set_value(ParameterKind::HandleLength, 150.0).unwrap();
        design.set_value(ParameterKind::BaseDiameter, 95.0).unwrap();
        design.set_value(ParameterKind::OpeningDiameter, 40.0).unwrap();
        design
            .components
            .set_state(Component::Lid, ComponentState::Missing);
        design
    }

    #[test]
    fn test_bytes_roundtrip() {
        let design = sample();
        let bytes = design.to_bytes().unwrap();
        let loaded = Design::load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded, design);
    }

    #[test]
    fn test_save_and_load() {
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let path = temp.path().join("tall.ron");

        let design = sample();
        design.save(&path).unwrap();

        let loaded = Design::load(&path).unwrap();
        assert_eq!(loaded.name, "Tall");
        assert_eq!(loaded.parameters.value(ParameterKind::HandleLength), 150.0);
        assert!(!loaded.components.is_present(Component::Lid));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Design::load("/nonexistent/carafe.ron");
        assert!(matches!(result, Err(DesignError::Io(_))));
    }

    #[test]
    fn test_load_rejects_inconsistent_values() {
        let text = r#"(
            version: 1,
            name: "Broken",
            parameters: {BodyHeight: 120.0, HandleLength: 150.0},
        )"#;
        let result = Design::load_from_bytes(text.as_bytes());
        assert!(matches!(result, Err(DesignError::Deserialize(_))));
    }

    #[test]
    fn test_load_rejects_future_version() {
        let text = r#"(version: 99, name: "Future", parameters: {})"#;
        let result = Design::load_from_bytes(text.as_bytes());
        assert!(matches!(result, Err(DesignError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_active_values_skip_missing_components() {
        let design = sample();
        let kinds: Vec<_> = design.active_values().map(|(kind, _)| kind).collect();
        assert!(!kinds.contains(&ParameterKind::LidHeight));
        assert!(kinds.contains(&ParameterKind::HandleLength));
        assert_eq!(kinds.len(), ParameterKind::COUNT - 1);
    }
}
