//! Engine configuration: the node set and the tuning constants.
//!
//! Supplied once at construction and never mutated afterwards. JSON field
//! names are camelCase so the same document can come straight from the
//! webview.

use crate::geometry::{Containment, DEFAULT_MAX_RADIUS};
use crate::model::{NodeSpec, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Distance moved by one arrow-key press, in layout units.
pub const DEFAULT_NUDGE_STEP: f64 = 8.0;

/// Storage slot the layout is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "pearl-node-positions";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one node must be configured")]
    NoNodes,
    #[error("node ids must not be empty")]
    EmptyId,
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    #[error("containment radius must be a positive number, got {0}")]
    InvalidRadius(f64),
    #[error("nudge step must be a positive number, got {0}")]
    InvalidStep(f64),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("default position of node `{0}` is not finite")]
    NonFiniteDefault(String),
    #[error(
        "default position of node `{id}` is {distance:.1} units from the anchor, \
         outside the containment radius {max_radius}"
    )]
    DefaultOutsideRadius {
        id: String,
        distance: f64,
        max_radius: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    pub nodes: Vec<NodeSpec>,
    pub max_radius: f64,
    pub nudge_step: f64,
    pub storage_key: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            max_radius: DEFAULT_MAX_RADIUS,
            nudge_step: DEFAULT_NUDGE_STEP,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl GraphConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GraphConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with a different node set.
    pub fn with_nodes(nodes: Vec<NodeSpec>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn containment(&self) -> Containment {
        Containment::new(self.max_radius)
    }

    /// Check the configuration before any engine state is built from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_radius.is_finite() && self.max_radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.max_radius));
        }
        if !(self.nudge_step.is_finite() && self.nudge_step > 0.0) {
            return Err(ConfigError::InvalidStep(self.nudge_step));
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }

        let containment = self.containment();
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let id = node.id.as_str();
            if id.is_empty() {
                return Err(ConfigError::EmptyId);
            }
            if !seen.insert(node.id) {
                return Err(ConfigError::DuplicateId(id.to_string()));
            }
            if !node.default_position.is_finite() {
                return Err(ConfigError::NonFiniteDefault(id.to_string()));
            }
            if !containment.contains(node.default_position) {
                return Err(ConfigError::DefaultOutsideRadius {
                    id: id.to_string(),
                    distance: node.default_position.distance(),
                    max_radius: self.max_radius,
                });
            }
        }
        Ok(())
    }
}

/// The stock four-satellite layout.
pub fn default_nodes() -> Vec<NodeSpec> {
    vec![
        NodeSpec::new("diagnostician", "Diagnostician", Position::new(-180.0, -100.0))
            .with_asset("/src/assets/diagnose.png"),
        NodeSpec::new("prescriber", "Prescriber", Position::new(180.0, -100.0))
            .with_asset("/src/assets/prescribe.png"),
        NodeSpec::new("drawback", "DrawBack Tester", Position::new(-150.0, 140.0))
            .with_asset("/src/assets/drawback tester.png"),
        NodeSpec::new("nlp", "NLP", Position::new(150.0, 140.0)).with_asset("/src/assets/NLP.png"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = GraphConfig::default();
        config.validate().unwrap();
        assert_eq!(config.nodes.len(), 4);
        for node in &config.nodes {
            assert!(
                node.default_position.distance() < config.max_radius,
                "{} default outside radius",
                node.id
            );
        }
    }

    #[test]
    fn rejects_default_outside_radius() {
        let config = GraphConfig::with_nodes(vec![NodeSpec::new(
            "cfg_far",
            "Far",
            Position::new(300.0, 0.0),
        )]);
        match config.validate() {
            Err(ConfigError::DefaultOutsideRadius { id, max_radius, .. }) => {
                assert_eq!(id, "cfg_far");
                assert_eq!(max_radius, 250.0);
            }
            other => panic!("expected DefaultOutsideRadius, got {other:?}"),
        }
    }

    #[test]
    fn default_on_boundary_is_allowed() {
        let config = GraphConfig::with_nodes(vec![NodeSpec::new(
            "cfg_edge",
            "Edge",
            Position::new(0.0, 250.0),
        )]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        let dup = GraphConfig::with_nodes(vec![
            NodeSpec::new("cfg_dup", "One", Position::ORIGIN),
            NodeSpec::new("cfg_dup", "Two", Position::ORIGIN),
        ]);
        assert!(matches!(dup.validate(), Err(ConfigError::DuplicateId(id)) if id == "cfg_dup"));

        let empty = GraphConfig::with_nodes(vec![NodeSpec::new("", "Blank", Position::ORIGIN)]);
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyId)));

        assert!(matches!(
            GraphConfig::with_nodes(Vec::new()).validate(),
            Err(ConfigError::NoNodes)
        ));
    }

    #[test]
    fn rejects_bad_constants() {
        let config = GraphConfig {
            max_radius: 0.0,
            ..GraphConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRadius(_))));

        let config = GraphConfig {
            nudge_step: f64::NAN,
            ..GraphConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStep(_))));
    }

    #[test]
    fn parses_camel_case_json() {
        let config = GraphConfig::from_json(
            r#"{
                "maxRadius": 120,
                "nodes": [
                    { "id": "cfg_json", "label": "Json", "defaultPos": { "x": 10, "y": -20 }, "src": "/a.png" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_radius, 120.0);
        assert_eq!(config.nudge_step, DEFAULT_NUDGE_STEP);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.nodes[0].asset.as_deref(), Some("/a.png"));
        assert_eq!(config.nodes[0].default_position, Position::new(10.0, -20.0));
    }

    #[test]
    fn from_json_validates() {
        let err = GraphConfig::from_json(r#"{ "nodes": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoNodes));
        let err = GraphConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
