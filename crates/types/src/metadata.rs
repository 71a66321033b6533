//! Display metadata for simulated nodes.
//!
//! Protocol logic never reads these fields; they exist for the presentation
//! layer that draws the network graph.

use serde::{Deserialize, Serialize};

/// Position of a node in the network graph, as fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a position, clamping both coordinates into `[0, 1]`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }
}

/// Name, position and color of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub name: String,
    pub position: Position,
    pub color: String,
}

impl NodeMetadata {
    pub fn new(name: impl Into<String>, position: Position, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position,
            color: color.into(),
        }
    }
}
