//! Persisted form of a brain.
//!
//! The record mirrors the storage format
//! `{ "levels": [ { "weights": [[..]], "biases": [..] } ] }` with one weight
//! row per input neuron. It carries no shape guarantees of its own; use
//! [`super::Brain::from_record`] to validate it against a layout.

use serde::{Deserialize, Serialize};

/// Serialisable parameters of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// One row per input neuron, one column per output neuron.
    pub weights: Vec<Vec<f32>>,
    /// One bias per output neuron.
    pub biases: Vec<f32>,
}

/// Serialisable parameters of a whole brain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainRecord {
    /// Levels from input to output.
    pub levels: Vec<LevelRecord>,
}

impl BrainRecord {
    /// Serialises the record as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a record from JSON without validating its shape.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
