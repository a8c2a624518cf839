use serde::{Deserialize, Serialize};

/// Direction of a trophic edge relative to the model it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// compound -> model
    Uptake,
    /// model -> compound
    Secretion,
}

/// One row of the network edge list (`from,to,kind`).
///
/// `kind` is optional so that edge lists written without it can still be read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: Option<EdgeKind>,
}

impl EdgeRecord {
    pub const HEADER: &'static [&'static str] = &["from", "to", "kind"];
}

/// A model that was left out of uptake re-derivation, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedModelRecord {
    #[serde(rename = "GSMM")]
    pub gsmm: String,
    pub reason: String,
}

impl SkippedModelRecord {
    pub const HEADER: &'static [&'static str] = &["GSMM", "reason"];
}
