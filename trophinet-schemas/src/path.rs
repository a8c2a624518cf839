use serde::{Deserialize, Serialize};

/// The two kinds of node in a trophic graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Compound,
    Model,
}

/// A typed node as stored in a path snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathNode {
    pub id: String,
    pub kind: NodeKind,
}

/// exudate -> GSMM -> metabolite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmRecord {
    pub exudate: String,
    #[serde(rename = "GSMM1")]
    pub gsmm1: String,
    pub metabolite1: String,
    pub classification: String,
}

impl PmRecord {
    pub const HEADER: &'static [&'static str] = &["exudate", "GSMM1", "metabolite1", "classification"];
}

/// exudate -> GSMM -> metabolite -> GSMM -> metabolite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmmRecord {
    pub exudate: String,
    #[serde(rename = "GSMM1")]
    pub gsmm1: String,
    pub metabolite1: String,
    #[serde(rename = "GSMM2")]
    pub gsmm2: String,
    pub metabolite2: String,
    pub classification: String,
}

impl PmmRecord {
    pub const HEADER: &'static [&'static str] = &["exudate", "GSMM1", "metabolite1", "GSMM2", "metabolite2", "classification"];
}

/// Number of classified paths per course type and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCount {
    pub course: String,
    pub classification: String,
    pub count: usize,
}

impl ClassificationCount {
    pub const HEADER: &'static [&'static str] = &["course", "classification", "count"];
}
