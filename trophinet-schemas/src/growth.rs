use serde::{Deserialize, Serialize};

/// One row of a per-round growth table (`GSMM,growth`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    #[serde(rename = "GSMM")]
    pub gsmm: String,
    pub growth: f64,
}

impl GrowthRecord {
    pub const HEADER: &'static [&'static str] = &["GSMM", "growth"];
}

/// How a model took part in a growth round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Grew,
    NoGrowth,
    Infeasible,
    EmptySecretion,
}

/// Audit row for a single model in a single round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    #[serde(rename = "GSMM")]
    pub gsmm: String,
    pub status: OutcomeStatus,
    pub growth: Option<f64>,
    pub detail: Option<String>,
}

impl OutcomeRecord {
    pub const HEADER: &'static [&'static str] = &["GSMM", "status", "growth", "detail"];
}
