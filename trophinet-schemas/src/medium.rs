use serde::{Deserialize, Serialize};

/// One row of a medium table (`exchange,flux`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumEntry {
    pub exchange: String,
    pub flux: f64,
}

impl MediumEntry {
    pub const HEADER: &'static [&'static str] = &["exchange", "flux"];
}
