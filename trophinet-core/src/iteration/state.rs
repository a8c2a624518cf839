use crate::{medium::Medium, secretion::SecretionTable};
use trophinet_schemas::growth::{GrowthRecord, OutcomeRecord, OutcomeStatus};

/// Why a model did not take part in a round.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Optimization succeeded but the growth rate was not strictly positive.
    NoGrowth(f64),
    /// The optimization could not be solved under the assigned medium.
    Infeasible(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    /// Grew and secreted at least one compound.
    Secreting { growth: f64, compounds: usize },
    /// Grew but contributed no secretion column. `detail` carries the profile
    /// error when the profile query itself failed.
    Silent { growth: f64, detail: Option<String> },
    Skipped(SkipReason),
}

impl ModelOutcome {
    pub fn grew(&self) -> bool {
        !matches!(self, ModelOutcome::Skipped(_))
    }
}

/// Everything a single growth round produced.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round: usize,
    /// The medium the round was run against.
    pub medium: Medium,
    /// `medium` plus every compound secreted this round.
    pub next_medium: Medium,
    /// Growth of every model that grew, in model order.
    pub growths: Vec<GrowthRecord>,
    pub secretions: SecretionTable,
    /// One entry per model, in model order.
    pub outcomes: Vec<(String, ModelOutcome)>,
}

impl RoundOutcome {
    pub fn growing_models(&self) -> impl Iterator<Item = &str> {
        self.growths.iter().map(|g| g.gsmm.as_str())
    }

    /// The medium stopped expanding: nothing new was secreted.
    pub fn reached_fixed_point(&self) -> bool {
        self.medium.same_compounds(&self.next_medium)
    }

    pub fn outcome_records(&self) -> Vec<OutcomeRecord> {
        self.outcomes
            .iter()
            .map(|(model_id, outcome)| {
                let (status, growth, detail) = match outcome {
                    ModelOutcome::Secreting { growth, compounds } => (
                        OutcomeStatus::Grew,
                        Some(*growth),
                        Some(format!("{} compounds secreted", compounds)),
                    ),
                    ModelOutcome::Silent { growth, detail } => {
                        (OutcomeStatus::EmptySecretion, Some(*growth), detail.clone())
                    }
                    ModelOutcome::Skipped(SkipReason::NoGrowth(growth)) => {
                        (OutcomeStatus::NoGrowth, Some(*growth), None)
                    }
                    ModelOutcome::Skipped(SkipReason::Infeasible(reason)) => {
                        (OutcomeStatus::Infeasible, None, Some(reason.clone()))
                    }
                };
                OutcomeRecord {
                    gsmm: model_id.clone(),
                    status,
                    growth,
                    detail,
                }
            })
            .collect()
    }
}
