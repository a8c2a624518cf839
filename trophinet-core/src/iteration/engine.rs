use super::state::{ModelOutcome, RoundOutcome, SkipReason};
use crate::{
    artifacts::ArtifactStore,
    error::TrophicError,
    medium::Medium,
    model::{MetabolicModel, SecretionProfile},
    secretion::SecretionTable,
};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use trophinet_schemas::growth::GrowthRecord;

/// Runs one growth round of every model against `medium`.
///
/// Each model gets its own restriction of `medium`; no model sees what another
/// secretes in the same round. A model that fails to optimize or does not grow
/// is recorded as skipped and contributes nothing.
pub fn iterate_growth_and_secretion<M: MetabolicModel>(
    round: usize,
    models: &mut [M],
    medium: &Medium,
) -> RoundOutcome {
    let mut growths = Vec::new();
    let mut secretions = SecretionTable::new();
    let mut outcomes = Vec::with_capacity(models.len());

    for model in models.iter_mut() {
        let model_id = model.id().to_string();
        let restricted = medium.restrict_to(model.exchange_ids());
        model.set_medium(restricted);

        let growth = match model.optimize_growth() {
            Ok(growth) if growth > 0.0 => growth,
            Ok(growth) => {
                debug!("Round {}: model '{}' did not grow ({})", round, model_id, growth);
                outcomes.push((model_id, ModelOutcome::Skipped(SkipReason::NoGrowth(growth))));
                continue;
            }
            Err(e) => {
                debug!("Round {}: model '{}' skipped: {}", round, model_id, e);
                outcomes.push((
                    model_id,
                    ModelOutcome::Skipped(SkipReason::Infeasible(e.to_string())),
                ));
                continue;
            }
        };
        growths.push(GrowthRecord {
            gsmm: model_id.clone(),
            growth,
        });

        let outcome = match model.secretion_profile() {
            Ok(profile) => {
                let secreted = net_secretions(profile);
                if secretions.add_profile(&model_id, &secreted) {
                    ModelOutcome::Secreting {
                        growth,
                        compounds: secreted.len(),
                    }
                } else {
                    ModelOutcome::Silent {
                        growth,
                        detail: None,
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Round {}: model '{}' grew but its secretion profile failed: {}",
                    round, model_id, e
                );
                ModelOutcome::Silent {
                    growth,
                    detail: Some(e.to_string()),
                }
            }
        };
        outcomes.push((model_id, outcome));
    }

    let next_medium = medium.with_compounds(secretions.compounds());
    info!(
        "Round {}: {}/{} models grew, medium {} -> {} compounds",
        round,
        growths.len(),
        models.len(),
        medium.len(),
        next_medium.len()
    );

    RoundOutcome {
        round,
        medium: medium.clone(),
        next_medium,
        growths,
        secretions,
        outcomes,
    }
}

fn net_secretions(profile: SecretionProfile) -> SecretionProfile {
    profile
        .into_iter()
        .filter(|(_, range)| range.is_net_secretion())
        .collect()
}

/// Drives a fixed number of growth rounds, each fed by the previous round's medium.
pub struct IterationEngine<M> {
    pub(super) models: Vec<M>,
    pub(super) initial_medium: Medium,
    pub(super) rounds: usize,
    pub(super) supplements: BTreeMap<usize, Medium>,
    pub(super) stop_at_fixed_point: bool,
    pub(super) store: Option<ArtifactStore>,
}

impl<M: MetabolicModel> IterationEngine<M> {
    /// Runs every round. When a store is configured, round tables of any earlier
    /// run are removed first, and a round's artifacts are on disk before the
    /// next round starts.
    pub fn run(&mut self) -> Result<Vec<RoundOutcome>, TrophicError> {
        if let Some(store) = &self.store {
            store.clear_rounds()?;
        }
        let mut medium = self.initial_medium.clone();
        let mut outcomes = Vec::with_capacity(self.rounds);

        for round in 1..=self.rounds {
            if let Some(supplement) = self.supplements.get(&round) {
                info!(
                    "Round {}: supplementing medium with {} compounds",
                    round,
                    supplement.len()
                );
                medium = medium.merged_with(supplement);
            }

            let outcome = iterate_growth_and_secretion(round, &mut self.models, &medium);
            if let Some(store) = &self.store {
                store.record_round(&outcome)?;
            }

            let settled = outcome.reached_fixed_point() && !self.has_supplement_after(round);
            medium = outcome.next_medium.clone();
            outcomes.push(outcome);

            if settled && self.stop_at_fixed_point {
                info!("Medium reached a fixed point after round {}", round);
                break;
            }
        }
        Ok(outcomes)
    }

    pub fn models(&self) -> &[M] {
        &self.models
    }

    fn has_supplement_after(&self, round: usize) -> bool {
        self.supplements.range(round + 1..).next().is_some()
    }
}
