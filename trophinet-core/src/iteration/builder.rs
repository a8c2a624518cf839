use crate::{
    artifacts::ArtifactStore,
    error::TrophicError,
    iteration::engine::IterationEngine,
    medium::Medium,
    model::MetabolicModel,
};
use std::collections::BTreeMap;

/// Number of rounds run when none is configured.
pub const DEFAULT_ROUNDS: usize = 5;

/// A fluent builder for constructing an `IterationEngine`.
///
/// Models and an initial medium are required; everything else has a default.
pub struct IterationBuilder<M> {
    models: Vec<M>,
    initial_medium: Option<Medium>,
    rounds: usize,
    supplements: BTreeMap<usize, Medium>,
    stop_at_fixed_point: bool,
    store: Option<ArtifactStore>,
}

impl<M: MetabolicModel> Default for IterationBuilder<M> {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            initial_medium: None,
            rounds: DEFAULT_ROUNDS,
            supplements: BTreeMap::new(),
            stop_at_fixed_point: false,
            store: None,
        }
    }
}

impl<M: MetabolicModel> IterationBuilder<M> {
    /// Creates a new, empty `IterationBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the community models. They are mutated in place every round.
    pub fn with_models(mut self, models: Vec<M>) -> Self {
        self.models = models;
        self
    }

    /// Sets the medium for the first round.
    pub fn with_initial_medium(mut self, medium: Medium) -> Self {
        self.initial_medium = Some(medium);
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Merges `medium` into the running medium right before `round` starts.
    /// Entries already in the running medium keep their bounds.
    pub fn with_supplement(mut self, round: usize, medium: Medium) -> Self {
        let merged = match self.supplements.remove(&round) {
            Some(existing) => existing.merged_with(&medium),
            None => medium,
        };
        self.supplements.insert(round, merged);
        self
    }

    /// Stops early once a round adds no new compound to the medium.
    pub fn stop_at_fixed_point(mut self, stop: bool) -> Self {
        self.stop_at_fixed_point = stop;
        self
    }

    /// Persists every round's tables into `store`.
    pub fn with_artifact_store(mut self, store: ArtifactStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Consumes the builder and returns a configured `IterationEngine`.
    ///
    /// # Errors
    ///
    /// Returns a `TrophicError` if no models or no initial medium were provided,
    /// if no rounds are requested, or if a supplement targets a round that will never run.
    pub fn build(self) -> Result<IterationEngine<M>, TrophicError> {
        if self.models.is_empty() {
            return Err(TrophicError::NoModelProvided);
        }
        if self.rounds == 0 {
            return Err(TrophicError::ConfigError(
                "at least one round is required".to_string(),
            ));
        }
        if let Some(round) = self
            .supplements
            .keys()
            .find(|&&round| round == 0 || round > self.rounds)
        {
            return Err(TrophicError::ConfigError(format!(
                "supplement scheduled for round {} outside 1..={}",
                round, self.rounds
            )));
        }

        Ok(IterationEngine {
            models: self.models,
            initial_medium: self.initial_medium.ok_or(TrophicError::MediumNotDefined)?,
            rounds: self.rounds,
            supplements: self.supplements,
            stop_at_fixed_point: self.stop_at_fixed_point,
            store: self.store,
        })
    }
}
