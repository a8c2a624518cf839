//! The model collaborator: the capability the iteration needs from a
//! genome-scale metabolic model, independent of the solver behind it.

pub mod profile;

use crate::{
    error::{ModelError, TrophicError},
    medium::Medium,
};
use std::collections::{BTreeMap, BTreeSet};

pub use profile::{ProfileModel, ProfileModelSource};

/// A flux interval from variability analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxRange {
    pub lower: f64,
    pub upper: f64,
}

impl FluxRange {
    /// Secretion is reported with a negative minimum flux.
    pub fn is_net_secretion(&self) -> bool {
        self.lower < 0.0
    }
}

/// Exchange id -> flux range under the assigned medium.
pub type SecretionProfile = BTreeMap<String, FluxRange>;

pub trait MetabolicModel {
    fn id(&self) -> &str;

    /// Every exchange reaction the model holds.
    fn exchange_ids(&self) -> &BTreeSet<String>;

    /// Replaces the model's medium. Invalidates any previous optimization.
    fn set_medium(&mut self, medium: Medium);

    /// Optimal growth rate under the current medium.
    fn optimize_growth(&mut self) -> Result<f64, ModelError>;

    /// Secretion flux ranges. Only valid after `optimize_growth` succeeded
    /// under the current medium.
    fn secretion_profile(&self) -> Result<SecretionProfile, ModelError>;
}

/// Where models come from.
pub trait ModelSource {
    type Model: MetabolicModel;

    /// Loads every model. Any unreadable or malformed model aborts the load.
    fn load_all(&self) -> Result<Vec<Self::Model>, TrophicError>;

    /// Loads one model by id.
    fn load(&self, model_id: &str) -> Result<Self::Model, TrophicError>;
}
