//! Iterative community growth: each round restricts the medium per model,
//! grows every model independently, and feeds the secreted compounds into the
//! next round's medium.
//!
//! Models within a round never see each other's secretions; cross-feeding only
//! takes effect from one round to the next.

pub mod builder;
pub mod engine;
pub mod state;

pub use builder::IterationBuilder;
pub use engine::{iterate_growth_and_secretion, IterationEngine};
pub use state::{ModelOutcome, RoundOutcome, SkipReason};
