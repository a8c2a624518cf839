pub mod artifacts;
pub mod error;
pub mod iteration;
pub mod medium;
pub mod model;
pub mod network;
pub mod paths;
pub mod secretion;
pub mod tables;

pub use error::{ModelError, TrophicError};
pub use medium::{Medium, UNCONSTRAINED_FLUX};
