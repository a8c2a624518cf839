use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrophicError {
    #[error("No model files found in '{0}'")]
    NoModelsFound(String),

    #[error("Model file for '{0}' not found")]
    ModelNotFound(String),

    #[error("Failed to load model from '{0}': {1}")]
    ModelLoad(String, String),

    #[error("At least one model must be provided for the iteration")]
    NoModelProvided,

    #[error("Initial medium is missing")]
    MediumNotDefined,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("Invalid value '{value}' in '{path}' at row {row}, column {col}")]
    InvalidValue {
        path: String,
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Malformed path {0:?}: {1}")]
    MalformedPath(Vec<String>, String),
}

/// Failures reported by a metabolic model for a single optimization.
///
/// These are per-model outcomes, not run failures: the iteration records them
/// and moves on to the next model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("optimization infeasible: {0}")]
    Infeasible(String),

    #[error("secretion profile requested before a successful optimization")]
    NotOptimized,
}
