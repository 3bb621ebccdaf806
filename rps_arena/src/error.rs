use std::path::PathBuf;

/// Errors raised while selecting agents or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown agent '{0}' (expected one of: random, markov, q-learning, minimax, frequency)")]
    UnknownAgent(String),

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised while writing run results.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no {0} stats in simulation results")]
    MissingStats(&'static str),
}
