use std::path::PathBuf;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Errors that can occur during preference save/load.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to read preferences from {}: {source}", path.display())]
    PrefsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse preferences from {}: {source}", path.display())]
    PrefsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
