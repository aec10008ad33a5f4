use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuratorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream {source_tag} responded with status {status}")]
    Upstream { source_tag: String, status: u16 },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid artwork source: {0}")]
    InvalidSource(String),

    #[error("Artwork not found: {0}")]
    NotFound(String),

    #[error("Failed to normalize artwork: {0}")]
    Normalization(String),
}

pub type Result<T> = std::result::Result<T, CuratorError>;
