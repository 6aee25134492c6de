use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityHeadersError {
    #[error("Invalid {origin} URL '{url}': {source}")]
    InvalidUrl {
        origin: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{origin} URL '{url}' has no host")]
    MissingHost { origin: &'static str, url: String },

    #[error("Content-Security-Policy references HOSTS but no legitimate hosts were resolved")]
    EmptyHostSet,

    #[error("Invalid value for header {header}: {value:?}")]
    InvalidHeaderValue { header: &'static str, value: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
