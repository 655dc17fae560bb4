// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("client credentials rejected (check client id and secret)")]
    ClientCredentialsRejected,
    #[error("authorization failed (token or PIN invalid, or expired)")]
    AuthRejected,
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("network middleware error: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to decode the API response from '{url}': {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("the API reported an error: {0}")]
    Api(String),
    #[error("interrupted by user")]
    UserInterrupt,
    #[error("unknown error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
