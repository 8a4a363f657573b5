use std::time::Duration;

use reqwest::StatusCode;

/// Everything that can go wrong between loading the config and issuing a
/// play command.
///
/// Startup code treats any of these as fatal; the poll loop logs them and
/// waits for the next tick.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider answered {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot locate home directory")]
    NoHomeDir,

    #[error("required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("state not match")]
    StateMismatch,

    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("authorization callback is missing the code parameter")]
    MissingCode,

    #[error("can not open browser: {0}")]
    Browser(std::io::Error),

    #[error("no login callback received within {0:?}")]
    LoginTimeout(Duration),

    #[error("login flow ended without a result")]
    LoginAbandoned,

    #[error("can not fetch song")]
    NoCurrentSong,

    #[error("no song")]
    NoSong,

    #[error("no device")]
    NoDevice,
}

/// Result alias used across the crate.
pub type Res<T> = std::result::Result<T, Error>;
