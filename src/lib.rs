//! The Coffee House radio, mirrored onto your Spotify player.
//!
//! This library logs a user into Spotify, then polls The Coffee House "now
//! playing" feed and, whenever the user's player sits idle, plays the same
//! song (or, failing an exact match, a genre-based recommendation).
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `cli` - Startup orchestration used by the binary
//! - `config` - YAML config file, environment and flag merging
//! - `error` - Crate error type and `Res` alias
//! - `feed` - Client for the "now playing" feed
//! - `management` - Token lifecycle during the poll loop
//! - `poller` - The five-second poll loop
//! - `provider` - Trait over the streaming service
//! - `resolver` - Song to track resolution and playback
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and OAuth flow
//! - `types` - Data structures and wire formats
//! - `utils` - Small helpers for queries and genre seeds
//!
//! # Example
//!
//! ```
//! use tchmusic::{config::{ConfigStore, Overrides}, Res};
//!
//! #[tokio::main]
//! async fn main() -> Res<()> {
//!     let mut store = ConfigStore::open(ConfigStore::default_path()?).await?;
//!     store.merge(&Overrides::default())?;
//!     store.config().validate()?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod management;
pub mod poller;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Res};

/// Prints an informational message with a blue bullet point.
///
/// Meant for the few lines the user has to read during login, as opposed to
/// log records.
///
/// # Example
///
/// ```
/// notice!("Waiting for authorization in your browser");
/// ```
#[macro_export]
macro_rules! notice {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Usable before logging is set up.
///
/// # Example
///
/// ```
/// warning!("can not load .env: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Logs an error record and exits the program with status 1.
///
/// Accepts the same arguments as `tracing::error!`, so structured fields can
/// be attached. Only for startup failures the program cannot continue from.
///
/// # Example
///
/// ```
/// fatal!(missing_fields = ?fields, "required fields missing");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! fatal {
  ($($arg:tt)*) => ({
    ::tracing::error!($($arg)*);
    ::std::process::exit(1)
  })
}
