//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs while the
//! user is logging in.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the provider's OAuth redirect (`code`, `state`,
//!   or `error`), checks the state, exchanges the code for a token and hands
//!   the outcome to the waiting login flow through [`CallbackState`].
//! - [`health`] - Reports that the server is up, with the crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use tchmusic::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback).layer(Extension(state)))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::{CallbackParams, CallbackState, callback};
pub use health::health;
