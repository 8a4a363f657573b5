//! # CLI Module
//!
//! Startup steps the binary strings together:
//!
//! ```text
//! config (load, merge, validate, save)
//!     ↓
//! ensure_token (cached token or browser login)
//!     ↓
//! run (poll loop, never returns)
//! ```
//!
//! - [`ensure_token`] - Reuses a cached, unexpired token or runs the login
//! - [`cached_token`] - The reuse decision on its own
//! - [`run`] - Wires the Spotify client and the feed into the poller

mod auth;
mod run;

pub use auth::cached_token;
pub use auth::ensure_token;
pub use run::run;
