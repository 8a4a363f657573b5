//! # Spotify Integration Module
//!
//! Typed access to the parts of the Spotify Web API that tchmusic needs, plus
//! the OAuth authorization code flow used to obtain a token in the first place.
//!
//! ## Architecture
//!
//! ```text
//! Poll loop / Track resolver
//!          ↓
//! Provider trait (crate::provider)
//!          ↓
//! SpotifyClient
//!     ├── Player (state, devices, play)
//!     ├── Catalog (search, top artists, recommendations)
//!     └── TokenManager (refresh + persist)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization URL, code exchange, token refresh and the
//!   interactive browser login backed by the local callback server.
//! - [`player`] - `GET /me/player`, `GET /me/player/devices`,
//!   `PUT /me/player/play`.
//! - [`search`] - `GET /search`, `GET /me/top/artists`,
//!   `GET /recommendations`.
//!
//! ## Error Handling
//!
//! Non-success responses are turned into [`Error::Api`] carrying the status
//! and the message from the provider's error body. There is no retry logic;
//! the poll loop simply tries again on its next tick.

pub mod auth;
pub mod player;
pub mod search;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tokio::sync::Mutex;

use crate::{
    error::{Error, Res},
    management::TokenManager,
    provider::Provider,
    types::{ApiErrorResponse, Artist, Device, PlayerState, Track},
};

pub const API_URL: &str = "https://api.spotify.com/v1";

/// Authenticated Web API client.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager) -> Self {
        Self::with_api_url(tokens, API_URL)
    }

    pub fn with_api_url(tokens: TokenManager, api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
            tokens: Mutex::new(tokens),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Sends `request` with a valid bearer token and maps error statuses.
    async fn send(&self, request: RequestBuilder) -> Res<Response> {
        let token = self.tokens.lock().await.get_valid_token().await;
        let res = request.bearer_auth(token).send().await?;
        check_status(res).await
    }
}

/// Passes successful responses through and turns the rest into [`Error::Api`].
async fn check_status(res: Response) -> Res<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await?;
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(err) if !err.error.message.is_empty() => err.error.message,
        _ => body,
    };
    Err(Error::Api { status, message })
}

#[async_trait]
impl Provider for SpotifyClient {
    async fn player_state(&self) -> Res<PlayerState> {
        self.get_player_state().await
    }

    async fn search_tracks(&self, query: &str, market: &str, limit: u32) -> Res<Vec<Track>> {
        self.search_track(query, market, limit).await
    }

    async fn top_artists(&self) -> Res<Vec<Artist>> {
        self.get_top_artists().await
    }

    async fn recommendations(&self, seed_genres: &[String]) -> Res<Vec<Track>> {
        self.get_recommendations(seed_genres).await
    }

    async fn devices(&self) -> Res<Vec<Device>> {
        self.get_devices().await
    }

    async fn play(&self, uri: &str, device_id: Option<&str>) -> Res<()> {
        self.play_uri(uri, device_id).await
    }
}
