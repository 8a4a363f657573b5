use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::Res,
    types::{Artist, Device, PlayerState, Track},
};

/// The slice of the streaming service the poll loop depends on.
///
/// [`crate::spotify::SpotifyClient`] is the real implementation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Current playback state. An idle account without a device reports
    /// `PlayerState::default()`.
    async fn player_state(&self) -> Res<PlayerState>;

    /// Catalog search restricted to tracks in `market`.
    async fn search_tracks(&self, query: &str, market: &str, limit: u32) -> Res<Vec<Track>>;

    /// The user's top artists.
    async fn top_artists(&self) -> Res<Vec<Artist>>;

    /// Tracks recommended for the given seed genres.
    async fn recommendations(&self, seed_genres: &[String]) -> Res<Vec<Track>>;

    /// Devices available for playback.
    async fn devices(&self) -> Res<Vec<Device>>;

    /// Starts playing `uri`, on `device_id` when given.
    async fn play(&self, uri: &str, device_id: Option<&str>) -> Res<()>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    async fn player_state(&self) -> Res<PlayerState> {
        (**self).player_state().await
    }

    async fn search_tracks(&self, query: &str, market: &str, limit: u32) -> Res<Vec<Track>> {
        (**self).search_tracks(query, market, limit).await
    }

    async fn top_artists(&self) -> Res<Vec<Artist>> {
        (**self).top_artists().await
    }

    async fn recommendations(&self, seed_genres: &[String]) -> Res<Vec<Track>> {
        (**self).recommendations(seed_genres).await
    }

    async fn devices(&self) -> Res<Vec<Device>> {
        (**self).devices().await
    }

    async fn play(&self, uri: &str, device_id: Option<&str>) -> Res<()> {
        (**self).play(uri, device_id).await
    }
}
