//! Turns a feed song into a playing track.
//!
//! An exact catalog match wins. Otherwise a recommendation seeded with genres
//! from the user's top artists is played instead. The seed genres are derived
//! once and then kept by the caller in a [`GenreSeeds`] for the rest of the
//! process.

use crate::{
    error::{Error, Res},
    provider::Provider,
    types::{Song, Track},
    utils,
};

pub const SEARCH_LIMIT: u32 = 1;

/// Seed genres for recommendations, computed on first use.
#[derive(Debug, Clone, Default)]
pub struct GenreSeeds {
    genres: Option<Vec<String>>,
}

impl GenreSeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&[String]> {
        self.genres.as_deref()
    }

    /// Returns the cached genres, asking the provider for the user's top
    /// artists the first time.
    ///
    /// A failed lookup, or top artists without any genre, falls back to
    /// [`utils::DEFAULT_GENRE`]. Either way the result is cached.
    pub async fn get_or_init(&mut self, provider: &dyn Provider) -> &[String] {
        if self.genres.is_none() {
            let genres = match provider.top_artists().await {
                Ok(artists) => {
                    let genres = utils::collect_seed_genres(&artists);
                    if genres.is_empty() {
                        tracing::warn!("top artists carry no genres, using default seed");
                        utils::default_seed_genres()
                    } else {
                        genres
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "can not fetch top artists");
                    utils::default_seed_genres()
                }
            };
            self.genres = Some(genres);
        }

        self.genres.as_deref().unwrap_or_default()
    }
}

/// Picks the track to play for `song`.
///
/// # Errors
///
/// Propagates provider errors from search or recommendations, and returns
/// [`Error::NoSong`] when the recommendation comes back empty.
pub async fn resolve_track(
    provider: &dyn Provider,
    song: &Song,
    market: &str,
    seeds: &mut GenreSeeds,
) -> Res<Track> {
    let query = utils::build_search_query(song);
    let found = provider.search_tracks(&query, market, SEARCH_LIMIT).await?;
    if let Some(track) = found.into_iter().next() {
        return Ok(track);
    }

    tracing::info!(song = %song.name, "song not found");
    let genres = seeds.get_or_init(provider).await;
    let recommended = provider.recommendations(genres).await?;
    let track = recommended.into_iter().next().ok_or(Error::NoSong)?;
    tracing::info!(genres = %genres.join(","), "recommend a song in genre");

    Ok(track)
}

/// Device to target for playback, if any.
///
/// Only when the player already reports a current device are the available
/// devices listed, and the first of them is chosen. With no current device the
/// play command goes out without a device id.
pub async fn select_device(provider: &dyn Provider) -> Res<Option<String>> {
    let state = provider.player_state().await?;
    let has_current = state.device.id.as_deref().is_some_and(|id| !id.is_empty());
    if !has_current {
        return Ok(None);
    }

    let devices = provider.devices().await?;
    let first = devices.into_iter().next().ok_or(Error::NoDevice)?;
    Ok(first.id)
}

/// Resolves `song` and starts playing it. Returns the track that was played.
pub async fn play_song(
    provider: &dyn Provider,
    song: &Song,
    market: &str,
    seeds: &mut GenreSeeds,
) -> Res<Track> {
    let track = resolve_track(provider, song, market, seeds).await?;
    tracing::info!(play = %track.name, "playing");

    let device_id = select_device(provider).await?;
    provider.play(&track.uri, device_id.as_deref()).await?;

    Ok(track)
}
