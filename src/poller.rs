use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::{
    error::{Error, Res},
    feed::Feed,
    provider::Provider,
    resolver::{self, GenreSeeds},
    types::Track,
};

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// What a single poll iteration ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// The player was already playing; nothing was touched.
    Busy,
    /// The player was idle and this track was started.
    Played(Track),
}

/// Keeps the user's player busy with whatever the feed is playing.
///
/// Owns the genre-seed cache so it survives across iterations.
pub struct Poller<P, F> {
    provider: P,
    feed: F,
    market: String,
    interval: Duration,
    seeds: GenreSeeds,
}

impl<P: Provider, F: Feed> Poller<P, F> {
    pub fn new(provider: P, feed: F, market: impl Into<String>) -> Self {
        Self {
            provider,
            feed,
            market: market.into(),
            interval: POLL_INTERVAL,
            seeds: GenreSeeds::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn seeds(&self) -> &GenreSeeds {
        &self.seeds
    }

    /// Runs one iteration: check the player, and if it is idle, play the
    /// feed's current song.
    pub async fn tick(&mut self) -> Res<Tick> {
        let state = self.provider.player_state().await?;
        if state.is_playing {
            tracing::debug!("player busy");
            return Ok(Tick::Busy);
        }

        let song = self.feed.current().await?.ok_or(Error::NoCurrentSong)?;
        tracing::info!(tch_song = %song.name, artist = %song.artist, "feed song");

        let track =
            resolver::play_song(&self.provider, &song, &self.market, &mut self.seeds).await?;
        Ok(Tick::Played(track))
    }

    /// Polls forever. The first iteration runs immediately; failures are
    /// logged and the loop waits for the next tick.
    pub async fn run(&mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.tick().await {
                Ok(Tick::Played(track)) => {
                    tracing::info!(track = %track.name, uri = %track.uri, "started playback")
                }
                Ok(Tick::Busy) => {}
                Err(e) => tracing::error!(error = %e, "poll iteration failed"),
            }
        }
    }
}
