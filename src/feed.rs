//! Client for the third-party "now playing" feed.
//!
//! The feed is a public JSON endpoint describing what the store's radio plays
//! right now (plus the previous and next songs). It needs no authentication.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::Res,
    types::{MusicInfo, Song},
};

pub const FEED_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = "github.com:nguyenvanduocit/tchmusic+v1";

#[async_trait]
pub trait Feed: Send + Sync {
    /// The song playing right now, `None` when the feed has nothing current.
    async fn current(&self) -> Res<Option<Song>>;
}

pub struct MusicInfoFeed {
    http: Client,
    url: String,
}

impl MusicInfoFeed {
    pub fn new(url: impl Into<String>) -> Res<Self> {
        let http = Client::builder()
            .timeout(FEED_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub async fn fetch(&self) -> Res<MusicInfo> {
        let res = self.http.get(&self.url).send().await?.error_for_status()?;
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Feed for MusicInfoFeed {
    async fn current(&self) -> Res<Option<Song>> {
        let info = self.fetch().await?;
        Ok(current_song(info))
    }
}

/// Extracts the current song, treating a nameless entry as "nothing playing".
pub fn current_song(info: MusicInfo) -> Option<Song> {
    if info.current.name.trim().is_empty() {
        None
    } else {
        Some(info.current)
    }
}

