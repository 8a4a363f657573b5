#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tchmusic::{
    Error, Res,
    feed::Feed,
    provider::Provider,
    types::{Artist, Device, PlayerState, Song, Track},
};

/// In-memory provider that records every call it receives.
#[derive(Default)]
pub struct FakeProvider {
    pub playing: bool,
    pub current_device: Option<String>,
    pub search_results: Vec<Track>,
    pub top_artists: Option<Vec<Artist>>,
    pub recommendations: Vec<Track>,
    pub devices: Vec<Device>,
    pub fail_player_state: bool,
    pub calls: Mutex<Vec<String>>,
    pub played: Mutex<Vec<(String, Option<String>)>>,
    pub seed_requests: Mutex<Vec<Vec<String>>>,
}

impl FakeProvider {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn played(&self) -> Vec<(String, Option<String>)> {
        self.played.lock().unwrap().clone()
    }

    pub fn seed_requests(&self) -> Vec<Vec<String>> {
        self.seed_requests.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn player_state(&self) -> Res<PlayerState> {
        self.record("player_state");
        if self.fail_player_state {
            return Err(Error::Api {
                status: reqwest::StatusCode::UNAUTHORIZED,
                message: "The access token expired".to_string(),
            });
        }

        Ok(PlayerState {
            is_playing: self.playing,
            device: Device {
                id: self.current_device.clone(),
                ..Default::default()
            },
        })
    }

    async fn search_tracks(&self, _query: &str, _market: &str, limit: u32) -> Res<Vec<Track>> {
        self.record("search");
        Ok(self
            .search_results
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn top_artists(&self) -> Res<Vec<Artist>> {
        self.record("top_artists");
        self.top_artists.clone().ok_or(Error::Api {
            status: reqwest::StatusCode::FORBIDDEN,
            message: "Insufficient client scope".to_string(),
        })
    }

    async fn recommendations(&self, seed_genres: &[String]) -> Res<Vec<Track>> {
        self.record("recommendations");
        self.seed_requests.lock().unwrap().push(seed_genres.to_vec());
        Ok(self.recommendations.clone())
    }

    async fn devices(&self) -> Res<Vec<Device>> {
        self.record("devices");
        Ok(self.devices.clone())
    }

    async fn play(&self, uri: &str, device_id: Option<&str>) -> Res<()> {
        self.record("play");
        self.played
            .lock()
            .unwrap()
            .push((uri.to_string(), device_id.map(str::to_string)));
        Ok(())
    }
}

/// Feed stub returning a fixed song and counting fetches.
#[derive(Default)]
pub struct FakeFeed {
    pub song: Option<Song>,
    pub fail: bool,
    pub fetches: Mutex<usize>,
}

impl FakeFeed {
    pub fn playing(name: &str, artist: &str) -> Self {
        Self {
            song: Some(song(name, artist)),
            ..Default::default()
        }
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl Feed for FakeFeed {
    async fn current(&self) -> Res<Option<Song>> {
        *self.fetches.lock().unwrap() += 1;
        if self.fail {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "feed timed out",
            )));
        }
        Ok(self.song.clone())
    }
}

pub fn song(name: &str, artist: &str) -> Song {
    Song {
        name: name.to_string(),
        artist: artist.to_string(),
        ..Default::default()
    }
}

pub fn track(name: &str) -> Track {
    Track {
        id: Some(format!("{}-id", name)),
        name: name.to_string(),
        uri: format!("spotify:track:{}", name),
    }
}

pub fn artist(id: &str, genres: &[&str]) -> Artist {
    Artist {
        id: id.to_string(),
        name: id.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn device(id: &str) -> Device {
    Device {
        id: Some(id.to_string()),
        name: format!("{} speaker", id),
        is_active: false,
        kind: "Speaker".to_string(),
    }
}
