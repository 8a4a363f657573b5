use std::collections::HashSet;

use crate::types::{Artist, Song};

/// Genre used when the user's top artists yield nothing to seed with.
pub const DEFAULT_GENRE: &str = "pop";

/// Recommendations accept at most this many seeds of one kind.
pub const MAX_SEED_GENRES: usize = 4;

/// Field-filtered catalog query for a feed song.
pub fn build_search_query(song: &Song) -> String {
    format!("track:{} artist:{}", song.name.trim(), song.artist.trim())
}

/// Collects genres across `artists` in order, without duplicates, capped at
/// [`MAX_SEED_GENRES`].
pub fn collect_seed_genres(artists: &[Artist]) -> Vec<String> {
    let mut seen = HashSet::new();
    artists
        .iter()
        .flat_map(|artist| artist.genres.iter())
        .map(|genre| genre.trim())
        .filter(|genre| !genre.is_empty())
        .filter(|genre| seen.insert(genre.to_string()))
        .take(MAX_SEED_GENRES)
        .map(str::to_string)
        .collect()
}

pub fn default_seed_genres() -> Vec<String> {
    vec![DEFAULT_GENRE.to_string()]
}
