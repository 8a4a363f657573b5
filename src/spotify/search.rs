use crate::{
    error::Res,
    spotify::SpotifyClient,
    types::{Artist, RecommendationsResponse, SearchResponse, TopArtistsResponse, Track},
};

impl SpotifyClient {
    /// Searches the catalog for tracks.
    ///
    /// # Arguments
    ///
    /// * `query` - Search expression, e.g. `track:Yellow artist:Coldplay`
    /// * `market` - ISO 3166-1 country code the results must be playable in
    /// * `limit` - Maximum number of tracks to return
    pub async fn search_track(&self, query: &str, market: &str, limit: u32) -> Res<Vec<Track>> {
        let limit = limit.to_string();
        let request = self.http.get(self.url("/search")).query(&[
            ("q", query),
            ("type", "track"),
            ("market", market),
            ("limit", limit.as_str()),
        ]);

        let res = self.send(request).await?;
        Ok(res.json::<SearchResponse>().await?.tracks.items)
    }

    pub async fn get_top_artists(&self) -> Res<Vec<Artist>> {
        let res = self.send(self.http.get(self.url("/me/top/artists"))).await?;
        Ok(res.json::<TopArtistsResponse>().await?.items)
    }

    /// Asks for tracks seeded by genre only.
    pub async fn get_recommendations(&self, seed_genres: &[String]) -> Res<Vec<Track>> {
        let seeds = seed_genres.join(",");
        let request = self
            .http
            .get(self.url("/recommendations"))
            .query(&[("seed_genres", seeds.as_str())]);

        let res = self.send(request).await?;
        Ok(res.json::<RecommendationsResponse>().await?.tracks)
    }
}
