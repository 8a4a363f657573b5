use reqwest::StatusCode;

use crate::{
    error::Res,
    spotify::SpotifyClient,
    types::{Device, DevicesResponse, PlayRequest, PlayerState},
};

impl SpotifyClient {
    /// Fetches the current playback state.
    ///
    /// Spotify answers `204 No Content` when nothing is active on any device;
    /// that is reported as a stopped player without a device.
    pub async fn get_player_state(&self) -> Res<PlayerState> {
        let res = self.send(self.http.get(self.url("/me/player"))).await?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(PlayerState::default());
        }

        let body = res.bytes().await?;
        if body.is_empty() {
            return Ok(PlayerState::default());
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get_devices(&self) -> Res<Vec<Device>> {
        let res = self
            .send(self.http.get(self.url("/me/player/devices")))
            .await?;
        Ok(res.json::<DevicesResponse>().await?.devices)
    }

    /// Starts playback of a single track URI.
    pub async fn play_uri(&self, uri: &str, device_id: Option<&str>) -> Res<()> {
        let mut request = self.http.put(self.url("/me/player/play")).json(&PlayRequest {
            uris: vec![uri.to_string()],
        });
        if let Some(device_id) = device_id {
            request = request.query(&[("device_id", device_id)]);
        }

        self.send(request).await?;
        Ok(())
    }
}
