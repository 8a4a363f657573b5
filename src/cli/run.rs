use std::sync::Arc;

use crate::{
    config::ConfigStore,
    error::Res,
    feed::MusicInfoFeed,
    management::TokenManager,
    poller::Poller,
    spotify::{SpotifyClient, auth::Authenticator},
    types::Token,
};

/// Builds the clients and runs the poll loop. Only returns on setup failure.
pub async fn run(store: ConfigStore, authenticator: Arc<Authenticator>, token: Token) -> Res<()> {
    let market = store.config().market().to_string();
    let feed = MusicInfoFeed::new(store.config().feed_url())?;

    let tokens = TokenManager::new(token, store, authenticator);
    let client = SpotifyClient::new(tokens);

    tracing::info!(market = %market, "polling for idle player");
    Poller::new(client, feed, market).run().await;
    Ok(())
}
