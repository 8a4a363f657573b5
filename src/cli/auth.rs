use std::{net::SocketAddr, str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    config::{Config, ConfigStore},
    error::{Error, Res},
    notice,
    spotify::{
        self,
        auth::{Authenticator, LOGIN_SERVER_ADDRESS},
    },
    types::Token,
};

/// The cached token, if it can be used as-is at `now`.
pub fn cached_token(config: &Config, now: DateTime<Utc>) -> Option<Token> {
    config.token().filter(|token| token.is_valid_at(now))
}

/// Returns a usable token, logging in through the browser only when needed.
///
/// A cached, unexpired token is returned untouched. Otherwise (or when
/// `force` is set) the interactive login runs and its token is written into
/// the config file before returning.
pub async fn ensure_token(
    store: &mut ConfigStore,
    authenticator: Arc<Authenticator>,
    force: bool,
) -> Res<Token> {
    if !force {
        if let Some(token) = cached_token(store.config(), Utc::now()) {
            tracing::debug!(expiry = %token.expiry, "reusing cached access token");
            return Ok(token);
        }
    }

    notice!("No valid access token cached, starting Spotify login");
    let addr = SocketAddr::from_str(LOGIN_SERVER_ADDRESS).map_err(|_| Error::InvalidValue {
        key: "login_server_address",
        value: LOGIN_SERVER_ADDRESS.to_string(),
    })?;

    let timeout = store.config().login_timeout();
    let token = spotify::auth::login(authenticator, addr, timeout).await?;
    store.save_token(&token).await?;
    tracing::info!(expiry = %token.expiry, "login completed");

    Ok(token)
}
