use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{config::ConfigStore, error::Res, spotify::auth::Authenticator, types::Token};

/// Refresh this long before the provider would reject the token.
const EXPIRY_MARGIN_SECS: i64 = 240;

/// Owns the live token while the poll loop runs.
///
/// Refreshed tokens are written through the config store so the next start
/// can reuse them.
pub struct TokenManager {
    token: Token,
    store: ConfigStore,
    authenticator: Arc<Authenticator>,
}

impl TokenManager {
    pub fn new(token: Token, store: ConfigStore, authenticator: Arc<Authenticator>) -> Self {
        TokenManager {
            token,
            store,
            authenticator,
        }
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    ///
    /// A failed refresh is logged and the old token is handed out anyway; the
    /// provider's rejection then surfaces on the actual request.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() && !self.token.refresh_token.is_empty() {
            match self.authenticator.refresh(&self.token.refresh_token).await {
                Ok(new_token) => {
                    tracing::info!(expiry = %new_token.expiry, "access token refreshed");
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        tracing::error!(error = %e, "can not save refreshed token");
                    }
                }
                Err(e) => tracing::error!(error = %e, "can not refresh access token"),
            }
        }

        self.token.access_token.clone()
    }

    pub async fn persist(&mut self) -> Res<()> {
        self.store.save_token(&self.token).await
    }

    fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.token.expiry
    }
}
