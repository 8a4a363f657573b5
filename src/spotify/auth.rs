use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use tokio::sync::oneshot;

use crate::{
    api::CallbackState,
    error::{Error, Res},
    notice,
    server::start_api_server,
    types::{OAuthErrorResponse, Token, TokenResponse},
};

pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

pub const LOGIN_CALLBACK_PATH: &str = "/callback";
pub const LOGIN_SERVER_ADDRESS: &str = "127.0.0.1:8090";

/// Fixed `state` value sent with the authorization request and expected back
/// on the callback.
pub const STATE: &str = "2019-12-14T00:40:29+07:00";

pub const SCOPES: [&str; 4] = [
    "user-modify-playback-state",
    "user-read-playback-state",
    "user-read-currently-playing",
    "user-top-read",
];

/// Client side of the authorization code flow.
///
/// Holds the app credentials and knows how to build the authorization URL,
/// exchange a callback code, and refresh an access token.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: String,
    token_url: String,
    http: Client,
}

impl Authenticator {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: format!("http://{LOGIN_SERVER_ADDRESS}{LOGIN_CALLBACK_PATH}"),
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Points the authenticator at different accounts endpoints.
    pub fn with_endpoints(
        mut self,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.authorize_url = authorize_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Builds the URL the user has to visit to grant access.
    ///
    /// # Errors
    ///
    /// Fails only if the configured authorize endpoint is not a valid URL.
    pub fn authorize_url(&self, state: &str) -> Res<String> {
        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|_| Error::InvalidValue {
            key: "authorize_url",
            value: self.authorize_url.clone(),
        })?;

        Ok(url.into())
    }

    /// Exchanges an authorization code received on the callback for a token.
    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Trades a refresh token for a fresh access token.
    ///
    /// The provider may omit the refresh token from the response; the one
    /// passed in is kept in that case.
    pub async fn refresh(&self, refresh_token: &str) -> Res<Token> {
        let mut token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        if token.refresh_token.is_empty() {
            token.refresh_token = refresh_token.to_string();
        }
        Ok(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Res<Token> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await?;
            let message = match serde_json::from_str::<OAuthErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(Error::Api { status, message });
        }

        let json: TokenResponse = res.json().await?;
        Ok(Token {
            access_token: json.access_token,
            refresh_token: json.refresh_token.unwrap_or_default(),
            expiry: Utc::now() + chrono::Duration::seconds(json.expires_in),
        })
    }
}

/// Runs the interactive login and returns the obtained token.
///
/// The flow:
/// 1. Start the local callback server on `addr`
/// 2. Open the authorization URL in the default browser
/// 3. Wait for the callback handler to hand over the token (or an error)
/// 4. Shut the callback server down
///
/// Waits forever unless `timeout` is given.
///
/// # Errors
///
/// - The callback server cannot bind `addr`
/// - The browser cannot be launched
/// - The provider denies access, the state does not match, or the code
///   exchange fails
/// - `timeout` elapses first
pub async fn login(
    authenticator: Arc<Authenticator>,
    addr: SocketAddr,
    timeout: Option<Duration>,
) -> Res<Token> {
    let auth_url = authenticator.authorize_url(STATE)?;

    let (token_tx, token_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let state = Arc::new(CallbackState::new(STATE, authenticator, token_tx));

    let (_, server) = start_api_server(addr, state, async {
        let _ = shutdown_rx.await;
    })
    .await?;

    tracing::debug!(url = %auth_url, "opening browser");
    if let Err(e) = webbrowser::open(&auth_url) {
        let _ = shutdown_tx.send(());
        return Err(Error::Browser(e));
    }
    notice!("Waiting for authorization in your browser. If nothing opened, visit:\n{}", auth_url);

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for the login callback...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let outcome = wait_for_token(token_rx, timeout).await;

    pb.finish_and_clear();
    let _ = shutdown_tx.send(());
    if let Err(e) = server.await {
        tracing::warn!(error = %e, "callback server task ended abnormally");
    }

    outcome
}

async fn wait_for_token(
    token_rx: oneshot::Receiver<Res<Token>>,
    timeout: Option<Duration>,
) -> Res<Token> {
    let received = match timeout {
        Some(limit) => tokio::time::timeout(limit, token_rx)
            .await
            .map_err(|_| Error::LoginTimeout(limit))?,
        None => token_rx.await,
    };

    received.map_err(|_| Error::LoginAbandoned)?
}
