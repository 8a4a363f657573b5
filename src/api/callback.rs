use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tokio::sync::{Mutex, oneshot};

use crate::{
    error::{Error, Res},
    spotify::auth::Authenticator,
    types::Token,
};

const SUCCESS_PAGE: &str = "Success! Back to cli.<script>setTimeout(window.close, 5000);</script>";

/// Shared between the login flow and the callback handler.
///
/// The sender is taken by the first callback that produces an outcome, so the
/// login flow receives exactly one message.
pub struct CallbackState {
    expected_state: String,
    authenticator: Arc<Authenticator>,
    sender: Mutex<Option<oneshot::Sender<Res<Token>>>>,
}

impl CallbackState {
    pub fn new(
        expected_state: impl Into<String>,
        authenticator: Arc<Authenticator>,
        sender: oneshot::Sender<Res<Token>>,
    ) -> Self {
        Self {
            expected_state: expected_state.into(),
            authenticator,
            sender: Mutex::new(Some(sender)),
        }
    }

    async fn deliver(&self, outcome: Res<Token>) {
        match self.sender.lock().await.take() {
            Some(sender) => {
                if sender.send(outcome).is_err() {
                    tracing::warn!("login flow stopped listening before the callback arrived");
                }
            }
            None => tracing::warn!("ignoring callback, login already completed"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<Arc<CallbackState>>,
) -> Response {
    if let Some(reason) = params.error {
        tracing::error!(reason = %reason, "authorization denied by provider");
        shared_state
            .deliver(Err(Error::AuthorizationDenied(reason)))
            .await;
        return (StatusCode::FORBIDDEN, "Couldn't get token").into_response();
    }

    if params.state.as_deref() != Some(shared_state.expected_state.as_str()) {
        tracing::error!(state = ?params.state, "callback state does not match");
        shared_state.deliver(Err(Error::StateMismatch)).await;
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    }

    let Some(code) = params.code else {
        shared_state.deliver(Err(Error::MissingCode)).await;
        return (StatusCode::FORBIDDEN, "Couldn't get token").into_response();
    };

    match shared_state.authenticator.exchange_code(&code).await {
        Ok(token) => {
            shared_state.deliver(Ok(token)).await;
            Html(SUCCESS_PAGE).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "token exchange failed");
            shared_state.deliver(Err(e)).await;
            (StatusCode::FORBIDDEN, "Couldn't get token").into_response()
        }
    }
}
