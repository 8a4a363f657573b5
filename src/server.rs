use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::task::JoinHandle;

use crate::{
    api::{self, CallbackState},
    error::Res,
    spotify::auth::LOGIN_CALLBACK_PATH,
};

/// Binds the login callback server on `addr` and serves it on a background task
/// until `shutdown` resolves.
///
/// Binding happens before this returns, so a port conflict surfaces as an
/// error here rather than inside the task. Returns the bound address.
pub async fn start_api_server<F>(
    addr: SocketAddr,
    state: Arc<CallbackState>,
    shutdown: F,
) -> Res<(SocketAddr, JoinHandle<()>)>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::debug!(addr = %local_addr, "callback server listening");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!(error = %e, "callback server failed");
        }
    });

    Ok((local_addr, handle))
}

pub fn router(state: Arc<CallbackState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(
            LOGIN_CALLBACK_PATH,
            get(api::callback).layer(Extension(state)),
        )
}
