//! HTTP surface: the check endpoints, CORS preflight, and method rejection.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::check::{IntegrationRequest, check_integration};
use crate::config::Config;
use crate::consts::{ROUTE_CHECK_INTEGRATION, ROUTE_TEST};
use crate::error::CheckError;
use crate::shopify::ShopApi;
use crate::shopify::http::HttpShopApi;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ShopApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: Arc<dyn ShopApi>, config: Config) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let check = post(check_handler)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new()
        .route(ROUTE_CHECK_INTEGRATION, check.clone())
        .route(ROUTE_TEST, check)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: Config) -> Result<()> {
    let api = HttpShopApi::from_config(&config)?;
    let bind_addr = config.bind_addr;
    let state = AppState::new(Arc::new(api), config);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "shopcheck listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}

async fn check_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let result = match IntegrationRequest::from_json(&body) {
        Ok(request) => {
            check_integration(state.api.as_ref(), &state.config.api_version, &request).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => cors_json(StatusCode::OK, report),
        Err(e) => e.into_response(),
    }
}

async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    CheckError::MethodNotAllowed.into_response()
}

fn cors_json<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(body)).into_response()
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() && !matches!(self, CheckError::Upstream { .. }) {
            tracing::error!(error = %self, "check failed");
        }
        cors_json(status, self.body())
    }
}
