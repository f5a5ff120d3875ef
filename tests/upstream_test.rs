//! Checks against a local stand-in for the Shopify Admin API.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::get;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use shopcheck::check::{IntegrationRequest, check_integration};
use shopcheck::config::Config;
use shopcheck::error::CheckError;
use shopcheck::shopify::ShopApi;
use shopcheck::shopify::http::HttpShopApi;

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

async fn record(State(seen): State<Seen>, uri: Uri, headers: HeaderMap) {
    let token = headers
        .get("X-Shopify-Access-Token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.requests
        .lock()
        .unwrap()
        .push((uri.path().to_string(), token));
}

/// Serve `app` on an ephemeral port and return `host:port`.
async fn spawn_stub(app: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr.to_string())
}

async fn shop_stub(seen: Seen) -> Result<String> {
    let app = Router::new()
        .route(
            "/admin/api/2024-01/shop.json",
            get(|state: State<Seen>, uri: Uri, headers: HeaderMap| async move {
                record(state, uri, headers).await;
                axum::Json(json!({
                    "shop": {
                        "name": "Stub Shop",
                        "myshopify_domain": "stub.myshopify.com",
                        "shop_owner": "Stub Owner"
                    }
                }))
            }),
        )
        .with_state(seen);
    spawn_stub(app).await
}

#[tokio::test]
async fn sends_token_header_to_versioned_endpoint() -> Result<()> {
    let seen = Seen::default();
    let host = shop_stub(seen.clone()).await?;
    let api = HttpShopApi::from_config(&Config::for_tests())?;

    let response = api.fetch_shop(&host, "shpat_stub").await?;

    assert_eq!(response.status, 200);
    assert!(response.body.contains("Stub Shop"));
    assert_eq!(
        seen.requests.lock().unwrap().clone(),
        vec![(
            "/admin/api/2024-01/shop.json".to_string(),
            Some("shpat_stub".to_string())
        )]
    );
    Ok(())
}

#[tokio::test]
async fn full_check_against_stub() -> Result<()> {
    let host = shop_stub(Seen::default()).await?;
    let config = Config::for_tests();
    let api = HttpShopApi::from_config(&config)?;

    let report = check_integration(
        &api,
        &config.api_version,
        &IntegrationRequest::new(format!("http://{host}/"), "shppa_stub"),
    )
    .await?;

    assert_eq!(report.connection.selected_domain, host);
    assert_eq!(report.details.shop.as_deref(), Some("Stub Shop"));
    assert_eq!(
        report.connection.token_type.as_deref(),
        Some("Private App Password")
    );
    Ok(())
}

#[tokio::test]
async fn plain_text_error_falls_back_to_status_line() -> Result<()> {
    let app = Router::new().route(
        "/admin/api/2024-01/shop.json",
        get(|| async { (StatusCode::NOT_FOUND, "no such shop") }),
    );
    let host = spawn_stub(app).await?;
    let config = Config::for_tests();
    let api = HttpShopApi::from_config(&config)?;

    let err = check_integration(
        &api,
        &config.api_version,
        &IntegrationRequest::new(host.clone(), "shpat_stub"),
    )
    .await
    .unwrap_err();

    let (status, report) = match err {
        CheckError::Upstream { status, report } => (status, report),
        other => panic!("expected upstream error, got {other:?}"),
    };
    assert_eq!(status, 404);
    assert_eq!(report.message, "404: Not Found");
    assert!(report.details.is_null());
    assert!(
        report
            .troubleshooting
            .contains(&format!("Try using {host}.myshopify.com instead."))
    );
    Ok(())
}

#[tokio::test]
async fn refused_connection_is_unexpected() -> Result<()> {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let host = listener.local_addr()?.to_string();
    drop(listener);

    let config = Config::for_tests();
    let api = HttpShopApi::from_config(&config)?;
    let err = check_integration(
        &api,
        &config.api_version,
        &IntegrationRequest::new(host, "shpat_stub"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CheckError::Unexpected(_)));
    assert_eq!(err.status(), 500);
    Ok(())
}

#[tokio::test]
async fn truncated_body_surfaces_read_error() -> Result<()> {
    // Promise more bytes than are sent, then hang up.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let host = listener.local_addr()?.to_string();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 500\r\n\r\n{\"shop\"")
                .await;
        }
    });

    let config = Config::for_tests();
    let api = HttpShopApi::from_config(&config)?;
    let err = check_integration(
        &api,
        &config.api_version,
        &IntegrationRequest::new(host, "shpat_stub"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CheckError::Unexpected(_)));
    assert_eq!(err.to_string(), "failed to read shop response");
    Ok(())
}
