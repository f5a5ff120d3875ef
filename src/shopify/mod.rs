pub mod http;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;

/// Raw answer from the shop endpoint. Non-2xx statuses are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopResponse {
    pub status: u16,
    pub body: String,
}

impl ShopResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The one upstream call a check makes. `Err` means the request never got an
/// HTTP answer (DNS, TLS, timeout).
#[async_trait]
pub trait ShopApi: Send + Sync {
    async fn fetch_shop(&self, domain: &str, access_token: &str) -> Result<ShopResponse>;
}
