use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{ShopApi, ShopResponse};
use crate::config::Config;
use crate::consts::{ACCESS_TOKEN_HEADER, shop_endpoint};

/// Calls the Shopify Admin API over HTTP.
pub struct HttpShopApi {
    client: reqwest::Client,
    scheme: String,
    api_version: String,
}

impl HttpShopApi {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(concat!("shopcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            scheme: config.upstream_scheme.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Full URL of the shop endpoint for a domain.
    pub fn shop_url(&self, domain: &str) -> String {
        format!(
            "{}://{}{}",
            self.scheme,
            domain,
            shop_endpoint(&self.api_version)
        )
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn fetch_shop(&self, domain: &str, access_token: &str) -> Result<ShopResponse> {
        let url = self.shop_url(domain);
        tracing::debug!(%url, "requesting shop");

        let resp = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, access_token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .context("failed to read shop response")?;

        Ok(ShopResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_url_uses_scheme_and_version() {
        let api = HttpShopApi::from_config(&Config::default()).unwrap();
        assert_eq!(
            api.shop_url("myshop.myshopify.com"),
            "https://myshop.myshopify.com/admin/api/2024-01/shop.json"
        );
    }

    #[test]
    fn shop_url_for_local_stub() {
        let api = HttpShopApi::from_config(&Config::for_tests()).unwrap();
        assert_eq!(
            api.shop_url("127.0.0.1:4000"),
            "http://127.0.0.1:4000/admin/api/2024-01/shop.json"
        );
    }
}
