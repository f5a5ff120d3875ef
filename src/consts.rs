//! Project-wide constants.

/// Admin API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-01";

/// Header Shopify reads the Admin API access token from.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Hosted Shopify stores live under this domain.
pub const MYSHOPIFY_SUFFIX: &str = "myshopify.com";

/// Default listen address for `shopcheck serve`.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8788";

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default upstream scheme. `http` is only useful against local stubs.
pub const DEFAULT_UPSTREAM_SCHEME: &str = "https";

/// Default timeout for the single upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Routes that accept an integration check.
pub const ROUTE_CHECK_INTEGRATION: &str = "/api/check-integration";
pub const ROUTE_TEST: &str = "/test";

/// Path of the shop endpoint for a given API version.
pub fn shop_endpoint(api_version: &str) -> String {
    format!("/admin/api/{api_version}/shop.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_endpoint_default_version() {
        assert_eq!(
            shop_endpoint(DEFAULT_API_VERSION),
            "/admin/api/2024-01/shop.json"
        );
    }

    #[test]
    fn shop_endpoint_other_version() {
        assert_eq!(shop_endpoint("2023-10"), "/admin/api/2023-10/shop.json");
    }

    #[test]
    fn consts_are_non_empty() {
        assert!(!ACCESS_TOKEN_HEADER.is_empty());
        assert!(!DEFAULT_BIND_ADDR.is_empty());
        assert!(ROUTE_CHECK_INTEGRATION.starts_with('/'));
        assert!(ROUTE_TEST.starts_with('/'));
    }
}
