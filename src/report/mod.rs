//! Report types returned by the integration check.
//!
//! Field names follow the JSON the check endpoint has always returned
//! (camelCase for connection and shop details, snake_case scopes).

pub mod normalize;
pub mod tables;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::StoreDomain;

/// Top-level `status` of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub domains_tried: Vec<String>,
    #[serde(default)]
    pub recommended_domains: Vec<String>,
    #[serde(default)]
    pub selected_domain: String,
    #[serde(default)]
    pub api_version: String,
}

impl ConnectionReport {
    pub fn new(domain: &StoreDomain, api_version: &str) -> Self {
        Self {
            token_type: None,
            domains_tried: domain.tried.clone(),
            recommended_domains: domain.recommended.clone(),
            selected_domain: domain.selected.clone(),
            api_version: api_version.to_string(),
        }
    }
}

/// Availability of a scope, as guessed from the token prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Available,
    Unavailable,
    #[serde(rename = "May be unavailable")]
    MaybeUnavailable,
    #[serde(rename = "Likely available")]
    LikelyAvailable,
}

impl PermissionStatus {
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available | Self::LikelyAvailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
            Self::MaybeUnavailable => "May be unavailable",
            Self::LikelyAvailable => "Likely available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub scope: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PermissionStatus>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub name: String,
    pub description: String,
    pub status: OperationStatus,
    /// Set when the outcome is a fixed literal rather than a real API call.
    #[serde(default, skip_serializing_if = "is_false")]
    pub simulated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Shop fields surfaced in `details` on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDetails {
    pub shop: Option<String>,
    pub domain: Option<String>,
    pub myshopify_domain: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub plan: Option<String>,
    pub has_storefront: Option<bool>,
    pub created_at: Option<String>,
    pub timezone: Option<String>,
}

impl ShopDetails {
    /// Pick the displayed fields out of Shopify's `shop` object.
    pub fn from_shop(shop: &Value) -> Self {
        let text = |key: &str| shop.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            shop: text("name"),
            domain: text("domain"),
            myshopify_domain: text("myshopify_domain"),
            email: text("email"),
            country: text("country_name"),
            plan: text("plan_name"),
            has_storefront: shop.get("has_storefront").and_then(Value::as_bool),
            created_at: text("created_at"),
            timezone: text("timezone"),
        }
    }
}

/// Body of a 200 response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessReport {
    pub status: ReportStatus,
    pub message: String,
    pub details: ShopDetails,
    pub connection: ConnectionReport,
    pub permissions: Vec<PermissionCheck>,
    pub operations: Vec<OperationResult>,
    /// The upstream `shop` object, untouched.
    pub raw: Value,
}

/// Body of a response that mirrors an upstream failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub status: ReportStatus,
    pub message: String,
    /// Parsed upstream error body, or null when it was not JSON.
    pub details: Value,
    pub connection: ConnectionReport,
    pub troubleshooting: Vec<String>,
}
