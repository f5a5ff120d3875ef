//! The integration check: one request in, one upstream call, one report out.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{StoreDomain, clean_store_url};
use crate::error::CheckError;
use crate::report::tables::{operation_results, permission_checks, troubleshooting};
use crate::report::{ConnectionReport, ErrorReport, ReportStatus, ShopDetails, SuccessReport};
use crate::shopify::{ShopApi, ShopResponse};
use crate::token::TokenKind;

/// Body of a check request. `shop_url` is accepted for older clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationRequest {
    #[serde(default, alias = "shop_url")]
    pub store_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl IntegrationRequest {
    pub fn new(store_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_url: Some(store_url.into()),
            access_token: Some(access_token.into()),
        }
    }

    /// Parse a raw request body. Unparseable bodies are unexpected errors, not
    /// validation errors.
    pub fn from_json(body: &[u8]) -> Result<Self, CheckError> {
        serde_json::from_slice(body).map_err(|e| CheckError::Unexpected(e.to_string()))
    }

    /// Both fields, or a validation error. Blank values count as missing. The
    /// token is returned exactly as received.
    fn fields(&self) -> Result<(&str, &str), CheckError> {
        fn present(field: &Option<String>) -> Option<&str> {
            field
                .as_deref()
                .filter(|value| !value.trim().is_empty())
        }
        match (present(&self.store_url), present(&self.access_token)) {
            (Some(store_url), Some(access_token)) => Ok((store_url, access_token)),
            _ => Err(CheckError::missing_parameters()),
        }
    }
}

/// Run a check against `api`.
///
/// Upstream failures come back as [`CheckError::Upstream`] carrying a full
/// error report with troubleshooting hints.
pub async fn check_integration(
    api: &dyn ShopApi,
    api_version: &str,
    request: &IntegrationRequest,
) -> Result<SuccessReport, CheckError> {
    let (store_url, access_token) = request.fields()?;
    // `https://` and friends clean down to nothing.
    if clean_store_url(store_url).is_empty() {
        return Err(CheckError::missing_parameters());
    }
    let mut domain = StoreDomain::resolve(store_url);

    let kind = TokenKind::classify(access_token);
    tracing::info!(
        domain = %domain.selected,
        token_type = kind.label(),
        "checking integration"
    );

    let response = api
        .fetch_shop(&domain.selected, access_token)
        .await
        .map_err(|e| {
            tracing::warn!(domain = %domain.selected, error = %e, "shop request failed");
            CheckError::Unexpected(e.to_string())
        })?;

    if !response.is_success() {
        return Err(upstream_failure(&response, &mut domain, api_version));
    }

    let payload: Value = serde_json::from_str(&response.body)
        .map_err(|e| CheckError::Unexpected(format!("invalid shop response: {e}")))?;
    let shop = payload
        .get("shop")
        .filter(|shop| !shop.is_null())
        .cloned()
        .ok_or_else(|| {
            CheckError::Unexpected("shop response did not include a shop object".to_string())
        })?;

    tracing::info!(
        domain = %domain.selected,
        token_type = kind.label(),
        "integration successful"
    );

    let mut connection = ConnectionReport::new(&domain, api_version);
    connection.token_type = Some(kind.label().to_string());

    Ok(SuccessReport {
        status: ReportStatus::Success,
        message: "Integration successful!".to_string(),
        details: ShopDetails::from_shop(&shop),
        connection,
        permissions: permission_checks(kind, &shop, api_version),
        operations: operation_results(kind),
        raw: shop,
    })
}

fn upstream_failure(
    response: &ShopResponse,
    domain: &mut StoreDomain,
    api_version: &str,
) -> CheckError {
    let (message, details) = describe_failure(response);
    tracing::warn!(
        domain = %domain.selected,
        status = response.status,
        %message,
        "shopify rejected the check"
    );

    let troubleshooting = troubleshooting(response.status, domain);
    CheckError::Upstream {
        status: response.status,
        report: Box::new(ErrorReport {
            status: ReportStatus::Error,
            message,
            details,
            connection: ConnectionReport::new(domain, api_version),
            troubleshooting,
        }),
    }
}

/// Message and details for a non-2xx answer. Shopify's `errors` field wins
/// when the body is JSON; otherwise fall back to the status line.
fn describe_failure(response: &ShopResponse) -> (String, Value) {
    let status = response.status;
    match serde_json::from_str::<Value>(&response.body) {
        Ok(details) => {
            let message = match details.get("errors") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(errors) if is_truthy(errors) => errors.to_string(),
                _ => format!("API request failed with status code: {status}"),
            };
            (message, details)
        }
        Err(_) => {
            let reason = reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default();
            (format!("{status}: {reason}"), Value::Null)
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
