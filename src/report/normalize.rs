//! Reshape any report the checker has ever produced into display rows.
//!
//! Accepted inputs, tried in this order:
//! 1. an already-normalized report (`connection_results` & co. present),
//! 2. the legacy `{ success, results }` envelope,
//! 3. a native check response (has a `status` key),
//! 4. bare legacy results (`connection: bool`, `permissions: {scope: bool}`).

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{ConnectionReport, OperationResult, OperationStatus, PermissionCheck, ReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    pub status: RowStatus,
    pub name: String,
    pub message: String,
}

impl StatusRow {
    fn new(status: RowStatus, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            name: name.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallResult {
    Success,
    Partial,
    Failed,
}

impl OverallResult {
    /// Any ERROR row fails the check; otherwise any WARNING makes it partial.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a StatusRow>) -> Self {
        let mut overall = Self::Success;
        for row in rows {
            match row.status {
                RowStatus::Error => return Self::Failed,
                RowStatus::Warning => overall = Self::Partial,
                RowStatus::Success => {}
            }
        }
        overall
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "All tests passed successfully! Your Shopify integration is ready to use.",
            Self::Partial => {
                "The integration test passed with some warnings. You may proceed, but consider addressing the warnings."
            }
            Self::Failed => {
                "The integration test failed. Please review the issues above before continuing."
            }
        }
    }
}

/// The shape the renderer draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub connection_results: Vec<StatusRow>,
    pub permissions_results: Vec<StatusRow>,
    pub operations_results: Vec<StatusRow>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_overall")]
    pub overall_result: Option<OverallResult>,
    #[serde(default)]
    pub result_message: String,
    #[serde(default)]
    pub recommended_domain: String,
}

impl NormalizedReport {
    fn from_rows(
        connection_results: Vec<StatusRow>,
        permissions_results: Vec<StatusRow>,
        operations_results: Vec<StatusRow>,
        errors: Vec<String>,
        recommended_domain: String,
    ) -> Self {
        let mut report = Self {
            connection_results,
            permissions_results,
            operations_results,
            errors,
            overall_result: None,
            result_message: String::new(),
            recommended_domain,
        };
        report.fill_overall();
        report
    }

    /// All rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = &StatusRow> {
        self.connection_results
            .iter()
            .chain(&self.permissions_results)
            .chain(&self.operations_results)
    }

    /// Derive the aggregate result and its message when they are missing.
    fn fill_overall(&mut self) {
        let overall = match self.overall_result {
            Some(overall) => overall,
            None => {
                let overall = OverallResult::from_rows(self.rows());
                self.overall_result = Some(overall);
                overall
            }
        };
        if self.result_message.is_empty() {
            self.result_message = overall.message().to_string();
        }
    }
}

/// Empty or unknown `overall_result` values are recomputed from the rows.
fn lenient_overall<'de, D>(deserializer: D) -> Result<Option<OverallResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("SUCCESS") => Some(OverallResult::Success),
        Some("PARTIAL") => Some(OverallResult::Partial),
        Some("FAILED") => Some(OverallResult::Failed),
        _ => None,
    })
}

/// Normalize any supported report shape.
pub fn normalize(value: &Value) -> Result<NormalizedReport> {
    let has = |key: &str| value.get(key).is_some();

    if has("connection_results") && has("permissions_results") && has("operations_results") {
        let mut report: NormalizedReport =
            serde_json::from_value(value.clone()).context("malformed normalized report")?;
        report.fill_overall();
        return Ok(report);
    }

    if has("success") && !has("status") {
        let envelope: Envelope =
            serde_json::from_value(value.clone()).context("malformed result envelope")?;
        return match (envelope.success, envelope.results) {
            (true, Some(results)) => normalize(&results),
            (_, _) => Ok(failure(
                envelope
                    .message
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            )),
        };
    }

    if has("status") {
        let native: NativeReport =
            serde_json::from_value(value.clone()).context("malformed check report")?;
        return Ok(from_native(native));
    }

    let legacy: LegacyResults =
        serde_json::from_value(value.clone()).context("malformed legacy results")?;
    Ok(from_legacy(legacy))
}

/// A report for a check that never produced results, e.g. a transport failure.
pub fn failure(message: impl Into<String>) -> NormalizedReport {
    let message = message.into();
    NormalizedReport::from_rows(
        vec![StatusRow::new(RowStatus::Error, "Connection", message.clone())],
        Vec::new(),
        Vec::new(),
        vec![message],
        String::new(),
    )
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    results: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct NativeReport {
    status: ReportStatus,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Value,
    #[serde(default)]
    connection: Option<ConnectionReport>,
    #[serde(default)]
    permissions: Vec<PermissionCheck>,
    #[serde(default)]
    operations: Vec<OperationResult>,
    #[serde(default)]
    troubleshooting: Vec<String>,
}

fn from_native(report: NativeReport) -> NormalizedReport {
    let succeeded = report.status == ReportStatus::Success;
    let connection = report.connection.unwrap_or_else(|| ConnectionReport {
        token_type: None,
        domains_tried: Vec::new(),
        recommended_domains: Vec::new(),
        selected_domain: String::new(),
        api_version: String::new(),
    });
    let detail = |key: &str| {
        report
            .details
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let mut connection_rows = Vec::new();
    let mut errors = Vec::new();
    let recommended_domain;

    if succeeded {
        let target = [Some(connection.selected_domain.as_str()), detail("shop")]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("Shopify store");
        connection_rows.push(StatusRow::new(
            RowStatus::Success,
            "Connection",
            format!("Connected to {target}"),
        ));
        if let Some(shop) = detail("shop") {
            connection_rows.push(StatusRow::new(
                RowStatus::Success,
                "Store Information",
                format!(
                    "Store Name: {shop}, Plan: {}",
                    detail("plan").unwrap_or("Unknown")
                ),
            ));
        }
        if let Some(token_type) = &connection.token_type {
            connection_rows.push(StatusRow::new(
                RowStatus::Success,
                "Token Type",
                token_type.clone(),
            ));
        }
        recommended_domain = detail("myshopifyDomain")
            .map(str::to_string)
            .unwrap_or_else(|| connection.selected_domain.clone());
    } else {
        let message = if report.message.is_empty() {
            "Failed to connect to Shopify store".to_string()
        } else {
            format!("Failed to connect to Shopify store: {}", report.message)
        };
        connection_rows.push(StatusRow::new(RowStatus::Error, "Connection", message));
        if !connection.domains_tried.is_empty() {
            connection_rows.push(StatusRow::new(
                RowStatus::Error,
                "Domains Tried",
                connection.domains_tried.join(", "),
            ));
        }
        if !report.message.is_empty() {
            errors.push(report.message.clone());
        }
        errors.extend(report.troubleshooting);
        recommended_domain = connection
            .recommended_domains
            .first()
            .cloned()
            .unwrap_or_default();
    }

    let permission_rows = report
        .permissions
        .iter()
        .map(|check| permission_row(check, succeeded))
        .collect();

    let operation_rows = report
        .operations
        .iter()
        .map(|op| {
            let status = match op.status {
                OperationStatus::Success => RowStatus::Success,
                OperationStatus::Error => RowStatus::Error,
            };
            let message = if op.simulated {
                format!("{} (simulated)", op.description)
            } else {
                op.description.clone()
            };
            StatusRow::new(status, op.name.clone(), message)
        })
        .collect();

    NormalizedReport::from_rows(
        connection_rows,
        permission_rows,
        operation_rows,
        errors,
        recommended_domain,
    )
}

fn permission_row(check: &PermissionCheck, report_succeeded: bool) -> StatusRow {
    let missing = if check.required {
        RowStatus::Error
    } else {
        RowStatus::Warning
    };
    let (status, state) = match check.status {
        Some(s) if s.is_available() => (RowStatus::Success, s.as_str()),
        Some(s) => (missing, s.as_str()),
        None if report_succeeded => (RowStatus::Success, "Permission granted"),
        None => (missing, "Permission not granted"),
    };
    StatusRow::new(
        status,
        check.scope.clone(),
        format!("{} ({state})", check.description),
    )
}

/// Flat results as written by older checker releases.
#[derive(Debug, Default, Deserialize)]
struct LegacyResults {
    #[serde(default)]
    connection: bool,
    connected_domain: Option<String>,
    shop_name: Option<String>,
    plan_name: Option<String>,
    official_myshopify_domain: Option<String>,
    #[serde(default)]
    domains_tried: Vec<String>,
    permissions: Option<HashMap<String, bool>>,
    price_rule_creation: Option<bool>,
    price_rule_title: Option<String>,
    price_rule_id: Option<Value>,
    discount_code_creation: Option<bool>,
    discount_code: Option<String>,
    discount_code_id: Option<Value>,
    orders_api_access: Option<bool>,
    #[serde(default)]
    errors: Vec<String>,
}

const REQUIRED_PERMISSIONS: &[(&str, &str)] = &[
    ("read_price_rules", "Read Price Rules"),
    ("write_price_rules", "Write Price Rules"),
    ("read_discounts", "Read Discounts"),
    ("write_discounts", "Write Discounts"),
];

const BASIC_PERMISSIONS: &[(&str, &str)] = &[
    ("read_orders", "Read Orders"),
    ("read_all_orders", "Read All Orders"),
];

fn from_legacy(results: LegacyResults) -> NormalizedReport {
    let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());

    let mut connection = Vec::new();
    let mut recommended_domain = String::new();
    if results.connection {
        let target = non_empty(&results.connected_domain)
            .or_else(|| non_empty(&results.shop_name))
            .unwrap_or_else(|| "Shopify store".to_string());
        connection.push(StatusRow::new(
            RowStatus::Success,
            "Connection",
            format!("Connected to {target}"),
        ));
        if let Some(shop) = non_empty(&results.shop_name) {
            connection.push(StatusRow::new(
                RowStatus::Success,
                "Store Information",
                format!(
                    "Store Name: {shop}, Plan: {}",
                    non_empty(&results.plan_name).unwrap_or_else(|| "Unknown".to_string())
                ),
            ));
        }
        recommended_domain = non_empty(&results.official_myshopify_domain)
            .or_else(|| non_empty(&results.connected_domain))
            .unwrap_or_default();
    } else {
        connection.push(StatusRow::new(
            RowStatus::Error,
            "Connection",
            "Failed to connect to Shopify store",
        ));
        if !results.domains_tried.is_empty() {
            connection.push(StatusRow::new(
                RowStatus::Error,
                "Domains Tried",
                results.domains_tried.join(", "),
            ));
        }
    }

    let mut permissions = Vec::new();
    if let Some(granted) = &results.permissions {
        let is_granted = |key: &str| granted.get(key).copied().unwrap_or(false);
        for &(key, label) in REQUIRED_PERMISSIONS {
            permissions.push(if is_granted(key) {
                StatusRow::new(RowStatus::Success, label, "Permission granted")
            } else {
                StatusRow::new(RowStatus::Error, label, "Permission not granted")
            });
        }
        for &(key, label) in BASIC_PERMISSIONS {
            let name = format!("{label} (Basic)");
            permissions.push(if is_granted(key) {
                StatusRow::new(RowStatus::Success, name, "Permission granted")
            } else {
                StatusRow::new(RowStatus::Warning, name, "Basic permission not granted")
            });
        }
    }

    let mut operations = Vec::new();
    if let Some(created) = results.price_rule_creation {
        operations.push(if created {
            StatusRow::new(
                RowStatus::Success,
                "Price Rule Creation",
                format!(
                    "Created price rule: {} (ID: {})",
                    results.price_rule_title.as_deref().unwrap_or(""),
                    display_id(&results.price_rule_id)
                ),
            )
        } else {
            StatusRow::new(
                RowStatus::Error,
                "Price Rule Creation",
                "Failed to create price rule",
            )
        });
    }
    if let Some(created) = results.discount_code_creation {
        operations.push(if created {
            StatusRow::new(
                RowStatus::Success,
                "Discount Code Creation",
                format!(
                    "Created discount code: {} (ID: {})",
                    results.discount_code.as_deref().unwrap_or(""),
                    display_id(&results.discount_code_id)
                ),
            )
        } else {
            StatusRow::new(
                RowStatus::Error,
                "Discount Code Creation",
                "Failed to create discount code",
            )
        });
    }
    if let Some(accessed) = results.orders_api_access {
        operations.push(if accessed {
            StatusRow::new(
                RowStatus::Success,
                "Orders API Access",
                "Successfully accessed orders API",
            )
        } else {
            StatusRow::new(
                RowStatus::Warning,
                "Orders API Access",
                "Could not access orders API",
            )
        });
    }

    NormalizedReport::from_rows(
        connection,
        permissions,
        operations,
        results.errors,
        recommended_domain,
    )
}

/// Shopify ids arrive as numbers; older results stored them as strings.
fn display_id(id: &Option<Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
