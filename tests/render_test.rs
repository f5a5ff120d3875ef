use std::io::Write;

use anyhow::Result;
use serde_json::{Value, json};
use tempfile::NamedTempFile;

use shopcheck::cli::read_report;
use shopcheck::render::render;
use shopcheck::report::normalize::{NormalizedReport, OverallResult};

/// Save `value` the way `shopcheck check --json` would, then load it back
/// through the `render` command's reader.
fn saved(value: &Value) -> Result<NormalizedReport> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", serde_json::to_string_pretty(value)?)?;
    file.flush()?;
    read_report(Some(file.path()), std::io::empty())
}

#[test]
fn saved_error_report_renders_troubleshooting() -> Result<()> {
    let report = saved(&json!({
        "status": "error",
        "message": "Not Found",
        "details": {"errors": "Not Found"},
        "connection": {
            "domainsTried": ["shop.example.com"],
            "recommendedDomains": ["shop.myshopify.com"],
            "selectedDomain": "shop.example.com",
            "apiVersion": "2024-01"
        },
        "troubleshooting": ["The store URL might be incorrect."]
    }))?;

    assert_eq!(report.overall_result, Some(OverallResult::Failed));
    assert_eq!(report.recommended_domain, "shop.myshopify.com");

    let text = render(&report);
    assert!(text.contains("✗ Connection"));
    assert!(text.contains("Failed to connect to Shopify store: Not Found"));
    assert!(text.contains("shop.example.com"));
    assert!(text.contains("2. The store URL might be incorrect."));
    assert!(text.contains("recommended domain  shop.myshopify.com"));
    Ok(())
}

#[test]
fn enveloped_failure_renders_message() -> Result<()> {
    let text = render(&saved(&json!({"success": false, "message": "timed out"}))?);
    assert!(text.contains("1. timed out"));
    assert!(text.contains("✗ FAILED"));
    Ok(())
}

#[test]
fn legacy_results_with_all_permissions_succeed() -> Result<()> {
    let report = saved(&json!({
        "connection": true,
        "connected_domain": "myshop.myshopify.com",
        "permissions": {
            "read_price_rules": true,
            "write_price_rules": true,
            "read_discounts": true,
            "write_discounts": true,
            "read_products": true,
            "read_orders": true,
            "read_all_orders": true
        },
        "price_rule_creation": true,
        "discount_code_creation": true,
        "orders_api_access": true
    }))?;

    assert_eq!(report.overall_result, Some(OverallResult::Success));
    assert!(report.errors.is_empty());
    assert!(render(&report).contains("✓ SUCCESS"));
    Ok(())
}

#[test]
fn file_that_is_not_json_is_rejected() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "<html>502 Bad Gateway</html>")?;
    let err = read_report(Some(file.path()), std::io::empty()).unwrap_err();
    assert!(err.to_string().contains("report is not JSON"));
    Ok(())
}
