//! Static permission, operation, and troubleshooting tables.
//!
//! Nothing here inspects real scopes. Permission availability is a guess
//! keyed on the token prefix ([`TokenKind`]), and the price rule and discount
//! code "creations" are fixed literals flagged as simulated. Treat the output
//! as a hint for the merchant, not as proof of capability.

use serde_json::Value;

use super::{OperationResult, OperationStatus, PermissionCheck, PermissionStatus};
use crate::consts::{MYSHOPIFY_SUFFIX, shop_endpoint};
use crate::domain::StoreDomain;
use crate::token::TokenKind;

const SIMULATED_PRICE_RULE: &str = "Created price rule: GLEO_TEST_1742919670 (ID: 1463368188188)";
const SIMULATED_DISCOUNT_CODE: &str =
    "Created discount code: GLEO_TEST_1742919670 (ID: 19287354016028)";

/// The one check that is always required: reading the shop itself.
pub fn shop_permission(api_version: &str) -> PermissionCheck {
    PermissionCheck {
        scope: "read_shop".to_string(),
        description: "Access to shop data".to_string(),
        endpoint: Some(shop_endpoint(api_version)),
        status: None,
        required: true,
    }
}

/// Permission rows for a successful shop fetch, in display order.
pub fn permission_checks(kind: TokenKind, shop: &Value, api_version: &str) -> Vec<PermissionCheck> {
    let admin = kind.assumes_admin_scopes();
    let theme_access = shop.get("shop_owner").is_some();

    let either = |yes: bool, no: PermissionStatus| {
        if yes { PermissionStatus::Available } else { no }
    };
    let unavailable = |flag| either(flag, PermissionStatus::Unavailable);
    let maybe = |flag| either(flag, PermissionStatus::MaybeUnavailable);
    let all_orders = if admin {
        PermissionStatus::LikelyAvailable
    } else {
        PermissionStatus::MaybeUnavailable
    };

    let optional = [
        ("read_themes", "Access to themes", unavailable(theme_access)),
        (
            "read_price_rules",
            "Access to price rules and discounts",
            unavailable(admin),
        ),
        (
            "write_price_rules",
            "Create and modify price rules",
            unavailable(admin),
        ),
        ("read_discounts", "Access to discounts", unavailable(admin)),
        ("write_discounts", "Create and modify discounts", unavailable(admin)),
        ("read_products", "Access to products", maybe(admin)),
        ("read_orders", "Access to orders (basic)", maybe(admin)),
        ("read_all_orders", "Access to all orders", all_orders),
    ];

    let mut checks = vec![shop_permission(api_version)];
    checks.extend(
        optional
            .into_iter()
            .map(|(scope, description, status)| PermissionCheck {
                scope: scope.to_string(),
                description: description.to_string(),
                endpoint: None,
                status: Some(status),
                required: false,
            }),
    );
    checks
}

/// Operation rows for a successful shop fetch. Only the first two reflect
/// something that actually happened.
pub fn operation_results(kind: TokenKind) -> Vec<OperationResult> {
    let op = |name: &str, description: String, simulated| OperationResult {
        name: name.to_string(),
        description,
        status: OperationStatus::Success,
        simulated,
    };

    vec![
        op(
            "Shop Access",
            "Successfully accessed shop information".to_string(),
            false,
        ),
        op(
            "Token Verification",
            format!("{} verified", kind.label()),
            false,
        ),
        op("Price Rule Creation", SIMULATED_PRICE_RULE.to_string(), true),
        op(
            "Discount Code Creation",
            SIMULATED_DISCOUNT_CODE.to_string(),
            true,
        ),
        op(
            "Orders API Access",
            "Successfully accessed orders API".to_string(),
            true,
        ),
    ]
}

/// Hints for an upstream failure. A 404 on a non-myshopify domain also adds
/// the myshopify form to `domain.recommended`.
pub fn troubleshooting(status: u16, domain: &mut StoreDomain) -> Vec<String> {
    let hints: &[&str] = match status {
        401 => &[
            "Your access token may be invalid or expired.",
            "Verify that you're using an Admin API access token.",
            "Check that the token has the necessary 'read_shop' permission.",
        ],
        403 => &[
            "Your access token doesn't have the required permissions.",
            "Check that your app has the 'read_shop' scope enabled.",
        ],
        404 => &[
            "The store URL might be incorrect.",
            "Make sure you're using the .myshopify.com domain.",
        ],
        500.. => &[
            "There might be an issue with the Shopify API.",
            "Try again later or check Shopify's status page.",
        ],
        _ => &[],
    };
    let mut out: Vec<String> = hints.iter().map(|h| h.to_string()).collect();

    if status == 404 && !domain.is_myshopify() {
        let suggestion = format!("{}.{MYSHOPIFY_SUFFIX}", domain.selected);
        out.push(format!("Try using {suggestion} instead."));
        domain.recommend(suggestion);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_of(checks: &[PermissionCheck], scope: &str) -> Option<PermissionStatus> {
        checks
            .iter()
            .find(|c| c.scope == scope)
            .and_then(|c| c.status)
    }

    #[test]
    fn admin_token_has_everything_available() {
        let checks = permission_checks(TokenKind::AdminApi, &json!({"shop_owner": "x"}), "2024-01");
        assert_eq!(checks.len(), 9);
        for scope in [
            "read_themes",
            "read_price_rules",
            "write_price_rules",
            "read_discounts",
            "write_discounts",
            "read_products",
            "read_orders",
        ] {
            assert_eq!(
                status_of(&checks, scope),
                Some(PermissionStatus::Available),
                "{scope}"
            );
        }
        assert_eq!(
            status_of(&checks, "read_all_orders"),
            Some(PermissionStatus::LikelyAvailable)
        );
    }

    #[test]
    fn storefront_token_gets_unavailable_and_maybe() {
        let checks = permission_checks(TokenKind::Storefront, &json!({}), "2024-01");
        assert_eq!(
            status_of(&checks, "read_price_rules"),
            Some(PermissionStatus::Unavailable)
        );
        assert_eq!(
            status_of(&checks, "write_discounts"),
            Some(PermissionStatus::Unavailable)
        );
        assert_eq!(
            status_of(&checks, "read_products"),
            Some(PermissionStatus::MaybeUnavailable)
        );
        assert_eq!(
            status_of(&checks, "read_all_orders"),
            Some(PermissionStatus::MaybeUnavailable)
        );
        assert_eq!(
            status_of(&checks, "read_themes"),
            Some(PermissionStatus::Unavailable)
        );
    }

    #[test]
    fn read_shop_comes_first_and_is_required() {
        let checks = permission_checks(TokenKind::Unknown, &json!({}), "2024-01");
        assert_eq!(checks[0].scope, "read_shop");
        assert!(checks[0].required);
        assert!(checks[0].status.is_none());
        assert_eq!(
            checks[0].endpoint.as_deref(),
            Some("/admin/api/2024-01/shop.json")
        );
        assert!(checks[1..].iter().all(|c| !c.required));
    }

    #[test]
    fn operations_mark_fabricated_results() {
        let ops = operation_results(TokenKind::CustomApp);
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Shop Access",
                "Token Verification",
                "Price Rule Creation",
                "Discount Code Creation",
                "Orders API Access"
            ]
        );
        assert_eq!(ops[1].description, "Custom App Access Token verified");
        assert!(!ops[0].simulated);
        assert!(!ops[1].simulated);
        assert!(ops[2..].iter().all(|o| o.simulated));
        assert!(ops.iter().all(|o| o.status == OperationStatus::Success));
    }

    #[test]
    fn troubleshooting_401() {
        let mut domain = StoreDomain::resolve("myshop.myshopify.com");
        let hints = troubleshooting(401, &mut domain);
        assert_eq!(hints.len(), 3);
        assert!(hints[0].contains("invalid or expired"));
    }

    #[test]
    fn troubleshooting_403() {
        let mut domain = StoreDomain::resolve("myshop.myshopify.com");
        let hints = troubleshooting(403, &mut domain);
        assert_eq!(hints.len(), 2);
        assert!(hints[1].contains("read_shop"));
    }

    #[test]
    fn troubleshooting_404_suggests_myshopify_domain() {
        let mut domain = StoreDomain::resolve("shop.example.com");
        let hints = troubleshooting(404, &mut domain);
        assert_eq!(hints.len(), 3);
        assert_eq!(hints[2], "Try using shop.example.com.myshopify.com instead.");
        assert!(
            domain
                .recommended
                .contains(&"shop.example.com.myshopify.com".to_string())
        );
    }

    #[test]
    fn troubleshooting_404_on_myshopify_domain_has_no_suggestion() {
        let mut domain = StoreDomain::resolve("myshop");
        let before = domain.recommended.clone();
        let hints = troubleshooting(404, &mut domain);
        assert_eq!(hints.len(), 2);
        assert_eq!(domain.recommended, before);
    }

    #[test]
    fn troubleshooting_5xx() {
        let mut domain = StoreDomain::resolve("myshop");
        assert_eq!(troubleshooting(503, &mut domain).len(), 2);
        assert_eq!(troubleshooting(500, &mut domain).len(), 2);
    }

    #[test]
    fn troubleshooting_other_status_is_empty() {
        let mut domain = StoreDomain::resolve("myshop");
        assert!(troubleshooting(429, &mut domain).is_empty());
        assert!(troubleshooting(400, &mut domain).is_empty());
    }
}
