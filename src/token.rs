//! Access token classification.
//!
//! Shopify tokens carry a short prefix that loosely hints at how they were
//! issued. That is all this module looks at: it never learns which scopes a
//! token actually holds.

/// Token category inferred from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    AdminApi,
    CustomApp,
    PrivateApp,
    Storefront,
    Unknown,
}

const PREFIXES: &[(&str, TokenKind)] = &[
    ("shpat_", TokenKind::AdminApi),
    ("shpca_", TokenKind::CustomApp),
    ("shppa_", TokenKind::PrivateApp),
    ("shpss_", TokenKind::Storefront),
];

impl TokenKind {
    /// Classify by literal, case-sensitive prefix match.
    pub fn classify(token: &str) -> Self {
        PREFIXES
            .iter()
            .find(|(prefix, _)| token.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::Unknown)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AdminApi => "Admin API Access Token",
            Self::CustomApp => "Custom App Access Token",
            Self::PrivateApp => "Private App Password",
            Self::Storefront => "Storefront API Access Token",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether admin scopes (price rules, discounts, products, orders) are
    /// assumed available for this kind of token.
    pub fn assumes_admin_scopes(self) -> bool {
        matches!(self, Self::AdminApi | Self::CustomApp)
    }
}
