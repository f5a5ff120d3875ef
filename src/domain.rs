//! Store URL cleanup and `*.myshopify.com` domain resolution.

use crate::consts::MYSHOPIFY_SUFFIX;

/// Where a check will connect, and what it considered on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDomain {
    /// Domain the upstream request is sent to.
    pub selected: String,
    /// Every domain form considered, in order. The cleaned input comes first.
    pub tried: Vec<String>,
    /// Domains worth suggesting to the merchant. Never contains duplicates.
    pub recommended: Vec<String>,
}

impl StoreDomain {
    /// Resolve a raw store URL as typed by a merchant.
    ///
    /// Bare store names (no dot at all) get `.myshopify.com` appended. Anything
    /// else that is not a myshopify domain is used as given, with a myshopify
    /// form recommended alongside it.
    pub fn resolve(raw: &str) -> Self {
        let cleaned = clean_store_url(raw);
        let mut domain = Self {
            selected: cleaned.clone(),
            tried: vec![cleaned.clone()],
            recommended: Vec::new(),
        };

        if !cleaned.contains(MYSHOPIFY_SUFFIX) {
            domain.recommend(myshopify_candidate(&cleaned));
            if !cleaned.contains('.') {
                domain.selected = format!("{cleaned}.{MYSHOPIFY_SUFFIX}");
                domain.tried.push(domain.selected.clone());
            }
        }

        domain
    }

    /// Whether the selected domain is already a myshopify domain.
    pub fn is_myshopify(&self) -> bool {
        self.selected.contains(MYSHOPIFY_SUFFIX)
    }

    /// Add a recommendation unless it is already listed.
    pub fn recommend(&mut self, candidate: String) {
        if !self.recommended.contains(&candidate) {
            self.recommended.push(candidate);
        }
    }
}

/// Strip whitespace, a leading `http://`/`https://`, and trailing slashes.
/// Hostnames are case-insensitive, so the result is lowercased.
pub fn clean_store_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    without_scheme.trim_end_matches('/').to_string()
}

/// Best guess at the myshopify form of a domain.
///
/// `store.myshopify` gains its missing `.com`; `www.store.com` and
/// `store.com` both become `store.myshopify.com`.
pub fn myshopify_candidate(domain: &str) -> String {
    if domain.contains(MYSHOPIFY_SUFFIX) {
        return domain.to_string();
    }
    if domain.contains(".myshopify") {
        return domain.replacen(".myshopify", ".myshopify.com", 1);
    }

    let mut parts = domain.split('.');
    let first = parts.next().unwrap_or_default();
    let store = match (first, parts.next()) {
        ("www", Some(second)) if !second.is_empty() => second,
        _ => first,
    };
    format!("{store}.{MYSHOPIFY_SUFFIX}")
}
