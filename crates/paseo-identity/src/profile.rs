//! Normalized external profile and its normalization helpers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ProviderKind;

/// Profile information fetched from an external provider, normalized into a
/// provider-independent shape.
///
/// Constructed per login by the provider adapters; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalProfile {
    /// Which provider produced this profile.
    pub provider: ProviderKind,
    /// Unique identifier at the provider. Empty means the login must fail.
    pub external_id: String,
    /// Email address, lowercased during normalization.
    pub email: Option<String>,
    /// Full display name as reported by the provider.
    pub display_name: Option<String>,
    /// Birthdate in the provider's native string format.
    pub birthdate: Option<String>,
    /// Profile picture URL.
    pub avatar_url: Option<String>,
    /// Gender, reported by the social provider family only.
    pub gender: Option<String>,
}

impl ExternalProfile {
    /// Whether the profile carries a usable external identity.
    #[must_use]
    pub fn has_external_id(&self) -> bool {
        !self.external_id.trim().is_empty()
    }

    /// Split the display name into first and last name on the first
    /// whitespace. A missing name yields two empty strings.
    #[must_use]
    pub fn name_parts(&self) -> (String, String) {
        split_name(self.display_name.as_deref())
    }

    /// The birthdate converted to a canonical date, if parseable.
    #[must_use]
    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthdate.as_deref().and_then(parse_birthdate)
    }
}

/// Split a display name on the first whitespace.
///
/// `"Jane Doe Smith"` becomes `("Jane", "Doe Smith")`; a single word keeps
/// the last name empty.
#[must_use]
pub fn split_name(name: Option<&str>) -> (String, String) {
    match name.map(str::trim) {
        None | Some("") => (String::new(), String::new()),
        Some(full) => match full.split_once(char::is_whitespace) {
            Some((first, rest)) => (first.to_string(), rest.trim_start().to_string()),
            None => (full.to_string(), String::new()),
        },
    }
}

/// Parse a provider-native birthdate string into a canonical date.
///
/// Accepts `MM/DD/YYYY` (the wallet and social providers' wire format) and
/// ISO `YYYY-MM-DD`.
#[must_use]
pub fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Lowercase an email address for case-insensitive matching.
#[must_use]
pub fn normalize_email(email: Option<String>) -> Option<String> {
    email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty())
}
