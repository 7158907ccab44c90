//! Identity reconciliation error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider kind enumeration.
///
/// Paseo links accounts against two provider families: the financial-wallet
/// provider and the social-network provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Wallet,
    Social,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Wallet => write!(f, "wallet"),
            ProviderKind::Social => write!(f, "social"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wallet" => Ok(ProviderKind::Wallet),
            "social" => Ok(ProviderKind::Social),
            _ => Err(IdentityError::InvalidProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Identity reconciliation errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid provider: {provider}")]
    InvalidProvider { provider: String },

    #[error("Provider '{provider}' is not configured for this tenant")]
    ProviderNotConfigured { provider: ProviderKind },

    #[error("Could not retrieve an external identity from {provider}")]
    AccessFailed { provider: ProviderKind },

    #[error("{provider} rejected the request: HTTP {status}")]
    ProviderAuth { provider: ProviderKind, status: u16 },

    #[error("Unexpected {provider} response: {reason}")]
    ProviderProtocol {
        provider: ProviderKind,
        reason: String,
    },

    #[error("External identity already linked under {provider}")]
    DuplicateLink {
        provider: ProviderKind,
        external_id: String,
    },

    #[error("No {provider} link exists for this user")]
    LinkNotFound { provider: ProviderKind },

    #[error("{provider} does not support this operation")]
    Unsupported { provider: ProviderKind },

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IdentityError {
    /// Get the stable error code for API responses.
    ///
    /// The controller layer translates these into user-visible responses;
    /// no formatting or localization happens here.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            IdentityError::InvalidProvider { .. } => "invalid_provider",
            IdentityError::ProviderNotConfigured { .. } => "provider_not_configured",
            IdentityError::AccessFailed { .. } => "identity_access_failed",
            IdentityError::ProviderAuth { .. } => "provider_auth_failed",
            IdentityError::ProviderProtocol { .. } => "provider_protocol_error",
            IdentityError::DuplicateLink { .. } => "duplicate_link",
            IdentityError::LinkNotFound { .. } => "link_not_found",
            IdentityError::Unsupported { .. } => "operation_unsupported",
            IdentityError::Persistence(_) => "persistence_error",
            IdentityError::Transport(_) => "transport_error",
        }
    }

    /// Whether the error is a uniqueness conflict that the engine may
    /// recover from with its bounded retry.
    #[must_use]
    pub fn is_duplicate_link(&self) -> bool {
        matches!(self, IdentityError::DuplicateLink { .. })
    }
}

/// Result type alias for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
