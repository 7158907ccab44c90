//! Provider adapter implementations.
//!
//! Each adapter converts an authorization artifact into an access token and
//! fetches a normalized [`ExternalProfile`]. Adapters are configured from
//! tenant-scoped client credentials and hold no cross-request state.

pub mod social;
pub mod wallet;

pub use async_trait::async_trait;

use crate::error::{IdentityError, IdentityResult, ProviderKind};
use crate::profile::ExternalProfile;

pub use social::SocialAdapter;
pub use wallet::{WalletAdapter, WalletBalances, WalletCard};

/// A bearer access token obtained from a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the client handed us to prove the provider authorization.
///
/// A `Code` goes through the provider's token exchange; a `Token` is an
/// already-issued access token (native SDK logins, retried mobile requests)
/// and passes through unchanged.
#[derive(Debug, Clone)]
pub enum AuthorizationArtifact {
    Code(String),
    Token(String),
}

/// Tenant-scoped client credentials for one provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Trait for provider adapter implementations.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Get the provider kind.
    fn kind(&self) -> ProviderKind;

    /// Build the authorization URL for initiating the provider flow.
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> String;

    /// Exchange an authorization artifact for an access token.
    ///
    /// Codes go through the provider token endpoint; tokens pass through.
    async fn exchange(&self, artifact: &AuthorizationArtifact) -> IdentityResult<AccessToken>;

    /// Fetch and normalize the provider's profile payload.
    async fn fetch_profile(&self, access_token: &AccessToken) -> IdentityResult<ExternalProfile>;

    /// Read wallet balances. Only the wallet provider family supports this.
    async fn balances(
        &self,
        _access_token: &AccessToken,
        _currency: &str,
    ) -> IdentityResult<WalletBalances> {
        Err(IdentityError::Unsupported {
            provider: self.kind(),
        })
    }
}

/// Resolves `(provider, credentials)` to a ready adapter.
///
/// The engine consumes this seam so callers and tests decide how adapters
/// are built; [`HttpAdapterFactory`] is the production implementation.
pub trait AdapterFactory: Send + Sync {
    fn adapter(
        &self,
        kind: ProviderKind,
        credentials: ProviderCredentials,
    ) -> std::sync::Arc<dyn ProviderAdapter>;
}

/// Adapter factory backed by the real provider HTTP endpoints.
///
/// Base URLs come from deployment configuration so that staging and test
/// environments can point at sandbox hosts.
#[derive(Debug, Clone)]
pub struct HttpAdapterFactory {
    wallet_base_url: String,
    social_base_url: String,
}

impl HttpAdapterFactory {
    #[must_use]
    pub fn new(wallet_base_url: impl Into<String>, social_base_url: impl Into<String>) -> Self {
        Self {
            wallet_base_url: wallet_base_url.into(),
            social_base_url: social_base_url.into(),
        }
    }
}

impl AdapterFactory for HttpAdapterFactory {
    fn adapter(
        &self,
        kind: ProviderKind,
        credentials: ProviderCredentials,
    ) -> std::sync::Arc<dyn ProviderAdapter> {
        match kind {
            ProviderKind::Wallet => std::sync::Arc::new(WalletAdapter::new(
                credentials,
                self.wallet_base_url.clone(),
            )),
            ProviderKind::Social => std::sync::Arc::new(SocialAdapter::new(
                credentials,
                self.social_base_url.clone(),
            )),
        }
    }
}
