//! Collaborator interfaces the reconciliation engine depends on.
//!
//! Persistence, session issuance, and credential resolution are owned by
//! these implementations; the engine only decides what should change.

use async_trait::async_trait;
use paseo_core::{LinkId, TenantId, UserId};
use thiserror::Error;

use crate::error::ProviderKind;
use crate::models::{
    DeviceParams, IssuedLogin, LinkPatch, LinkedIdentity, NewLink, NewUser, ProviderLink, User,
    UserPatch,
};
use crate::providers::ProviderCredentials;

/// Errors surfaced by the store collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `(provider, external_id, tenant)` uniqueness constraint was hit.
    #[error("provider link already exists")]
    DuplicateLink,

    /// The tenant has no credentials for the requested provider.
    #[error("provider '{provider}' is not configured")]
    NotConfigured { provider: ProviderKind },

    /// Any other storage failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD over provider-link records.
///
/// Implementations must enforce a unique index on
/// `(provider, external_id, tenant)` so that `attach` is atomic with respect
/// to concurrent logins for the same external identity.
#[async_trait]
pub trait IdentityLinkStore: Send + Sync {
    /// Find a link by provider identity, resolving the owning user in the
    /// same query.
    async fn find_link(
        &self,
        tenant: TenantId,
        provider: ProviderKind,
        external_id: &str,
    ) -> StoreResult<Option<LinkedIdentity>>;

    /// Find the link a user holds for one provider, if any.
    async fn find_for_user(
        &self,
        tenant: TenantId,
        user_id: UserId,
        provider: ProviderKind,
    ) -> StoreResult<Option<ProviderLink>>;

    /// Attach a new link to an existing user.
    ///
    /// Fails with [`StoreError::DuplicateLink`] when the uniqueness
    /// constraint is violated.
    async fn attach(
        &self,
        tenant: TenantId,
        user_id: UserId,
        link: NewLink,
    ) -> StoreResult<ProviderLink>;

    /// Update an existing link in place.
    async fn update(
        &self,
        tenant: TenantId,
        link_id: LinkId,
        patch: LinkPatch,
    ) -> StoreResult<ProviderLink>;
}

/// Lookup, creation, and field updates on user records, scoped by tenant.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Case-insensitive email lookup within a tenant.
    async fn find_by_email(&self, tenant: TenantId, email: &str) -> StoreResult<Option<User>>;

    /// Create a user together with its embedded provider link as one atomic
    /// unit. A uniqueness violation on the embedded link fails the whole
    /// creation with [`StoreError::DuplicateLink`].
    async fn create(
        &self,
        tenant: TenantId,
        new_user: NewUser,
        device: &DeviceParams,
    ) -> StoreResult<User>;

    /// Apply a partial update to a user.
    async fn update(
        &self,
        tenant: TenantId,
        user_id: UserId,
        patch: UserPatch,
    ) -> StoreResult<User>;
}

/// Creates a login session for a user.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Issue a session and return any invitations pending for the user.
    ///
    /// Idempotent: repeated calls for the same user and device refresh the
    /// session state.
    async fn issue(
        &self,
        tenant: TenantId,
        user_id: UserId,
        device: &DeviceParams,
    ) -> StoreResult<IssuedLogin>;
}

/// Resolves tenant-scoped provider credentials.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn credentials_for(
        &self,
        tenant: TenantId,
        provider: ProviderKind,
    ) -> StoreResult<ProviderCredentials>;
}
