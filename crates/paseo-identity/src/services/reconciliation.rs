//! Reconciliation engine.
//!
//! Given a freshly fetched external profile and a tenant context, decide
//! whether to attach to an existing linked user, merge into a user found by
//! email, create a new user, or refresh an existing link, then issue a
//! session. Classification order is fixed: link match, then email match,
//! then create; an explicit link is authoritative even if the provider
//! email has since changed.

use std::sync::Arc;

use paseo_core::{TenantId, UserId};
use tracing::{info, warn};

use crate::error::{IdentityError, IdentityResult, ProviderKind};
use crate::models::{
    DeviceParams, LinkPatch, LinkedIdentity, LoginOutcome, LoginRequest, NewLink, NewUser, User,
};
use crate::profile::ExternalProfile;
use crate::providers::{AccessToken, AdapterFactory, WalletBalances};
use crate::services::merge_policy::MergePolicy;
use crate::store::{
    CredentialResolver, IdentityLinkStore, SessionIssuer, StoreError, UserDirectory,
};

/// Orchestrates provider login and account reconciliation.
///
/// The service owns the decision; persisted mutation of users and links is
/// delegated to the [`UserDirectory`] and [`IdentityLinkStore`], which must
/// provide atomic create/update semantics.
pub struct ReconciliationService {
    adapters: Arc<dyn AdapterFactory>,
    credentials: Arc<dyn CredentialResolver>,
    links: Arc<dyn IdentityLinkStore>,
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionIssuer>,
}

impl ReconciliationService {
    /// Create a new reconciliation service over its collaborators.
    #[must_use]
    pub fn new(
        adapters: Arc<dyn AdapterFactory>,
        credentials: Arc<dyn CredentialResolver>,
        links: Arc<dyn IdentityLinkStore>,
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            adapters,
            credentials,
            links,
            directory,
            sessions,
        }
    }

    /// Log a user in through an external provider.
    ///
    /// Adapter failures propagate before any record is touched; persistence
    /// failures during the update/create paths surface as
    /// [`IdentityError::Persistence`]. The only retried operation is the
    /// single bounded re-lookup after a link uniqueness race.
    pub async fn login(&self, request: LoginRequest) -> IdentityResult<LoginOutcome> {
        let LoginRequest {
            provider,
            artifact,
            device,
            tenant,
        } = request;

        let credentials = self
            .credentials
            .credentials_for(tenant, provider)
            .await
            .map_err(|e| store_error(e, provider, ""))?;
        let adapter = self.adapters.adapter(provider, credentials);

        let access_token = adapter.exchange(&artifact).await?;
        let profile = adapter.fetch_profile(&access_token).await?;

        if !profile.has_external_id() {
            warn!(
                tenant_id = %tenant,
                provider = %provider,
                "provider returned a profile without an external identity"
            );
            return Err(IdentityError::AccessFailed { provider });
        }

        info!(
            tenant_id = %tenant,
            provider = %provider,
            external_id = %profile.external_id,
            "retrieved external profile"
        );

        let (user, is_new_user) = self
            .reconcile(tenant, &profile, &access_token, &device)
            .await?;

        let issued = self
            .sessions
            .issue(tenant, user.id, &device)
            .await
            .map_err(|e| store_error(e, provider, &profile.external_id))?;

        info!(
            tenant_id = %tenant,
            user_id = %user.id,
            provider = %provider,
            is_new_user,
            "login reconciled"
        );

        Ok(LoginOutcome {
            user,
            is_new_user,
            session: issued.session,
            pending_invitations: issued.pending_invitations,
        })
    }

    /// Read the wallet balances for a user through their stored link token.
    pub async fn wallet_balance(
        &self,
        tenant: TenantId,
        user_id: UserId,
        currency: &str,
    ) -> IdentityResult<WalletBalances> {
        let provider = ProviderKind::Wallet;

        let link = self
            .links
            .find_for_user(tenant, user_id, provider)
            .await
            .map_err(|e| store_error(e, provider, ""))?
            .ok_or(IdentityError::LinkNotFound { provider })?;

        let credentials = self
            .credentials
            .credentials_for(tenant, provider)
            .await
            .map_err(|e| store_error(e, provider, ""))?;
        let adapter = self.adapters.adapter(provider, credentials);

        adapter
            .balances(&AccessToken::new(link.access_token), currency)
            .await
    }

    /// Classify the profile and apply the matching path.
    async fn reconcile(
        &self,
        tenant: TenantId,
        profile: &ExternalProfile,
        token: &AccessToken,
        device: &DeviceParams,
    ) -> IdentityResult<(User, bool)> {
        let provider = profile.provider;

        // An explicit link wins over any email match.
        if let Some(found) = self.find_link(tenant, profile).await? {
            info!(user_id = %found.user.id, provider = %provider, "returning linked user");
            let user = self.refresh_linked(tenant, found, profile, token).await?;
            return Ok((user, false));
        }

        // No link: a user holding the profile's email adopts this identity.
        if let Some(email) = profile.email.as_deref() {
            if let Some(user) = self
                .directory
                .find_by_email(tenant, email)
                .await
                .map_err(|e| store_error(e, provider, &profile.external_id))?
            {
                info!(user_id = %user.id, provider = %provider, "matched existing user by email");
                return match self.adopt_matched(tenant, user, profile, token).await {
                    Err(e) if e.is_duplicate_link() => {
                        self.converge_on_existing_link(tenant, profile, token).await
                    }
                    other => other.map(|user| (user, false)),
                };
            }
        }

        // Nothing matched: one atomic user-with-embedded-link creation.
        match self.create_user(tenant, profile, token, device).await {
            Ok(user) => {
                info!(user_id = %user.id, provider = %provider, "created new user from external profile");
                Ok((user, true))
            }
            Err(e) if e.is_duplicate_link() => {
                self.converge_on_existing_link(tenant, profile, token).await
            }
            Err(e) => Err(e),
        }
    }

    /// Single bounded retry after a uniqueness race: a concurrent login won
    /// the attach, so re-run the link lookup once and fall through to the
    /// update path. A second miss surfaces the conflict.
    async fn converge_on_existing_link(
        &self,
        tenant: TenantId,
        profile: &ExternalProfile,
        token: &AccessToken,
    ) -> IdentityResult<(User, bool)> {
        warn!(
            tenant_id = %tenant,
            provider = %profile.provider,
            external_id = %profile.external_id,
            "link attach raced a concurrent login, re-running lookup"
        );

        match self.find_link(tenant, profile).await? {
            Some(found) => {
                let user = self.refresh_linked(tenant, found, profile, token).await?;
                Ok((user, false))
            }
            None => Err(IdentityError::DuplicateLink {
                provider: profile.provider,
                external_id: profile.external_id.clone(),
            }),
        }
    }

    async fn find_link(
        &self,
        tenant: TenantId,
        profile: &ExternalProfile,
    ) -> IdentityResult<Option<LinkedIdentity>> {
        self.links
            .find_link(tenant, profile.provider, &profile.external_id)
            .await
            .map_err(|e| store_error(e, profile.provider, &profile.external_id))
    }

    /// Update path for a user already holding the link: merge blank fields
    /// and refresh the link's token and avatar in place.
    async fn refresh_linked(
        &self,
        tenant: TenantId,
        found: LinkedIdentity,
        profile: &ExternalProfile,
        token: &AccessToken,
    ) -> IdentityResult<User> {
        let user = self.merge_profile(tenant, found.user, profile).await?;

        self.links
            .update(tenant, found.link.id, link_patch(profile, token))
            .await
            .map_err(|e| store_error(e, profile.provider, &profile.external_id))?;

        Ok(user)
    }

    /// Update path for an email-matched user: merge blank fields, then
    /// attach a link for this provider, or re-point an existing one that
    /// still carries an old external id.
    async fn adopt_matched(
        &self,
        tenant: TenantId,
        user: User,
        profile: &ExternalProfile,
        token: &AccessToken,
    ) -> IdentityResult<User> {
        let provider = profile.provider;
        let user = self.merge_profile(tenant, user, profile).await?;

        let existing = self
            .links
            .find_for_user(tenant, user.id, provider)
            .await
            .map_err(|e| store_error(e, provider, &profile.external_id))?;

        match existing {
            Some(link) => {
                self.links
                    .update(tenant, link.id, link_patch(profile, token))
                    .await
                    .map_err(|e| store_error(e, provider, &profile.external_id))?;
            }
            None => {
                self.links
                    .attach(tenant, user.id, new_link(profile, token))
                    .await
                    .map_err(|e| store_error(e, provider, &profile.external_id))?;
            }
        }

        Ok(user)
    }

    /// Apply the provider's merge policy; skip the directory write entirely
    /// when nothing would change.
    async fn merge_profile(
        &self,
        tenant: TenantId,
        user: User,
        profile: &ExternalProfile,
    ) -> IdentityResult<User> {
        let patch = MergePolicy::for_provider(profile.provider).patch_for(&user, profile);
        if patch.is_empty() {
            return Ok(user);
        }

        self.directory
            .update(tenant, user.id, patch)
            .await
            .map_err(|e| store_error(e, profile.provider, &profile.external_id))
    }

    async fn create_user(
        &self,
        tenant: TenantId,
        profile: &ExternalProfile,
        token: &AccessToken,
        device: &DeviceParams,
    ) -> IdentityResult<User> {
        let (first_name, last_name) = profile.name_parts();

        let new_user = NewUser {
            email: profile.email.clone(),
            first_name,
            last_name,
            birthday: profile.birthday(),
            gender: profile.gender.clone(),
            onboarding_completed: true,
            link: new_link(profile, token),
        };

        self.directory
            .create(tenant, new_user, device)
            .await
            .map_err(|e| store_error(e, profile.provider, &profile.external_id))
    }
}

fn new_link(profile: &ExternalProfile, token: &AccessToken) -> NewLink {
    NewLink {
        provider: profile.provider,
        external_id: profile.external_id.clone(),
        access_token: token.as_str().to_string(),
        avatar_url: profile.avatar_url.clone(),
    }
}

fn link_patch(profile: &ExternalProfile, token: &AccessToken) -> LinkPatch {
    LinkPatch {
        external_id: Some(profile.external_id.clone()),
        access_token: Some(token.as_str().to_string()),
        avatar_url: profile.avatar_url.clone(),
    }
}

fn store_error(err: StoreError, provider: ProviderKind, external_id: &str) -> IdentityError {
    match err {
        StoreError::DuplicateLink => IdentityError::DuplicateLink {
            provider,
            external_id: external_id.to_string(),
        },
        StoreError::NotConfigured { provider } => IdentityError::ProviderNotConfigured { provider },
        StoreError::Unavailable(message) => IdentityError::Persistence(message),
    }
}
