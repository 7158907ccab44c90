//! Domain models for identity reconciliation.
//!
//! `User` and `ProviderLink` are persisted records owned by the user
//! directory and the link store; the engine only decides how they change.

use chrono::{DateTime, NaiveDate, Utc};
use paseo_core::{LinkId, SessionId, TenantId, TenantScoped, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProviderKind;
use crate::providers::AuthorizationArtifact;

/// An internal user account, scoped to a tenant.
///
/// Email is unique per tenant when present and stored lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for User {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// A persistent link binding one external provider identity to one user.
///
/// The tuple `(provider, external_id, tenant_id)` is unique: no two users
/// under the same tenant may claim the same external identity. Links are
/// never deleted; unlink is not part of this design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderLink {
    pub id: LinkId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub provider: ProviderKind,
    pub external_id: String,
    pub access_token: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for ProviderLink {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// A link lookup result with the owning user resolved in the same query.
#[derive(Debug, Clone)]
pub struct LinkedIdentity {
    pub link: ProviderLink,
    pub user: User,
}

/// Fields for attaching a new provider link to a user.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub provider: ProviderKind,
    pub external_id: String,
    pub access_token: String,
    pub avatar_url: Option<String>,
}

/// Partial update applied to an existing provider link on every login.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub external_id: Option<String>,
    pub access_token: Option<String>,
    pub avatar_url: Option<String>,
}

/// Fields for creating a new user together with one embedded link.
///
/// The directory persists the user and the link as a single atomic unit so
/// that a user can never exist half-created without its provider identity.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
    /// Provider signups skip the manual onboarding wizard.
    pub onboarding_completed: bool,
    pub link: NewLink,
}

/// Partial update applied to an existing user.
///
/// `None` fields are left untouched by the directory.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub onboarding_completed: Option<bool>,
}

impl UserPatch {
    /// True when the patch would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.birthday.is_none()
            && self.gender.is_none()
            && self.onboarding_completed.is_none()
    }
}

/// Client device context forwarded to the session issuer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceParams {
    pub device_id: Option<String>,
    pub device_name: Option<String>,
    pub platform: Option<String>,
}

/// A login session issued for a user.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// An invitation still pending for the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingInvitation {
    pub id: Uuid,
    pub email: Option<String>,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

/// Session issuer result: the session plus any invitations pending for the
/// user at login time.
#[derive(Debug, Clone)]
pub struct IssuedLogin {
    pub session: Session,
    pub pending_invitations: Vec<PendingInvitation>,
}

/// Input to a reconciliation login.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub provider: ProviderKind,
    pub artifact: AuthorizationArtifact,
    pub device: DeviceParams,
    pub tenant: TenantId,
}

/// Result of a reconciliation login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub is_new_user: bool,
    pub session: Session,
    pub pending_invitations: Vec<PendingInvitation>,
}
