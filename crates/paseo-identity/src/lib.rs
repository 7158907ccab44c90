//! External identity reconciliation for Paseo.
//!
//! This crate links a user's account to third-party identity providers (the
//! financial-wallet provider and the social-network provider) and reconciles
//! the fetched profile with the internal user record, issuing a logged-in
//! session as the final effect.
//!
//! # Features
//!
//! - **Provider adapters**: wallet and social OAuth token exchange and
//!   profile normalization behind one trait
//! - **Reconciliation**: link match, email match, or create, in that order,
//!   with no duplicate users or duplicate links
//! - **Merge policy**: provider-configurable fill-if-blank/overwrite table
//! - **Multi-tenant**: every lookup and uniqueness constraint is scoped to a
//!   tenant
//!
//! # Example
//!
//! ```rust,ignore
//! use paseo_identity::{LoginRequest, ReconciliationService};
//!
//! let service = ReconciliationService::new(adapters, credentials, links, directory, sessions);
//! let outcome = service.login(request).await?;
//! ```

pub mod error;
pub mod models;
pub mod profile;
pub mod providers;
pub mod services;
pub mod store;

pub use error::{IdentityError, IdentityResult, ProviderKind};
pub use models::{
    DeviceParams, IssuedLogin, LinkPatch, LinkedIdentity, LoginOutcome, LoginRequest, NewLink,
    NewUser, PendingInvitation, ProviderLink, Session, User, UserPatch,
};
pub use profile::ExternalProfile;
pub use providers::{
    AccessToken, AdapterFactory, AuthorizationArtifact, HttpAdapterFactory, ProviderAdapter,
    ProviderCredentials, SocialAdapter, WalletAdapter, WalletBalances, WalletCard,
};
pub use services::{FieldRule, MergePolicy, ReconciliationService};
pub use store::{
    CredentialResolver, IdentityLinkStore, SessionIssuer, StoreError, StoreResult, UserDirectory,
};
