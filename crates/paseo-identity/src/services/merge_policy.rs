//! Provider-configurable field-merge policy.
//!
//! How profile data flows into an existing user differs between provider
//! families. The divergence is one table of rules rather than logic spread
//! across adapters.

use crate::error::ProviderKind;
use crate::models::{User, UserPatch};
use crate::profile::ExternalProfile;

/// How one user field absorbs a profile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Never touch the field.
    Ignore,
    /// Set the field only when it is currently blank.
    FillIfBlank,
    /// Always take the profile value when one is present.
    Overwrite,
}

/// Field-merge policy for one provider family.
#[derive(Debug, Clone)]
pub struct MergePolicy {
    pub email: FieldRule,
    pub first_name: FieldRule,
    pub last_name: FieldRule,
    pub birthday: FieldRule,
    pub gender: FieldRule,
    /// Whether a login through this provider marks onboarding complete.
    pub mark_onboarded: bool,
}

/// Wallet family: fill-if-blank everywhere, no gender on the wire, and a
/// wallet login completes onboarding.
const WALLET_POLICY: MergePolicy = MergePolicy {
    email: FieldRule::FillIfBlank,
    first_name: FieldRule::FillIfBlank,
    last_name: FieldRule::FillIfBlank,
    birthday: FieldRule::FillIfBlank,
    gender: FieldRule::Ignore,
    mark_onboarded: true,
};

/// Social family: fill-if-blank for identity fields, gender always follows
/// the provider.
const SOCIAL_POLICY: MergePolicy = MergePolicy {
    email: FieldRule::FillIfBlank,
    first_name: FieldRule::FillIfBlank,
    last_name: FieldRule::FillIfBlank,
    birthday: FieldRule::FillIfBlank,
    gender: FieldRule::Overwrite,
    mark_onboarded: false,
};

impl MergePolicy {
    /// Look up the policy for a provider family.
    #[must_use]
    pub const fn for_provider(kind: ProviderKind) -> &'static MergePolicy {
        match kind {
            ProviderKind::Wallet => &WALLET_POLICY,
            ProviderKind::Social => &SOCIAL_POLICY,
        }
    }

    /// Compute the user patch this policy produces for a profile.
    ///
    /// Blank profile values never overwrite anything, and values equal to
    /// the current field are dropped so an empty patch means "no write".
    #[must_use]
    pub fn patch_for(&self, user: &User, profile: &ExternalProfile) -> UserPatch {
        let (first, last) = profile.name_parts();

        let mut patch = UserPatch {
            email: resolve(self.email, &user.email, profile.email.clone()),
            first_name: resolve(self.first_name, &user.first_name, non_blank(first)),
            last_name: resolve(self.last_name, &user.last_name, non_blank(last)),
            gender: resolve(self.gender, &user.gender, profile.gender.clone()),
            ..UserPatch::default()
        };

        if matches!(self.birthday, FieldRule::FillIfBlank | FieldRule::Overwrite) {
            let fillable = user.birthday.is_none() || self.birthday == FieldRule::Overwrite;
            if fillable {
                patch.birthday = profile.birthday().filter(|b| user.birthday.as_ref() != Some(b));
            }
        }

        if self.mark_onboarded && !user.onboarding_completed {
            patch.onboarding_completed = Some(true);
        }

        patch
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn resolve(rule: FieldRule, current: &Option<String>, candidate: Option<String>) -> Option<String> {
    let candidate = candidate.and_then(non_blank)?;
    match rule {
        FieldRule::Ignore => None,
        FieldRule::FillIfBlank if is_blank(current) => Some(candidate),
        FieldRule::FillIfBlank => None,
        FieldRule::Overwrite if current.as_deref() != Some(candidate.as_str()) => Some(candidate),
        FieldRule::Overwrite => None,
    }
}
