//! Attribute resolution and authorization policy.
//!
//! Rules match on substrings of the distinguished name. The order below decides
//! who ends up in which group, so it must not be rearranged:
//!
//! 1. DN contains `Administrators` → denied, before anything else is derived.
//! 2. DN contains `Finance` → `finance`.
//! 3. DN contains `Contractor` → `contractor`.
//! 4. otherwise → `employee`.

use super::outcome::{AuthorizationGroup, Credential, ErrorCode, NO_ACCESS_EMAIL};
use crate::directory::AttributeSet;

/// Container whose members may never sign in through the proxy.
pub const RESTRICTED_MARKER: &str = "Administrators";

const GROUP_RULES: [(&str, AuthorizationGroup); 2] = [
    ("Finance", AuthorizationGroup::Finance),
    ("Contractor", AuthorizationGroup::Contractor),
];

#[must_use]
pub fn is_restricted(distinguished_name: &str) -> bool {
    distinguished_name.contains(RESTRICTED_MARKER)
}

#[must_use]
pub fn derive_email(user_principal_name: Option<&str>) -> String {
    user_principal_name.map_or_else(|| NO_ACCESS_EMAIL.to_string(), str::to_lowercase)
}

#[must_use]
pub fn map_group(distinguished_name: &str) -> AuthorizationGroup {
    GROUP_RULES
        .iter()
        .find(|(marker, _)| distinguished_name.contains(*marker))
        .map_or(AuthorizationGroup::Employee, |(_, group)| *group)
}

/// Turn directory attributes into a credential, applying the access gate first.
///
/// # Errors
/// Returns `ErrorCode::AccessDenied` if the account sits under a restricted container.
pub fn resolve(attributes: &AttributeSet) -> Result<Credential, ErrorCode> {
    if is_restricted(&attributes.distinguished_name) {
        return Err(ErrorCode::AccessDenied);
    }

    Ok(Credential {
        sam_account_name: attributes.sam_account_name.clone(),
        email_address: derive_email(attributes.user_principal_name.as_deref()),
        authorization_group: map_group(&attributes.distinguished_name),
    })
}
