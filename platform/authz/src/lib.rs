//! Authorization primitives for the MemberHub gateway.
//!
//! The permission model is a static table mapping role names to the
//! (action, subject) pairs they may perform. Roles are flat: there is no
//! hierarchy and no inheritance, each role's grants are listed completely.
//! Unknown roles hold no abilities, so the policy is deny by default.

mod ability;
mod table;

pub use ability::{Ability, AbilitySet, Action, Subject};
pub use table::{abilities_for, is_permitted};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("credential carries no role claim")]
    MissingRole,

    #[error("role {role} may not {action} {subject}")]
    PermissionDenied {
        role: String,
        action: Action,
        subject: Subject,
    },
}

/// The request-level gate: may `role` perform `action` on `subject`?
///
/// A blank role is an authorization failure in its own right, distinct from
/// an ordinary denial; the caller already authenticated the credential and
/// needs to know which of the two happened.
pub fn authorize(role: &str, action: Action, subject: Subject) -> Result<(), AuthzError> {
    if role.trim().is_empty() {
        return Err(AuthzError::MissingRole);
    }
    if is_permitted(role, action, subject) {
        Ok(())
    } else {
        Err(AuthzError::PermissionDenied {
            role: role.to_string(),
            action,
            subject,
        })
    }
}
