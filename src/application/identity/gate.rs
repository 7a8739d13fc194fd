//! Role checks applied after authentication.

use crate::domain::{DomainError, DomainResult, Identity, UserRole};

/// Roles allowed to manage news, schedule and media.
pub const CONTENT_EDITORS: &[UserRole] = &[UserRole::Admin, UserRole::Editor];

/// Roles allowed to register accounts and read statistics.
pub const ADMINS_ONLY: &[UserRole] = &[UserRole::Admin];

pub fn require_role(identity: &Identity, allowed: &[UserRole]) -> DomainResult<()> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "role `{}` may not perform this action",
            identity.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole) -> Identity {
        Identity {
            user_id: "u".into(),
            username: "u".into(),
            role,
        }
    }

    #[test]
    fn editors_can_edit_but_not_administer() {
        assert!(require_role(&caller(UserRole::Editor), CONTENT_EDITORS).is_ok());
        assert!(matches!(
            require_role(&caller(UserRole::Editor), ADMINS_ONLY),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn admins_pass_every_gate() {
        assert!(require_role(&caller(UserRole::Admin), CONTENT_EDITORS).is_ok());
        assert!(require_role(&caller(UserRole::Admin), ADMINS_ONLY).is_ok());
    }
}
