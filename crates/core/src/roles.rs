//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `profiles.role` in
//! `20250101000002_create_profiles.sql`.

use crate::error::CoreError;

pub const ROLE_INSPECTOR: &str = "inspector";
pub const ROLE_MANAGER: &str = "manager";

/// All assignable roles.
pub const VALID_ROLES: &[&str] = &[ROLE_INSPECTOR, ROLE_MANAGER];

/// Validate that a role string is one of the assignable roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        assert!(validate_role("inspector").is_ok());
        assert!(validate_role("manager").is_ok());
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(validate_role("admin").is_err());
        assert!(validate_role("").is_err());
    }
}
