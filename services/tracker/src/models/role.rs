//! Role model and related functionality

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization role of a principal
///
/// Never stored: it is computed from the user's admin flag, so the flag is
/// the single source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Derive the role from a user's admin flag
    pub fn from_admin_flag(admin: bool) -> Self {
        if admin { Role::Admin } else { Role::User }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("ADMIN"),
            Role::User => f.write_str("USER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_is_derived_from_admin_flag() {
        assert_eq!(Role::from_admin_flag(true), Role::Admin);
        assert_eq!(Role::from_admin_flag(false), Role::User);
    }

    #[test]
    fn test_admin_check_and_display() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::User.to_string(), "USER");
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }
}
