//! Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Roles known to the API. Stored by name in the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::User => "User",
        }
    }

    /// Parse a role claim; unknown names are `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Admin" => Some(UserRole::Admin),
            "User" => Some(UserRole::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_only() {
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("User"), Some(UserRole::User));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::User.to_string(), "User");
    }
}
