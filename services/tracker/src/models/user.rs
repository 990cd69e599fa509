//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Role;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(rename = "is_admin")]
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_admin_flag(self.admin)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// New user creation payload
///
/// `password` is plaintext; the user service hashes it before storing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
}

/// Administrative user update payload
///
/// A blank or missing password keeps the stored hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub id: i64,
    pub username: String,
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub admin: bool,
}

/// Self-service profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
}

/// Returns the new plaintext password when one was actually supplied
pub(crate) fn supplied_password(password: &Option<String>) -> Option<&str> {
    password
        .as_deref()
        .filter(|p| !p.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_password_is_not_supplied() {
        assert_eq!(supplied_password(&None), None);
        assert_eq!(supplied_password(&Some(String::new())), None);
        assert_eq!(supplied_password(&Some("   ".to_string())), None);
        assert_eq!(
            supplied_password(&Some("s3cret!".to_string())),
            Some("s3cret!")
        );
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: 1,
            username: "jdoe".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            admin: true,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&user).expect("serialize user");
        assert!(!json.contains("argon2"));
        assert_eq!(user.role(), Role::Admin);
        assert_eq!(user.full_name(), "John Doe");
    }
}
