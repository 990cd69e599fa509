//! Input validation for submitted forms
//!
//! Each failure is reported as a field name plus a message key; views
//! resolve the key in the request's locale.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::models::{BugDetails, NewBug, NewUser, ProfileUpdate, UpdateUser, user::supplied_password};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const NAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const PROFILE_PASSWORD_MIN: usize = 8;
pub const TITLE_MAX: usize = 255;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message_key: &'static str,
}

/// Every rejected field of one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single field failure
    pub fn single(field: &'static str, message_key: &'static str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message_key);
        errors
    }

    pub fn add(&mut self, field: &'static str, message_key: &'static str) {
        self.errors.push(FieldError { field, message_key });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message key recorded for `field`
    pub fn for_field(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message_key)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message_key))
            .collect();
        write!(f, "{}", fields.join(", "))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    if is_blank(username) {
        errors.add("username", "validation.username.required");
    } else if !(USERNAME_MIN..=USERNAME_MAX).contains(&char_len(username)) {
        errors.add("username", "validation.username.size");
    }
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if is_blank(value) {
        errors.add(field, "validation.name.required");
    } else if char_len(value) > NAME_MAX {
        errors.add(field, "validation.name.size");
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if is_blank(email) {
        errors.add("email", "validation.email.required");
    } else if !email_regex().is_match(email) {
        errors.add("email", "validation.email.invalid");
    }
}

fn check_optional_password(errors: &mut ValidationErrors, password: &Option<String>, min: usize) {
    if let Some(password) = supplied_password(password) {
        if char_len(password) < min {
            errors.add("password", password_size_key(min));
        }
    }
}

fn password_size_key(min: usize) -> &'static str {
    if min >= PROFILE_PASSWORD_MIN {
        "validation.password.size.profile"
    } else {
        "validation.password.size"
    }
}

fn check_bug_text(errors: &mut ValidationErrors, title: &str, description: &str) {
    if is_blank(title) {
        errors.add("title", "validation.title.required");
    } else if char_len(title) > TITLE_MAX {
        errors.add("title", "validation.title.size");
    }
    if is_blank(description) {
        errors.add("description", "validation.description.required");
    }
}

/// Registration and administrative creation
pub fn validate_new_user(user: &NewUser) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_username(&mut errors, &user.username);
    if is_blank(&user.password) {
        errors.add("password", "validation.password.required");
    } else if char_len(&user.password) < PASSWORD_MIN {
        errors.add("password", password_size_key(PASSWORD_MIN));
    }
    check_name(&mut errors, "first_name", &user.first_name);
    check_name(&mut errors, "last_name", &user.last_name);
    check_email(&mut errors, &user.email);
    errors.into_result()
}

/// Administrative update; the password may be left blank
pub fn validate_user_update(user: &UpdateUser) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_username(&mut errors, &user.username);
    check_optional_password(&mut errors, &user.password, PASSWORD_MIN);
    check_name(&mut errors, "first_name", &user.first_name);
    check_name(&mut errors, "last_name", &user.last_name);
    check_email(&mut errors, &user.email);
    errors.into_result()
}

/// Self-service profile edit; a new password must be longer than at registration
pub fn validate_profile(profile: &ProfileUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, "first_name", &profile.first_name);
    check_name(&mut errors, "last_name", &profile.last_name);
    check_email(&mut errors, &profile.email);
    check_optional_password(&mut errors, &profile.password, PROFILE_PASSWORD_MIN);
    errors.into_result()
}

pub fn validate_new_bug(bug: &NewBug) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_bug_text(&mut errors, &bug.title, &bug.description);
    errors.into_result()
}

pub fn validate_bug_details(bug: &BugDetails) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_bug_text(&mut errors, &bug.title, &bug.description);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Status};

    fn new_user() -> NewUser {
        NewUser {
            username: "jdoe".to_string(),
            password: "password".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            admin: false,
        }
    }

    #[test]
    fn test_valid_new_user() {
        assert!(validate_new_user(&new_user()).is_ok());
    }

    #[test]
    fn test_username_bounds_count_characters() {
        let mut user = new_user();
        user.username = "ab".to_string();
        let errors = validate_new_user(&user).unwrap_err();
        assert_eq!(errors.for_field("username"), Some("validation.username.size"));

        user.username = "é".repeat(50);
        assert!(validate_new_user(&user).is_ok());

        user.username = "a".repeat(51);
        assert!(validate_new_user(&user).is_err());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let user = NewUser {
            username: " ".to_string(),
            password: "12345".to_string(),
            first_name: String::new(),
            last_name: "x".repeat(51),
            email: "not-an-email".to_string(),
            admin: false,
        };

        let errors = validate_new_user(&user).unwrap_err();
        assert_eq!(errors.for_field("username"), Some("validation.username.required"));
        assert_eq!(errors.for_field("password"), Some("validation.password.size"));
        assert_eq!(errors.for_field("first_name"), Some("validation.name.required"));
        assert_eq!(errors.for_field("last_name"), Some("validation.name.size"));
        assert_eq!(errors.for_field("email"), Some("validation.email.invalid"));
        assert_eq!(errors.iter().count(), 5);
    }

    #[test]
    fn test_blank_password_allowed_on_update() {
        let update = UpdateUser {
            id: 1,
            username: "jdoe".to_string(),
            password: Some(String::new()),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            admin: true,
        };
        assert!(validate_user_update(&update).is_ok());
    }

    #[test]
    fn test_profile_password_needs_eight_characters() {
        let mut profile = ProfileUpdate {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: Some("short12".to_string()),
        };
        let errors = validate_profile(&profile).unwrap_err();
        assert_eq!(
            errors.for_field("password"),
            Some("validation.password.size.profile")
        );

        profile.password = Some("longenough".to_string());
        assert!(validate_profile(&profile).is_ok());

        profile.password = None;
        assert!(validate_profile(&profile).is_ok());
    }

    #[test]
    fn test_bug_title_and_description() {
        let mut bug = NewBug {
            title: "t".repeat(255),
            description: "Steps to reproduce".to_string(),
            priority: Priority::Low,
            status: Status::Open,
            assignee_ids: vec![],
        };
        assert!(validate_new_bug(&bug).is_ok());

        bug.title = "t".repeat(256);
        bug.description = "  ".to_string();
        let errors = validate_new_bug(&bug).unwrap_err();
        assert_eq!(errors.for_field("title"), Some("validation.title.size"));
        assert_eq!(
            errors.for_field("description"),
            Some("validation.description.required")
        );
    }
}
