//! User directory service

use std::sync::Arc;

use chrono::Utc;
use common::error::DatabaseError;
use common::pagination::{Page, PageRequest, SortDirection, parse_sort};
use tracing::{info, warn};

use super::ServiceResult;
use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{Bug, NewUser, ProfileUpdate, UpdateUser, User, next_timestamp, user::supplied_password};
use crate::password::PasswordEncoder;
use crate::repositories::{UserSortKey, assignments, users};

/// Owns every user lifecycle operation and the username/email uniqueness rules
#[derive(Clone)]
pub struct UserService {
    db: Database,
    encoder: Arc<dyn PasswordEncoder>,
}

impl UserService {
    pub fn new(db: Database, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { db, encoder }
    }

    /// Exact, case-sensitive lookup
    pub async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let mut tx = self.db.begin().await?;
        let user = users::find_by_username(&mut tx, username).await?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        let mut tx = self.db.begin().await?;
        let user = users::find_by_id(&mut tx, id).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Like `find_by_id`, but a missing user is an error
    pub async fn get_user(&self, id: i64) -> ServiceResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(id))
    }

    /// One page of users
    ///
    /// `sort` has the form `property[,asc|desc]`; blank means by username.
    pub async fn list_users(
        &self,
        request: PageRequest,
        sort: Option<&str>,
    ) -> ServiceResult<Page<User>> {
        let (key, direction) = resolve_sort(sort)?;

        let mut tx = self.db.begin().await?;
        let content = users::list(&mut tx, request, key, direction).await?;
        let total = users::count(&mut tx).await?;
        tx.commit().await?;

        Ok(Page::new(content, request, total))
    }

    /// Every user, ordered by username
    pub async fn all_users(&self) -> ServiceResult<Vec<User>> {
        let mut tx = self.db.begin().await?;
        let all = users::list_all(&mut tx).await?;
        tx.commit().await?;
        Ok(all)
    }

    pub async fn create_user(&self, candidate: NewUser) -> ServiceResult<User> {
        let password_hash = self.encoder.encode(&candidate.password)?;
        let mut tx = self.db.begin_write().await?;

        if users::exists_by_username(&mut tx, &candidate.username).await? {
            warn!(username = %candidate.username, "Rejected user creation: username taken");
            return Err(ServiceError::username_taken(&candidate.username));
        }
        if users::exists_by_email(&mut tx, &candidate.email).await? {
            warn!(email = %candidate.email, "Rejected user creation: email taken");
            return Err(ServiceError::email_taken(&candidate.email));
        }

        let record = users::UserRecord {
            username: &candidate.username,
            password_hash: &password_hash,
            first_name: &candidate.first_name,
            last_name: &candidate.last_name,
            email: &candidate.email,
            admin: candidate.admin,
            created_at: Utc::now(),
        };

        let user = users::insert(&mut tx, &record)
            .await
            .map_err(|e| conflict_or_database(e, &candidate.username, &candidate.email))?;
        tx.commit().await?;

        info!(user_id = user.id, username = %user.username, admin = user.admin, "User created");
        Ok(user)
    }

    /// Self-registration; the admin flag is always cleared
    pub async fn register_user(&self, mut candidate: NewUser) -> ServiceResult<User> {
        candidate.admin = false;
        self.create_user(candidate).await
    }

    pub async fn update_user(&self, update: UpdateUser) -> ServiceResult<User> {
        let mut tx = self.db.begin_write().await?;

        let mut user = users::find_by_id(&mut tx, update.id)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(update.id))?;

        if update.username != user.username
            && users::exists_by_username(&mut tx, &update.username).await?
        {
            warn!(user_id = user.id, username = %update.username, "Rejected user update: username taken");
            return Err(ServiceError::username_taken(&update.username));
        }
        if update.email != user.email {
            ensure_email_free(&mut tx, &update.email, user.id).await?;
        }

        user.username = update.username;
        user.email = update.email;
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.admin = update.admin;
        if let Some(password) = supplied_password(&update.password) {
            user.password_hash = self.encoder.encode(password)?;
        }
        user.updated_at = next_timestamp(user.updated_at);

        let user = users::update(&mut tx, &user)
            .await
            .map_err(|e| conflict_or_database(e, &user.username, &user.email))?;
        tx.commit().await?;

        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Self-service edit of the principal's own record
    pub async fn update_profile(
        &self,
        username: &str,
        profile: ProfileUpdate,
    ) -> ServiceResult<User> {
        let mut tx = self.db.begin_write().await?;

        let mut user = users::find_by_username(&mut tx, username)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("User not found with username: {username}"))
            })?;

        ensure_email_free(&mut tx, &profile.email, user.id).await?;

        user.first_name = profile.first_name;
        user.last_name = profile.last_name;
        user.email = profile.email;
        if let Some(password) = supplied_password(&profile.password) {
            user.password_hash = self.encoder.encode(password)?;
        }
        user.updated_at = next_timestamp(user.updated_at);

        let user = users::update(&mut tx, &user)
            .await
            .map_err(|e| conflict_or_database(e, &user.username, &user.email))?;
        tx.commit().await?;

        info!(user_id = user.id, "Profile updated");
        Ok(user)
    }

    /// Removes the user and every assignment that referenced it
    pub async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.db.begin_write().await?;

        if !users::exists(&mut tx, id).await? {
            return Err(ServiceError::user_not_found(id));
        }
        let detached = assignments::remove_user(&mut tx, id).await?;
        users::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!(user_id = id, detached, "User deleted");
        Ok(())
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        let mut tx = self.db.begin().await?;
        let total = users::count(&mut tx).await?;
        tx.commit().await?;
        Ok(total)
    }

    /// Bugs the user is assigned to
    pub async fn assigned_bugs(&self, user_id: i64) -> ServiceResult<Vec<Bug>> {
        let mut tx = self.db.begin().await?;
        if !users::exists(&mut tx, user_id).await? {
            return Err(ServiceError::user_not_found(user_id));
        }
        let bugs = assignments::bugs_for_user(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(bugs)
    }
}

async fn ensure_email_free(
    conn: &mut sqlx::SqliteConnection,
    email: &str,
    owner_id: i64,
) -> ServiceResult<()> {
    match users::find_by_email(conn, email).await? {
        Some(other) if other.id != owner_id => {
            warn!(email = %email, "Rejected update: email taken");
            Err(ServiceError::email_taken(email))
        }
        _ => Ok(()),
    }
}

/// Report a UNIQUE violation that slipped past the read-then-act check
/// as the conflict it is
fn conflict_or_database(e: DatabaseError, username: &str, email: &str) -> ServiceError {
    match e.unique_violation() {
        Some(message) if message.contains("users.email") => ServiceError::email_taken(email),
        Some(message) if message.contains("users.username") => {
            ServiceError::username_taken(username)
        }
        _ => ServiceError::Database(e),
    }
}

fn resolve_sort(sort: Option<&str>) -> ServiceResult<(UserSortKey, SortDirection)> {
    let raw = match sort.map(str::trim) {
        None | Some("") => return Ok((UserSortKey::default(), SortDirection::Asc)),
        Some(raw) => raw,
    };

    let invalid = || ServiceError::InvalidCriteria {
        field: "sort".to_string(),
        message_key: "error.sort.invalid",
    };

    let (property, direction) = parse_sort(raw).ok_or_else(invalid)?;
    let key = UserSortKey::from_property(property).ok_or_else(invalid)?;
    Ok((key, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sort() {
        assert_eq!(
            resolve_sort(None).expect("default"),
            (UserSortKey::Username, SortDirection::Asc)
        );
        assert_eq!(
            resolve_sort(Some("email,desc")).expect("email"),
            (UserSortKey::Email, SortDirection::Desc)
        );
        assert!(matches!(
            resolve_sort(Some("password")),
            Err(ServiceError::InvalidCriteria { .. })
        ));
        assert!(matches!(
            resolve_sort(Some("username,sideways")),
            Err(ServiceError::InvalidCriteria { .. })
        ));
    }

    #[tokio::test]
    async fn test_unique_violation_reported_as_conflict() {
        let db = Database::open_in_memory().await.expect("open database");
        let mut conn = db.pool().acquire().await.expect("acquire");
        let record = users::UserRecord {
            username: "jdoe",
            password_hash: "hash",
            first_name: "John",
            last_name: "Doe",
            email: "jdoe@example.com",
            admin: false,
            created_at: Utc::now(),
        };
        users::insert(&mut conn, &record).await.expect("first insert");

        let same_username = users::UserRecord {
            email: "john.doe@example.com",
            ..record.clone()
        };
        let err = users::insert(&mut conn, &same_username)
            .await
            .expect_err("duplicate username");
        assert_eq!(
            err.unique_violation(),
            Some("UNIQUE constraint failed: users.username")
        );
        assert!(matches!(
            conflict_or_database(err, "jdoe", "john.doe@example.com"),
            ServiceError::AlreadyExists { field: "username", .. }
        ));

        let record = users::UserRecord {
            username: "johnny",
            ..record
        };
        let err = users::insert(&mut conn, &record).await.expect_err("duplicate email");
        assert!(matches!(
            conflict_or_database(err, "johnny", "jdoe@example.com"),
            ServiceError::AlreadyExists { field: "email", .. }
        ));
    }
}
