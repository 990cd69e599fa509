//! User repository for database operations

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use common::pagination::{PageRequest, SortDirection};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::models::User;

/// Columns a user listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    Id,
    #[default]
    Username,
    Email,
    FirstName,
    LastName,
    CreatedAt,
}

impl UserSortKey {
    /// Resolve a sort property as it appears in request parameters
    ///
    /// Both `firstName` and `first_name` spellings are accepted.
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "firstName" | "first_name" => Some(Self::FirstName),
            "lastName" | "last_name" => Some(Self::LastName),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::Email => "email",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Column values for a user row about to be inserted
#[derive(Debug, Clone)]
pub struct UserRecord<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

pub async fn insert(conn: &mut SqliteConnection, record: &UserRecord<'_>) -> DatabaseResult<User> {
    debug!(username = %record.username, "Inserting user");

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, first_name, last_name, email, is_admin, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(record.username)
    .bind(record.password_hash)
    .bind(record.first_name)
    .bind(record.last_name)
    .bind(record.email)
    .bind(record.admin)
    .bind(record.created_at)
    .bind(record.created_at)
    .fetch_one(conn)
    .await?;

    Ok(user)
}

/// Write every mutable column of `user` back to its row
pub async fn update(conn: &mut SqliteConnection, user: &User) -> DatabaseResult<User> {
    debug!(user_id = user.id, "Updating user");

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = ?, password_hash = ?, first_name = ?, last_name = ?, email = ?, is_admin = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(user.admin)
    .bind(user.updated_at)
    .bind(user.id)
    .fetch_one(conn)
    .await?;

    Ok(user)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// Exact, case-sensitive lookup
pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> DatabaseResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> DatabaseResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn exists(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(found)
}

pub async fn exists_by_username(conn: &mut SqliteConnection, username: &str) -> DatabaseResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
        .bind(username)
        .fetch_one(conn)
        .await?;
    Ok(found)
}

pub async fn exists_by_email(conn: &mut SqliteConnection, email: &str) -> DatabaseResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(conn)
        .await?;
    Ok(found)
}

/// Returns whether a row was removed
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DatabaseResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(conn)
        .await?;
    Ok(total)
}

/// One ordered page of users; ties are broken by id
pub async fn list(
    conn: &mut SqliteConnection,
    request: PageRequest,
    key: UserSortKey,
    direction: SortDirection,
) -> DatabaseResult<Vec<User>> {
    // Column and direction come from closed enums, never from user text.
    let sql = format!(
        "SELECT * FROM users ORDER BY {} {}, id ASC LIMIT ? OFFSET ?",
        key.column(),
        direction.as_sql()
    );

    let users = sqlx::query_as::<_, User>(&sql)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(conn)
        .await?;
    Ok(users)
}

/// Every user ordered by username, for assignee pickers
pub async fn list_all(conn: &mut SqliteConnection) -> DatabaseResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username ASC")
        .fetch_all(conn)
        .await?;
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_lookup() {
        assert_eq!(UserSortKey::from_property("firstName"), Some(UserSortKey::FirstName));
        assert_eq!(UserSortKey::from_property("last_name"), Some(UserSortKey::LastName));
        assert_eq!(UserSortKey::from_property("password"), None);
        assert_eq!(UserSortKey::default(), UserSortKey::Username);
    }
}
