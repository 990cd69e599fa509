//! The user/bug assignment relation
//!
//! This table is the only record of who is assigned to what; both sides
//! read it through the queries below.

use common::error::DatabaseResult;
use sqlx::SqliteConnection;

use crate::models::{Bug, User};

/// Returns whether the pair was newly added
pub async fn assign(conn: &mut SqliteConnection, user_id: i64, bug_id: i64) -> DatabaseResult<bool> {
    let result =
        sqlx::query("INSERT OR IGNORE INTO user_assigned_bugs (user_id, bug_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(bug_id)
            .execute(conn)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns whether the pair existed
pub async fn unassign(
    conn: &mut SqliteConnection,
    user_id: i64,
    bug_id: i64,
) -> DatabaseResult<bool> {
    let result = sqlx::query("DELETE FROM user_assigned_bugs WHERE user_id = ? AND bug_id = ?")
        .bind(user_id)
        .bind(bug_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_user(conn: &mut SqliteConnection, user_id: i64) -> DatabaseResult<u64> {
    let result = sqlx::query("DELETE FROM user_assigned_bugs WHERE user_id = ?")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn remove_bug(conn: &mut SqliteConnection, bug_id: i64) -> DatabaseResult<u64> {
    let result = sqlx::query("DELETE FROM user_assigned_bugs WHERE bug_id = ?")
        .bind(bug_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Users assigned to a bug, by username
pub async fn users_for_bug(conn: &mut SqliteConnection, bug_id: i64) -> DatabaseResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        JOIN user_assigned_bugs a ON a.user_id = u.id
        WHERE a.bug_id = ?
        ORDER BY u.username ASC
        "#,
    )
    .bind(bug_id)
    .fetch_all(conn)
    .await?;
    Ok(users)
}

/// Bugs assigned to a user, by id
pub async fn bugs_for_user(conn: &mut SqliteConnection, user_id: i64) -> DatabaseResult<Vec<Bug>> {
    let bugs = sqlx::query_as::<_, Bug>(
        r#"
        SELECT b.* FROM bugs b
        JOIN user_assigned_bugs a ON a.bug_id = b.id
        WHERE a.user_id = ?
        ORDER BY b.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(bugs)
}
