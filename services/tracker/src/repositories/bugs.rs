//! Bug repository for database operations

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use common::pagination::PageRequest;
use sqlx::SqliteConnection;
use tracing::debug;

use super::escape_like;
use crate::models::{Bug, Priority, Status};

/// Column values for a bug row about to be inserted
#[derive(Debug, Clone)]
pub struct BugRecord<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// Text column a filter can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColumn {
    Title,
    Description,
}

impl TextColumn {
    fn name(&self) -> &'static str {
        match self {
            TextColumn::Title => "title",
            TextColumn::Description => "description",
        }
    }

    /// Column holding the case-folded text
    fn search_name(&self) -> &'static str {
        match self {
            TextColumn::Title => "title_search",
            TextColumn::Description => "description_search",
        }
    }
}

/// Resolved search predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BugFilter {
    TextEquals(TextColumn, String),
    /// Case-insensitive substring match
    TextContains(TextColumn, String),
    Priority(Priority),
    Status(Status),
}

impl BugFilter {
    fn where_clause(&self) -> String {
        match self {
            BugFilter::TextEquals(column, _) => format!("{} = ?", column.name()),
            BugFilter::TextContains(column, _) => {
                format!("{} LIKE ? ESCAPE '\\'", column.search_name())
            }
            BugFilter::Priority(_) => "priority = ?".to_string(),
            BugFilter::Status(_) => "status = ?".to_string(),
        }
    }

    fn bind_value(&self) -> String {
        match self {
            BugFilter::TextEquals(_, value) => value.clone(),
            BugFilter::TextContains(_, value) => {
                format!("%{}%", escape_like(&fold_case(value)))
            }
            BugFilter::Priority(priority) => priority.as_str().to_string(),
            BugFilter::Status(status) => status.as_str().to_string(),
        }
    }
}

/// Unicode-aware lowercasing used for both stored search text and patterns
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

pub async fn insert(conn: &mut SqliteConnection, record: &BugRecord<'_>) -> DatabaseResult<Bug> {
    debug!(title = %record.title, "Inserting bug");

    let bug = sqlx::query_as::<_, Bug>(
        r#"
        INSERT INTO bugs (title, description, priority, status, created_at, updated_at,
                          title_search, description_search)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(record.title)
    .bind(record.description)
    .bind(record.priority)
    .bind(record.status)
    .bind(record.created_at)
    .bind(record.created_at)
    .bind(fold_case(record.title))
    .bind(fold_case(record.description))
    .fetch_one(conn)
    .await?;

    Ok(bug)
}

/// Write the mutable columns of `bug` back to its row; `created_at` is never touched
pub async fn update(conn: &mut SqliteConnection, bug: &Bug) -> DatabaseResult<Bug> {
    debug!(bug_id = bug.id, "Updating bug");

    let bug = sqlx::query_as::<_, Bug>(
        r#"
        UPDATE bugs
        SET title = ?, description = ?, priority = ?, status = ?, updated_at = ?,
            title_search = ?, description_search = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&bug.title)
    .bind(&bug.description)
    .bind(bug.priority)
    .bind(bug.status)
    .bind(bug.updated_at)
    .bind(fold_case(&bug.title))
    .bind(fold_case(&bug.description))
    .bind(bug.id)
    .fetch_one(conn)
    .await?;

    Ok(bug)
}

pub async fn touch(
    conn: &mut SqliteConnection,
    id: i64,
    updated_at: DateTime<Utc>,
) -> DatabaseResult<()> {
    sqlx::query("UPDATE bugs SET updated_at = ? WHERE id = ?")
        .bind(updated_at)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Option<Bug>> {
    let bug = sqlx::query_as::<_, Bug>("SELECT * FROM bugs WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(bug)
}

/// Returns whether a row was removed
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<bool> {
    let result = sqlx::query("DELETE FROM bugs WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> DatabaseResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bugs")
        .fetch_one(conn)
        .await?;
    Ok(total)
}

/// One page of bugs ordered by id
pub async fn list(conn: &mut SqliteConnection, request: PageRequest) -> DatabaseResult<Vec<Bug>> {
    let bugs = sqlx::query_as::<_, Bug>("SELECT * FROM bugs ORDER BY id ASC LIMIT ? OFFSET ?")
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(conn)
        .await?;
    Ok(bugs)
}

/// One page of bugs matching `filter`, ordered by id
pub async fn search(
    conn: &mut SqliteConnection,
    filter: &BugFilter,
    request: PageRequest,
) -> DatabaseResult<Vec<Bug>> {
    let sql = format!(
        "SELECT * FROM bugs WHERE {} ORDER BY id ASC LIMIT ? OFFSET ?",
        filter.where_clause()
    );

    let bugs = sqlx::query_as::<_, Bug>(&sql)
        .bind(filter.bind_value())
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(conn)
        .await?;
    Ok(bugs)
}

pub async fn count_matching(conn: &mut SqliteConnection, filter: &BugFilter) -> DatabaseResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM bugs WHERE {}", filter.where_clause());

    let total: i64 = sqlx::query_scalar(&sql)
        .bind(filter.bind_value())
        .fetch_one(conn)
        .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_filter_escapes_wildcards() {
        let filter = BugFilter::TextContains(TextColumn::Title, "50%".to_string());
        assert_eq!(filter.bind_value(), "%50\\%%");
        assert_eq!(filter.where_clause(), "title_search LIKE ? ESCAPE '\\'");
    }

    #[test]
    fn test_contains_filter_folds_non_ascii() {
        let filter = BugFilter::TextContains(TextColumn::Description, "ÉLAN".to_string());
        assert_eq!(filter.bind_value(), "%élan%");
        assert_eq!(filter.where_clause(), "description_search LIKE ? ESCAPE '\\'");
    }

    #[test]
    fn test_enum_filters_bind_stored_names() {
        assert_eq!(BugFilter::Status(Status::InProgress).bind_value(), "IN_PROGRESS");
        assert_eq!(BugFilter::Priority(Priority::High).where_clause(), "priority = ?");
    }
}
