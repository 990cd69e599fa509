//! Bug tracking service

use chrono::Utc;
use common::pagination::{Page, PageRequest};
use tracing::{debug, info};

use super::ServiceResult;
use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{
    Bug, BugCriteria, BugDetails, NewBug, Priority, SearchableBugField, Status, User,
    next_timestamp,
};
use crate::repositories::bugs::{BugRecord, TextColumn};
use crate::repositories::{BugFilter, assignments, bugs, users};

/// Owns every bug lifecycle operation and the assignment relation
#[derive(Clone)]
pub struct BugService {
    db: Database,
}

impl BugService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store a new bug and assign the requested users
    ///
    /// Nothing is written when any assignee does not exist.
    pub async fn create_bug(&self, candidate: NewBug) -> ServiceResult<Bug> {
        let mut tx = self.db.begin_write().await?;

        let mut assignee_ids = candidate.assignee_ids.clone();
        assignee_ids.sort_unstable();
        assignee_ids.dedup();
        for user_id in &assignee_ids {
            if !users::exists(&mut tx, *user_id).await? {
                return Err(ServiceError::user_not_found(*user_id));
            }
        }

        let record = BugRecord {
            title: &candidate.title,
            description: &candidate.description,
            priority: candidate.priority,
            status: candidate.status,
            created_at: Utc::now(),
        };
        let bug = bugs::insert(&mut tx, &record).await?;
        for user_id in &assignee_ids {
            assignments::assign(&mut tx, *user_id, bug.id).await?;
        }
        tx.commit().await?;

        info!(bug_id = bug.id, assignees = assignee_ids.len(), "Bug created");
        Ok(bug)
    }

    pub async fn get_bug_by_id(&self, id: i64) -> ServiceResult<Bug> {
        let mut tx = self.db.begin().await?;
        let bug = bugs::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bug not found with id: {id}")))?;
        tx.commit().await?;
        Ok(bug)
    }

    /// One page of bugs ordered by id
    pub async fn list_bugs(&self, request: PageRequest) -> ServiceResult<Page<Bug>> {
        let mut tx = self.db.begin().await?;
        let content = bugs::list(&mut tx, request).await?;
        let total = bugs::count(&mut tx).await?;
        tx.commit().await?;
        Ok(Page::new(content, request, total))
    }

    /// Replace title, description, priority and status; assignment is untouched
    pub async fn update_bug(&self, id: i64, details: BugDetails) -> ServiceResult<Bug> {
        let mut tx = self.db.begin_write().await?;

        let mut bug = bugs::find_by_id(&mut tx, id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Cannot update. Bug not found with id: {id}"))
        })?;

        bug.title = details.title;
        bug.description = details.description;
        bug.priority = details.priority;
        bug.status = details.status;
        bug.updated_at = next_timestamp(bug.updated_at);

        let bug = bugs::update(&mut tx, &bug).await?;
        tx.commit().await?;

        info!(bug_id = bug.id, status = %bug.status, "Bug updated");
        Ok(bug)
    }

    /// Removes the bug and its assignments
    pub async fn delete_bug(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.db.begin_write().await?;

        if bugs::find_by_id(&mut tx, id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Cannot delete. Bug not found with id: {id}"
            )));
        }
        let detached = assignments::remove_bug(&mut tx, id).await?;
        bugs::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!(bug_id = id, detached, "Bug deleted");
        Ok(())
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        let mut tx = self.db.begin().await?;
        let total = bugs::count(&mut tx).await?;
        tx.commit().await?;
        Ok(total)
    }

    /// Assign `user_id` to `bug_id`
    ///
    /// Returns whether the assignment is new; the bug's `updated_at` only
    /// moves when it is.
    pub async fn assign_user(&self, bug_id: i64, user_id: i64) -> ServiceResult<bool> {
        let mut tx = self.db.begin_write().await?;
        let bug = self.load_pair(&mut tx, bug_id, user_id).await?;

        let added = assignments::assign(&mut tx, user_id, bug_id).await?;
        if added {
            bugs::touch(&mut tx, bug_id, next_timestamp(bug.updated_at)).await?;
        }
        tx.commit().await?;

        info!(bug_id, user_id, added, "User assigned to bug");
        Ok(added)
    }

    /// Remove `user_id` from `bug_id`; returns whether it was assigned
    pub async fn unassign_user(&self, bug_id: i64, user_id: i64) -> ServiceResult<bool> {
        let mut tx = self.db.begin_write().await?;
        let bug = self.load_pair(&mut tx, bug_id, user_id).await?;

        let removed = assignments::unassign(&mut tx, user_id, bug_id).await?;
        if removed {
            bugs::touch(&mut tx, bug_id, next_timestamp(bug.updated_at)).await?;
        }
        tx.commit().await?;

        info!(bug_id, user_id, removed, "User unassigned from bug");
        Ok(removed)
    }

    /// Users assigned to the bug, by username
    pub async fn assigned_users(&self, bug_id: i64) -> ServiceResult<Vec<User>> {
        let mut tx = self.db.begin().await?;
        if bugs::find_by_id(&mut tx, bug_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Bug not found with id: {bug_id}"
            )));
        }
        let assigned = assignments::users_for_bug(&mut tx, bug_id).await?;
        tx.commit().await?;
        Ok(assigned)
    }

    /// One page of bugs matching a single-field criterion, ordered by id
    pub async fn search_bugs(
        &self,
        criteria: &BugCriteria,
        request: PageRequest,
    ) -> ServiceResult<Page<Bug>> {
        let filter = to_filter(criteria)?;
        debug!(?filter, "Searching bugs");

        let mut tx = self.db.begin().await?;
        let content = bugs::search(&mut tx, &filter, request).await?;
        let total = bugs::count_matching(&mut tx, &filter).await?;
        tx.commit().await?;

        Ok(Page::new(content, request, total))
    }

    async fn load_pair(
        &self,
        conn: &mut sqlx::SqliteConnection,
        bug_id: i64,
        user_id: i64,
    ) -> ServiceResult<Bug> {
        let bug = bugs::find_by_id(&mut *conn, bug_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bug not found with id: {bug_id}")))?;
        if !users::exists(conn, user_id).await? {
            return Err(ServiceError::user_not_found(user_id));
        }
        Ok(bug)
    }
}

fn to_filter(criteria: &BugCriteria) -> ServiceResult<BugFilter> {
    let field = criteria.field;
    if criteria.is_empty() {
        return Err(ServiceError::InvalidCriteria {
            field: field.field_name().to_string(),
            message_key: "search.value.required",
        });
    }

    let value = criteria.value.trim();
    let invalid_value = || ServiceError::InvalidCriteria {
        field: field.field_name().to_string(),
        message_key: "search.value.invalid",
    };

    let filter = match field {
        SearchableBugField::Title | SearchableBugField::Description => {
            let column = if field == SearchableBugField::Title {
                TextColumn::Title
            } else {
                TextColumn::Description
            };
            if criteria.exact_match {
                BugFilter::TextEquals(column, value.to_string())
            } else {
                BugFilter::TextContains(column, value.to_string())
            }
        }
        SearchableBugField::Status => {
            BugFilter::Status(value.parse::<Status>().map_err(|_| invalid_value())?)
        }
        SearchableBugField::Priority => {
            BugFilter::Priority(value.parse::<Priority>().map_err(|_| invalid_value())?)
        }
    };
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_criteria_default_to_contains() {
        let criteria = BugCriteria::new(SearchableBugField::Title, " login ");
        assert_eq!(
            to_filter(&criteria).expect("filter"),
            BugFilter::TextContains(TextColumn::Title, "login".to_string())
        );

        let criteria = criteria.exact();
        assert_eq!(
            to_filter(&criteria).expect("filter"),
            BugFilter::TextEquals(TextColumn::Title, "login".to_string())
        );
    }

    #[test]
    fn test_enum_criteria_parse_names() {
        let criteria = BugCriteria::new(SearchableBugField::Status, "in_progress");
        assert_eq!(
            to_filter(&criteria).expect("filter"),
            BugFilter::Status(Status::InProgress)
        );

        let criteria = BugCriteria::new(SearchableBugField::Priority, "urgent");
        match to_filter(&criteria) {
            Err(ServiceError::InvalidCriteria { field, message_key }) => {
                assert_eq!(field, "priority");
                assert_eq!(message_key, "search.value.invalid");
            }
            other => panic!("expected invalid criteria, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_criteria_rejected() {
        let criteria = BugCriteria::new(SearchableBugField::Description, "   ");
        assert!(matches!(
            to_filter(&criteria),
            Err(ServiceError::InvalidCriteria { message_key: "search.value.required", .. })
        ));
    }
}
