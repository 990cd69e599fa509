//! Demo data for development databases

use tracing::info;

use crate::models::{NewBug, NewUser, Priority, Status};
use crate::services::{BugService, ServiceResult, UserService};

/// Password given to every demo account
pub const DEMO_PASSWORD: &str = "password";

/// Insert two demo users and three bugs, unless any user exists already
///
/// Returns whether anything was inserted.
pub async fn seed_demo_data(users: &UserService, bugs: &BugService) -> ServiceResult<bool> {
    if users.count().await? > 0 {
        info!("Skipping demo data: users already present");
        return Ok(false);
    }

    let admin = users
        .create_user(NewUser {
            username: "jdoe".to_string(),
            password: DEMO_PASSWORD.to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            admin: true,
        })
        .await?;

    let user = users
        .create_user(NewUser {
            username: "asmith".to_string(),
            password: DEMO_PASSWORD.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "asmith@example.com".to_string(),
            admin: false,
        })
        .await?;

    let samples = [
        (
            "Login page unresponsive on mobile",
            "The login button does nothing on small screens.",
            Priority::High,
            Status::Open,
            vec![admin.id],
        ),
        (
            "Dashboard data not refreshing",
            "Widgets keep showing stale numbers until a full page reload.",
            Priority::Medium,
            Status::InProgress,
            vec![user.id],
        ),
        (
            "Incorrect date format in bug details",
            "Dates are shown as MM/DD/YYYY regardless of locale.",
            Priority::Low,
            Status::Open,
            vec![admin.id, user.id],
        ),
    ];

    for (title, description, priority, status, assignee_ids) in samples {
        bugs.create_bug(NewBug {
            title: title.to_string(),
            description: description.to_string(),
            priority,
            status,
            assignee_ids,
        })
        .await?;
    }

    info!("Demo data loaded: 2 users, 3 bugs");
    Ok(true)
}
