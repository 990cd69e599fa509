//! User directory behaviour against a migrated in-memory database

mod support;

use common::pagination::PageRequest;
use tracker::error::ServiceError;
use tracker::models::{ProfileUpdate, UpdateUser};

fn update_from(user: &tracker::models::User) -> UpdateUser {
    UpdateUser {
        id: user.id,
        username: user.username.clone(),
        password: None,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        admin: user.admin,
    }
}

#[tokio::test]
async fn test_create_user_hashes_password() {
    let state = support::state().await;

    let created = state
        .users
        .create_user(support::new_user("jdoe", true))
        .await
        .expect("create user");

    assert!(created.id > 0);
    assert_eq!(created.created_at, created.updated_at);
    assert_ne!(created.password_hash, support::PASSWORD);
    assert!(support::encoder().matches(support::PASSWORD, &created.password_hash));

    let found = state
        .users
        .find_by_username("jdoe")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(found, created);
    assert!(state.users.find_by_username("JDOE").await.expect("lookup").is_none());
}

#[tokio::test]
async fn test_duplicate_username_and_email_are_rejected() {
    let state = support::state().await;
    state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create user");

    let mut same_name = support::new_user("jdoe", false);
    same_name.email = "other@example.com".to_string();
    match state.users.create_user(same_name).await {
        Err(ServiceError::AlreadyExists { field, message }) => {
            assert_eq!(field, "username");
            assert_eq!(message, "Username 'jdoe' already exists.");
        }
        other => panic!("expected username conflict, got {other:?}"),
    }

    let mut same_email = support::new_user("johnny", false);
    same_email.email = "jdoe@example.com".to_string();
    assert!(matches!(
        state.users.create_user(same_email).await,
        Err(ServiceError::AlreadyExists { field: "email", .. })
    ));

    assert_eq!(state.users.count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_register_never_grants_admin() {
    let state = support::state().await;

    let user = state
        .users
        .register_user(support::new_user("mallory", true))
        .await
        .expect("register");

    assert!(!user.admin);
}

#[tokio::test]
async fn test_update_keeping_own_username_and_email() {
    let state = support::state().await;
    let user = state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create user");

    let mut update = update_from(&user);
    update.first_name = "Johnathan".to_string();
    update.admin = true;
    let updated = state.users.update_user(update).await.expect("update");

    assert_eq!(updated.first_name, "Johnathan");
    assert!(updated.admin);
    assert_eq!(updated.created_at, user.created_at);
    assert!(updated.updated_at > user.updated_at);
    assert_eq!(updated.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_update_replaces_password_only_when_supplied() {
    let state = support::state().await;
    let user = state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create user");

    let mut update = update_from(&user);
    update.password = Some("   ".to_string());
    let unchanged = state.users.update_user(update.clone()).await.expect("update");
    assert_eq!(unchanged.password_hash, user.password_hash);

    update.password = Some("n3w-secret".to_string());
    let changed = state.users.update_user(update).await.expect("update");
    assert_ne!(changed.password_hash, user.password_hash);
    assert!(support::encoder().matches("n3w-secret", &changed.password_hash));
}

#[tokio::test]
async fn test_update_rejects_another_users_identity() {
    let state = support::state().await;
    let jdoe = state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create jdoe");
    state
        .users
        .create_user(support::new_user("asmith", false))
        .await
        .expect("create asmith");

    let mut update = update_from(&jdoe);
    update.username = "asmith".to_string();
    assert!(matches!(
        state.users.update_user(update).await,
        Err(ServiceError::AlreadyExists { field: "username", .. })
    ));

    let mut update = update_from(&jdoe);
    update.email = "asmith@example.com".to_string();
    assert!(matches!(
        state.users.update_user(update).await,
        Err(ServiceError::AlreadyExists { field: "email", .. })
    ));

    let stored = state.users.get_user(jdoe.id).await.expect("reload");
    assert_eq!(stored, jdoe);
}

#[tokio::test]
async fn test_update_missing_user() {
    let state = support::state().await;

    let update = UpdateUser {
        id: 99,
        username: "ghost".to_string(),
        email: "ghost@example.com".to_string(),
        ..UpdateUser::default()
    };
    match state.users.update_user(update).await {
        Err(ServiceError::NotFound(message)) => assert_eq!(message, "User not found with ID: 99"),
        other => panic!("expected not found, got {other:?}"),
    }
    assert_eq!(state.users.count().await.expect("count"), 0);
}

#[tokio::test]
async fn test_update_profile() {
    let state = support::state().await;
    let user = state
        .users
        .create_user(support::new_user("jdoe", true))
        .await
        .expect("create jdoe");
    state
        .users
        .create_user(support::new_user("asmith", false))
        .await
        .expect("create asmith");

    let taken = ProfileUpdate {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "asmith@example.com".to_string(),
        password: None,
    };
    assert!(matches!(
        state.users.update_profile("jdoe", taken).await,
        Err(ServiceError::AlreadyExists { field: "email", .. })
    ));

    let profile = ProfileUpdate {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        password: Some("longer-secret".to_string()),
    };
    let updated = state
        .users
        .update_profile("jdoe", profile)
        .await
        .expect("update profile");

    assert_eq!(updated.full_name(), "John Doe");
    assert_eq!(updated.email, "john.doe@example.com");
    assert_eq!(updated.username, user.username);
    assert!(updated.admin);
    assert!(support::encoder().matches("longer-secret", &updated.password_hash));

    assert!(matches!(
        state.users.update_profile("nobody", ProfileUpdate::default()).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_user() {
    let state = support::state().await;
    let user = state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create user");

    state.users.delete_user(user.id).await.expect("delete");
    assert!(state.users.find_by_id(user.id).await.expect("lookup").is_none());

    assert!(matches!(
        state.users.delete_user(user.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_user_detaches_assigned_bugs() {
    let state = support::state().await;
    let jdoe = state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create jdoe");
    let asmith = state
        .users
        .create_user(support::new_user("asmith", false))
        .await
        .expect("create asmith");
    let bug = state
        .bugs
        .create_bug(support::new_bug("Crash on save", vec![jdoe.id, asmith.id]))
        .await
        .expect("create bug");

    state.users.delete_user(jdoe.id).await.expect("delete");

    let assigned = state.bugs.assigned_users(bug.id).await.expect("assigned");
    assert_eq!(assigned, vec![asmith]);
    assert_eq!(state.bugs.count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_list_users_sorted_and_paged() {
    let state = support::state().await;
    for username in ["carol", "alice", "bob"] {
        state
            .users
            .create_user(support::new_user(username, false))
            .await
            .expect("create user");
    }

    let first = state
        .users
        .list_users(PageRequest::new(0, 2), None)
        .await
        .expect("first page");
    let names: Vec<_> = first.content.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages(), 2);
    assert!(first.has_next());

    let second = state
        .users
        .list_users(PageRequest::new(1, 2), Some("username,asc"))
        .await
        .expect("second page");
    assert_eq!(second.content.len(), 1);
    assert_eq!(second.content[0].username, "carol");

    let descending = state
        .users
        .list_users(PageRequest::new(0, 10), Some("email,desc"))
        .await
        .expect("by email");
    let names: Vec<_> = descending.content.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "bob", "alice"]);

    assert!(matches!(
        state.users.list_users(PageRequest::new(0, 10), Some("password_hash")).await,
        Err(ServiceError::InvalidCriteria { message_key: "error.sort.invalid", .. })
    ));
}

#[tokio::test]
async fn test_assigned_bugs_for_user() {
    let state = support::state().await;
    let jdoe = state
        .users
        .create_user(support::new_user("jdoe", false))
        .await
        .expect("create jdoe");
    let first = state
        .bugs
        .create_bug(support::new_bug("First", vec![jdoe.id]))
        .await
        .expect("first bug");
    state
        .bugs
        .create_bug(support::new_bug("Unassigned", vec![]))
        .await
        .expect("second bug");

    let bugs = state.users.assigned_bugs(jdoe.id).await.expect("assigned");
    assert_eq!(bugs, vec![first]);
    assert!(matches!(
        state.users.assigned_bugs(404).await,
        Err(ServiceError::NotFound(_))
    ));
}
