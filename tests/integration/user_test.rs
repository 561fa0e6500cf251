//! Integration tests for user visibility and write authorization.

use http::StatusCode;
use uuid::Uuid;

use crate::helpers::{self, TestApp, unique};

struct Member {
    id: Uuid,
    username: String,
}

/// Creates a user with an employee record.
async fn member(app: &TestApp, prefix: &str) -> Member {
    let username = unique(prefix);
    let id = app.create_test_user(&username, "password123", false).await;
    app.create_test_employee(id, prefix).await;
    Member { id, username }
}

/// Builds the chain mgr -> mid -> ic.
async fn team(app: &TestApp) -> (Member, Member, Member) {
    let mgr = member(app, "mgr").await;
    let mid = member(app, "mid").await;
    let ic = member(app, "ic").await;

    app.state
        .employee_service
        .assign_supervisor(mid.id, mgr.id)
        .await
        .unwrap();
    app.state
        .employee_service
        .assign_supervisor(ic.id, mid.id)
        .await
        .unwrap();

    (mgr, mid, ic)
}

fn usernames(body: &serde_json::Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["username"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn superuser_sees_every_user() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let alpha = unique("vis_alpha");
    let beta = unique("vis_beta");
    app.create_test_user(&alpha, "password123", false).await;
    app.create_test_user(&beta, "password123", false).await;

    let admin = unique("vis_admin");
    app.create_test_user(&admin, "password123", true).await;
    let token = app.login(&admin, "password123").await;

    let response = app
        .request("GET", "/api/users?per_page=100", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let names = usernames(&response.body);
    assert!(names.contains(&alpha));
    assert!(names.contains(&beta));
    assert!(names.contains(&admin));
}

#[tokio::test]
async fn employee_sees_exactly_its_subtree() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (mgr, mid, ic) = team(&app).await;
    let outsider = member(&app, "outsider").await;

    let token = app.login(&mgr.username, "password123").await;
    let response = app
        .request("GET", "/api/users?per_page=100", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(response.body["data"]["total"], 3);
    let names = usernames(&response.body);
    assert_eq!(
        names,
        vec![
            mgr.username.clone(),
            mid.username.clone(),
            ic.username.clone()
        ]
    );
    assert!(!names.contains(&outsider.username));
}

#[tokio::test]
async fn user_without_employee_sees_only_itself() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("lonely");
    app.create_test_user(&username, "password123", false).await;
    let token = app.login(&username, "password123").await;

    let response = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);
    assert_eq!(usernames(&response.body), vec![username]);
}

#[tokio::test]
async fn read_follows_the_hierarchy_downward_only() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (mgr, _, ic) = team(&app).await;

    // Supervisor reads a transitive subordinate.
    let mgr_token = app.login(&mgr.username, "password123").await;
    let response = app
        .request("GET", &format!("/api/users/{}", ic.id), None, Some(&mgr_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], ic.username.as_str());

    // The subordinate cannot look back up.
    let ic_token = app.login(&ic.username, "password123").await;
    let response = app
        .request("GET", &format!("/api/users/{}", mgr.id), None, Some(&ic_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Reading yourself always works.
    let response = app
        .request("GET", &format!("/api/users/{}", ic.id), None, Some(&ic_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn peers_cannot_read_each_other() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let left = member(&app, "peer_l").await;
    let right = member(&app, "peer_r").await;

    let token = app.login(&left.username, "password123").await;
    let response = app
        .request(
            "GET",
            &format!("/api/users/{}", right.id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_superusers_delete_accounts() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let target = unique("del_target");
    let target_id = app.create_test_user(&target, "password123", false).await;

    let plain = unique("del_plain");
    app.create_test_user(&plain, "password123", false).await;
    let token = app.login(&plain, "password123").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{target_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let admin = unique("del_admin");
    app.create_test_user(&admin, "password123", true).await;
    let admin_token = app.login(&admin, "password123").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{target_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &format!("/api/users/{target_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let admin = unique("nf_admin");
    app.create_test_user(&admin, "password123", true).await;
    let token = app.login(&admin, "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/users/{}", Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
