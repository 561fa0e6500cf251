//! Integration tests for the closure-table hierarchy.

use http::StatusCode;
use uuid::Uuid;

use orgtime_core::error::ErrorKind;
use orgtime_entity::employee::CreateEmployee;

use crate::helpers::{self, TestApp, unique};

/// Creates a user plus employee record, returning the user id.
async fn employee(app: &TestApp, name: &str) -> Uuid {
    let user_id = app
        .create_test_user(&unique(name), "password123", false)
        .await;
    app.create_test_employee(user_id, name).await;
    user_id
}

/// Builds the three-level chain a -> b -> c and returns the ids.
async fn chain(app: &TestApp) -> (Uuid, Uuid, Uuid) {
    let a = employee(app, "chain_a").await;
    let b = employee(app, "chain_b").await;
    let c = employee(app, "chain_c").await;

    app.state
        .employee_service
        .assign_supervisor(b, a)
        .await
        .expect("assign b under a");
    app.state
        .employee_service
        .assign_supervisor(c, b)
        .await
        .expect("assign c under b");

    (a, b, c)
}

#[tokio::test]
async fn assign_builds_transitive_closure() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (a, b, c) = chain(&app).await;

    let ancestors = app
        .state
        .employee_service
        .get_ancestors(c, false)
        .await
        .unwrap();
    let got: Vec<(Uuid, i32)> = ancestors
        .iter()
        .map(|r| (r.employee.user_id, r.depth))
        .collect();
    assert_eq!(got, vec![(b, 1), (a, 2)]);

    let descendants = app
        .state
        .employee_service
        .get_descendants(a, true)
        .await
        .unwrap();
    let got: Vec<(Uuid, i32)> = descendants
        .iter()
        .map(|r| (r.employee.user_id, r.depth))
        .collect();
    assert_eq!(got, vec![(a, 0), (b, 1), (c, 2)]);
}

#[tokio::test]
async fn assign_rejects_cycle() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (a, _, c) = chain(&app).await;

    // a already sits above c; putting a below c would close a loop.
    let err = app
        .state
        .employee_service
        .assign_supervisor(a, c)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHierarchyState);
}

#[tokio::test]
async fn assign_rejects_self_supervision() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let a = employee(&app, "selfsup").await;

    let err = app
        .state
        .employee_service
        .assign_supervisor(a, a)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHierarchyState);
}

#[tokio::test]
async fn assign_rejects_second_supervisor() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (_, b, _) = chain(&app).await;
    let other = employee(&app, "second_sup").await;

    let err = app
        .state
        .employee_service
        .assign_supervisor(b, other)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHierarchyState);
}

#[tokio::test]
async fn remove_supervisor_severs_exactly_the_crossing_edges() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (a, b, c) = chain(&app).await;

    app.state
        .employee_service
        .remove_supervisor(b)
        .await
        .unwrap();

    // a keeps nothing below it.
    let descendants = app
        .state
        .employee_service
        .get_descendants(a, false)
        .await
        .unwrap();
    assert!(descendants.is_empty());

    // b's subtree is intact: c still reports to b at depth 1.
    let ancestors = app
        .state
        .employee_service
        .get_ancestors(c, false)
        .await
        .unwrap();
    let got: Vec<(Uuid, i32)> = ancestors
        .iter()
        .map(|r| (r.employee.user_id, r.depth))
        .collect();
    assert_eq!(got, vec![(b, 1)]);

    // The supervisor pointer is cleared alongside the edges.
    let employee = app.state.employee_service.get_employee(b).await.unwrap();
    assert_eq!(employee.supervisor_id, None);
}

#[tokio::test]
async fn remove_supervisor_without_supervisor_is_a_noop() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let a = employee(&app, "noop").await;

    app.state
        .employee_service
        .remove_supervisor(a)
        .await
        .expect("detaching a root succeeds");
}

#[tokio::test]
async fn create_employee_guards() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };

    let err = app
        .state
        .employee_service
        .create_employee(&CreateEmployee {
            user_id: Uuid::new_v4(),
            first_name: "Ghost".to_string(),
            last_name: "User".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let a = employee(&app, "dup_emp").await;
    let err = app
        .state
        .employee_service
        .create_employee(&CreateEmployee {
            user_id: a,
            first_name: "Again".to_string(),
            last_name: "Test".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn deleting_a_user_promotes_its_reports() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let (a, b, c) = chain(&app).await;

    let admin = unique("admin");
    app.create_test_user(&admin, "password123", true).await;
    let token = app.login(&admin, "password123").await;

    let response = app
        .request("DELETE", &format!("/api/users/{b}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // c is now a root and a has no subtree left.
    let ancestors = app
        .state
        .employee_service
        .get_ancestors(c, false)
        .await
        .unwrap();
    assert!(ancestors.is_empty());

    let employee = app.state.employee_service.get_employee(c).await.unwrap();
    assert_eq!(employee.supervisor_id, None);

    let descendants = app
        .state
        .employee_service
        .get_descendants(a, false)
        .await
        .unwrap();
    assert!(descendants.is_empty());
}

#[tokio::test]
async fn supervisor_endpoints_require_superuser() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let a = employee(&app, "ep_a").await;
    let b = employee(&app, "ep_b").await;

    let plain = unique("plain");
    app.create_test_user(&plain, "password123", false).await;
    let plain_token = app.login(&plain, "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/employees/{b}/supervisor"),
            Some(serde_json::json!({ "supervisor_id": a })),
            Some(&plain_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let admin = unique("ep_admin");
    app.create_test_user(&admin, "password123", true).await;
    let admin_token = app.login(&admin, "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/employees/{b}/supervisor"),
            Some(serde_json::json!({ "supervisor_id": a })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // Cycle via HTTP maps to 409.
    let response = app
        .request(
            "PUT",
            &format!("/api/employees/{a}/supervisor"),
            Some(serde_json::json!({ "supervisor_id": b })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "GET",
            &format!("/api/employees/{b}/ancestors"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let items = response.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["user_id"], a.to_string());
    assert_eq!(items[0]["depth"], 1);
}
