//! Integration tests for the authentication flow.

use http::StatusCode;

use crate::helpers::{self, unique};

#[tokio::test]
async fn register_and_login() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("register");

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": username,
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["data"]["tokens"]["access_token"].is_string());
    assert!(response.body["data"]["tokens"]["refresh_token"].is_string());
    assert_eq!(response.body["data"]["user"]["username"], username.as_str());

    let token = app.login(&username, "password123").await;
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], username.as_str());
}

#[tokio::test]
async fn register_duplicate_username_conflicts() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("dup");
    app.create_test_user(&username, "password123", false).await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": username,
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": unique("shortpw"),
                "password": "short",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("wrongpw");
    app.create_test_user(&username, "password123", false).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": username,
                "password": "not-the-password",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_unknown_user_matches_wrong_password() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("known");
    app.create_test_user(&username, "password123", false).await;

    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": unique("ghost"),
                "password": "password123",
            })),
            None,
        )
        .await;
    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": username,
                "password": "not-the-password",
            })),
            None,
        )
        .await;

    // Credential failures must be indistinguishable.
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["message"], wrong.body["message"]);
}

#[tokio::test]
async fn refresh_yields_new_access_token() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("refresh");
    app.create_test_user(&username, "password123", false).await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": username,
                "password": "password123",
            })),
            None,
        )
        .await;
    let refresh_token = login.body["data"]["tokens"]["refresh_token"]
        .as_str()
        .expect("No refresh token")
        .to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.body["data"]["access_token"]
        .as_str()
        .expect("No access token");

    let me = app.request("GET", "/api/auth/me", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("kindmix");
    app.create_test_user(&username, "password123", false).await;
    let access_token = app.login(&username, "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": access_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "WRONG_TOKEN_KIND");
}

#[tokio::test]
async fn access_token_rejected_as_garbage() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_all_tokens() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("logout");
    app.create_test_user(&username, "password123", false).await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": username,
                "password": "password123",
            })),
            None,
        )
        .await;
    let access = login.body["data"]["tokens"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    let refresh = login.body["data"]["tokens"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // Both the access token and the refresh token are now dead.
    let me = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.body["error"], "SESSION_REVOKED");

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_rotates_session_key() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("passwd");
    app.create_test_user(&username, "password123", false).await;
    let token = app.login(&username, "password123").await;

    let wrong_current = app
        .request(
            "PUT",
            "/api/auth/password",
            Some(serde_json::json!({
                "current_password": "not-the-password",
                "new_password": "newpassword456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong_current.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "PUT",
            "/api/auth/password",
            Some(serde_json::json!({
                "current_password": "password123",
                "new_password": "newpassword456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // The old token died with the session key.
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    // Only the new password logs in.
    let old_login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": username,
                "password": "password123",
            })),
            None,
        )
        .await;
    assert_eq!(old_login.status, StatusCode::UNAUTHORIZED);

    let _ = app.login(&username, "newpassword456").await;
}

#[tokio::test]
async fn password_change_rejects_same_password() {
    let Some(app) = helpers::TestApp::new().await else {
        return;
    };
    let username = unique("samepw");
    app.create_test_user(&username, "password123", false).await;
    let token = app.login(&username, "password123").await;

    let response = app
        .request(
            "PUT",
            "/api/auth/password",
            Some(serde_json::json!({
                "current_password": "password123",
                "new_password": "password123",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
