mod common;

use common::TestApp;
use common::ADMIN_EMAIL;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

const ALICE_EMAIL: &str = "alice@x.edu";
const ALICE_PASSWORD: &str = "pw123456";

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = TestApp::spawn().await;

    // Register
    let response = app
        .post("/auth/register")
        .json(&json!({
            "email": ALICE_EMAIL,
            "password": ALICE_PASSWORD,
            "passwordConfirm": ALICE_PASSWORD,
            "firstName": "Alice",
            "lastName": "Liddell"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["email"], ALICE_EMAIL);
    assert_eq!(body["user"]["role"], "student");
    assert_eq!(body["user"]["verified"], false);
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    let alice_id = body["user"]["id"].as_i64().unwrap();

    // Login before verification
    let response = app
        .post("/auth/login")
        .json(&json!({ "email": ALICE_EMAIL, "password": ALICE_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Account not verified");

    // Administrator verifies alice
    let admin_token = app.admin_token().await;
    let response = app
        .patch_authenticated(&format!("/admin/users/{}/verify", alice_id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["verified"], true);

    // Login sets the session cookie
    let response = app
        .post("/auth/login")
        .json(&json!({ "email": ALICE_EMAIL, "password": ALICE_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("Login sets a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["id"], alice_id);
    assert_eq!(body["user"]["role"], "student");
    let token = body["token"].as_str().unwrap().to_string();

    // Cookie authenticates /auth/me
    let response = app
        .get("/auth/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["id"], alice_id);

    // Logout clears the cookie, twice in a row
    for _ in 0..2 {
        let response = app
            .post("/auth/logout")
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get(SET_COOKIE)
            .expect("Logout clears the cookie")
            .to_str()
            .unwrap()
            .to_string();
        assert!(cleared.starts_with("token=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    let response = app
        .get("/auth/me")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Tokens are not revoked server-side: replaying the old cookie still works
    let response = app
        .plain_client
        .get(app.url("/auth/me"))
        .header(COOKIE, format!("token={}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["id"], alice_id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register_verified(ALICE_EMAIL, ALICE_PASSWORD).await;

    let unknown = app
        .post("/auth/login")
        .json(&json!({ "email": "nobody@x.edu", "password": ALICE_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");
    let wrong = app
        .post("/auth/login")
        .json(&json!({ "email": ALICE_EMAIL, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert!(unknown.headers().get(SET_COOKIE).is_none());
    assert!(wrong.headers().get(SET_COOKIE).is_none());

    let unknown_body = unknown.bytes().await.unwrap();
    let wrong_body = wrong.bytes().await.unwrap();
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn test_unverified_account_with_wrong_password() {
    let app = TestApp::spawn().await;
    app.register(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .post("/auth/login")
        .json(&json!({ "email": ALICE_EMAIL, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::spawn().await;
    app.register_verified(ALICE_EMAIL, ALICE_PASSWORD).await;

    let token = app.login_token("  Alice@X.EDU ", ALICE_PASSWORD).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({
            "email": ALICE_EMAIL,
            "password": ALICE_PASSWORD,
            "passwordConfirm": "pw654321",
            "firstName": "Alice",
            "lastName": "Liddell"
        }),
        json!({
            "email": ALICE_EMAIL,
            "password": "pw1",
            "passwordConfirm": "pw1",
            "firstName": "Alice",
            "lastName": "Liddell"
        }),
        json!({
            "email": "not-an-email",
            "password": ALICE_PASSWORD,
            "passwordConfirm": ALICE_PASSWORD,
            "firstName": "Alice",
            "lastName": "Liddell"
        }),
        json!({
            "email": ALICE_EMAIL,
            "password": ALICE_PASSWORD,
            "passwordConfirm": ALICE_PASSWORD,
            "firstName": "Alice",
            "lastName": "Liddell",
            "role": "superuser"
        }),
        json!({
            "email": ALICE_EMAIL,
            "password": ALICE_PASSWORD,
            "firstName": "Alice",
            "lastName": "Liddell"
        }),
        json!({
            "email": ALICE_EMAIL,
            "password": 123456,
            "passwordConfirm": "123456",
            "firstName": "Alice",
            "lastName": "Liddell"
        }),
    ];

    for case in cases {
        let response = app
            .post("/auth/register")
            .json(&case)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_login_body_is_bad_request() {
    let app = TestApp::spawn().await;

    let missing_password = app
        .post("/auth/login")
        .json(&json!({ "email": ALICE_EMAIL }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(missing_password.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing_password
        .json()
        .await
        .expect("Failed to parse response");
    assert!(body["message"].is_string());

    let not_json = app
        .post("/auth/login")
        .body("email=alice@x.edu&password=pw123456")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    let body: Value = not_json.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "email": "ALICE@x.edu",
            "password": "another-pass",
            "passwordConfirm": "another-pass",
            "firstName": "Alice",
            "lastName": "Again"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_concurrent_registration_race() {
    let app = TestApp::spawn().await;

    let register = || {
        app.post("/auth/register")
            .json(&json!({
                "email": ALICE_EMAIL,
                "password": ALICE_PASSWORD,
                "passwordConfirm": ALICE_PASSWORD,
                "firstName": "Alice",
                "lastName": "Liddell"
            }))
            .send()
    };

    let (first, second) = tokio::join!(register(), register());
    let mut statuses = vec![
        first.expect("Failed to execute request").status(),
        second.expect("Failed to execute request").status(),
    ];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let admin_token = app.admin_token().await;
    let body: Value = app
        .get_authenticated("/admin/users", &admin_token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let alices = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["email"] == ALICE_EMAIL)
        .count();
    assert_eq!(alices, 1);
}

#[tokio::test]
async fn test_bearer_header_fallback() {
    let app = TestApp::spawn().await;
    let alice_id = app.register_verified(ALICE_EMAIL, ALICE_PASSWORD).await;
    let token = app.login_token(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["id"], alice_id);
    assert_eq!(body["user"]["email"], ALICE_EMAIL);
}

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let app = TestApp::spawn().await;

    let missing = app
        .get("/auth/me")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let body: Value = missing.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Authentication required");

    let invalid = app
        .get_authenticated("/auth/me", "definitely.not.valid")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
    let body: Value = invalid.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Authentication failed");
}

#[tokio::test]
async fn test_student_cannot_reach_admin_routes() {
    let app = TestApp::spawn().await;
    app.register_verified(ALICE_EMAIL, ALICE_PASSWORD).await;
    let token = app.login_token(ALICE_EMAIL, ALICE_PASSWORD).await;

    let response = app
        .get_authenticated("/admin/users", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Insufficient permissions");
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let app = TestApp::spawn().await;
    let alice_id = app.register_verified(ALICE_EMAIL, ALICE_PASSWORD).await;
    let token = app.login_token(ALICE_EMAIL, ALICE_PASSWORD).await;
    let admin_token = app.admin_token().await;

    let response = app
        .delete_authenticated(&format!("/admin/users/{}", alice_id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Authentication failed");

    let response = app
        .delete_authenticated(&format!("/admin/users/{}", alice_id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_unverified_mid_session_is_rejected() {
    let app = TestApp::spawn().await;
    let admin_token = app.admin_token().await;

    let response = app
        .post_authenticated("/admin/users", &admin_token)
        .json(&json!({
            "email": "deputy@x.edu",
            "password": "deputyPass1",
            "firstName": "Deputy",
            "lastName": "Admin",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["verified"], true);
    assert_eq!(body["user"]["role"], "admin");
    let deputy_id = body["user"]["id"].as_i64().unwrap();

    // Admin-created accounts can log in immediately
    let deputy_token = app.login_token("deputy@x.edu", "deputyPass1").await;
    let response = app
        .get_authenticated("/admin/users", &deputy_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .patch_authenticated(&format!("/admin/users/{}", deputy_id), &admin_token)
        .json(&json!({ "verified": false }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get_authenticated("/admin/users", &deputy_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Account not verified");
}

#[tokio::test]
async fn test_admin_user_management_errors() {
    let app = TestApp::spawn().await;
    let admin_token = app.admin_token().await;

    let response = app
        .patch_authenticated("/admin/users/999", &admin_token)
        .json(&json!({ "firstName": "Nobody" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .patch_authenticated("/admin/users/abc/verify", &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_authenticated("/admin/users", &admin_token)
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "whatever1",
            "firstName": "Second",
            "lastName": "Admin"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_update_changes_role_and_password() {
    let app = TestApp::spawn().await;
    let alice_id = app.register_verified(ALICE_EMAIL, ALICE_PASSWORD).await;
    let admin_token = app.admin_token().await;

    let response = app
        .patch_authenticated(&format!("/admin/users/{}", alice_id), &admin_token)
        .json(&json!({ "role": "public", "password": "brand-new-pass" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["role"], "public");

    let response = app
        .post("/auth/login")
        .json(&json!({ "email": ALICE_EMAIL, "password": ALICE_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login_token(ALICE_EMAIL, "brand-new-pass").await;
    let body: Value = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["user"]["role"], "public");
}
