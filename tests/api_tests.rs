//! End-to-end tests over the HTTP surface: session auth, role guards,
//! and the full visit lifecycle from registration to check-out.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use visitarr::config::Config;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("visitarr-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    // Tests speak plain HTTP; a Secure cookie would never come back.
    config.server.secure_cookies = false;
    config.notifications.enabled = false;

    let state = visitarr::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    visitarr::api::router(state).await
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Log in and return the session cookie to replay on later requests.
async fn login(app: &Router, kind: &str, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "kind": kind, "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

fn visit_payload(host_email: &str) -> Value {
    json!({
        "full_name": "Ada Visitor",
        "email": "ada@example.com",
        "phone": "555-0100",
        "company": "Example Corp",
        "purpose": "Quarterly review",
        "visit_date": "2026-09-01",
        "host_name": "Harriet Host",
        "host_email": host_email
    })
}

async fn register_visit(app: &Router, host_email: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/visitors/register",
            None,
            visit_payload(host_email),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Register a host account and have the seeded admin approve it, then
/// return the logged-in host's session cookie.
async fn approved_host(app: &Router, username: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/host/register",
            None,
            json!({
                "username": username,
                "email": email,
                "full_name": "Harriet Host",
                "department": "Engineering",
                "password": "host-password-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let host_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let admin_cookie = login(app, "admin", "admin", "admin123").await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/admin/hosts/{host_id}/approve"),
            Some(&admin_cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login(app, "host", username, "host-password-1").await
}

#[tokio::test]
async fn health_probes_respond() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/health/live", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/health/ready", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["database"], json!(true));
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let app = spawn_app().await;

    for uri in [
        "/api/auth/me",
        "/api/host/visits",
        "/api/security/visits",
        "/api/admin/users",
        "/api/metrics",
    ] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_unknown_kind() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "kind": "visitor", "username": "admin", "password": "admin123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_without_kind_resolves_staff_and_reports_role() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "username": "security", "password": "security123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["kind"], json!("security"));
    assert_eq!(body["data"]["role"], json!("security"));
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(get("/api/auth/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/logout", Some(&cookie), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/auth/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_guards_enforce_portal_boundaries() {
    let app = spawn_app().await;

    let security_cookie = login(&app, "security", "security", "security123").await;
    let response = app
        .clone()
        .oneshot(get("/api/admin/users", Some(&security_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/api/host/visits", Some(&security_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins may operate the security desk.
    let admin_cookie = login(&app, "admin", "admin", "admin123").await;
    let response = app
        .clone()
        .oneshot(get("/api/security/visits", Some(&admin_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let host_cookie = approved_host(&app, "harriet", "harriet@example.com").await;
    let response = app
        .clone()
        .oneshot(get("/api/security/visits", Some(&host_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn host_login_requires_admin_approval() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/host/register",
            None,
            json!({
                "username": "pending-host",
                "email": "pending@example.com",
                "full_name": "Pending Host",
                "password": "host-password-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "kind": "host", "username": "pending-host", "password": "host-password-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivating_a_host_blocks_login() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/host/register",
            None,
            json!({
                "username": "dora",
                "email": "dora@example.com",
                "full_name": "Dora Host",
                "password": "host-password-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let host_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let admin_cookie = login(&app, "admin", "admin", "admin123").await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/admin/hosts/{host_id}/approve"),
            Some(&admin_cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let host_cookie = login(&app, "host", "dora", "host-password-1").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/hosts/{host_id}/active"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &admin_cookie)
                .body(Body::from(json!({ "is_active": false }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], json!(false));

    let response = app
        .clone()
        .oneshot(get("/api/host/visits", Some(&host_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "kind": "host", "username": "dora", "password": "host-password-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn visitor_registration_validates_input() {
    let app = spawn_app().await;

    let mut payload = visit_payload("host@example.com");
    payload["email"] = json!("not-an-email");
    let response = app
        .clone()
        .oneshot(post_json("/api/visitors/register", None, payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut payload = visit_payload("host@example.com");
    payload["purpose"] = json!("");
    let response = app
        .clone()
        .oneshot(post_json("/api/visitors/register", None, payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn visitor_pass_lookup_is_public() {
    let app = spawn_app().await;
    let visit = register_visit(&app, "host@example.com").await;
    let pass_id = visit["pass_id"].as_str().unwrap();
    assert!(pass_id.starts_with("VIS-"));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/visitors/{pass_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("pending"));

    let response = app
        .clone()
        .oneshot(get("/api/visitors/VIS-DOESNOTEXIST", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_visit_lifecycle() {
    let app = spawn_app().await;
    let host_cookie = approved_host(&app, "harriet", "harriet@example.com").await;
    let visit = register_visit(&app, "harriet@example.com").await;
    let visit_id = visit["id"].as_i64().unwrap();
    let pass_id = visit["pass_id"].as_str().unwrap().to_string();

    // The host sees the pending visit, without codes.
    let response = app
        .clone()
        .oneshot(get("/api/host/visits", Some(&host_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listed = &body["data"][0];
    assert_eq!(listed["id"].as_i64(), Some(visit_id));
    assert_eq!(listed["status"], json!("pending"));
    assert!(listed.get("entry_code").is_none());

    // Approval issues both codes.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/host/visits/{visit_id}/approve"),
            Some(&host_cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("approved"));
    assert_eq!(body["data"]["host_confirmation"], json!("approved"));
    let entry_code = body["data"]["entry_code"].as_str().unwrap().to_string();
    let exit_code = body["data"]["exit_code"].as_str().unwrap().to_string();
    assert_eq!(entry_code.len(), 6);
    assert!(
        entry_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );

    // Approving twice is a conflict.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/host/visits/{visit_id}/approve"),
            Some(&host_cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The visitor sees their codes once approved.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/visitors/{pass_id}"), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["entry_code"].as_str(), Some(entry_code.as_str()));

    let security_cookie = login(&app, "security", "security", "security123").await;

    // A wrong entry code must not consume the transition.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/security/visits/{visit_id}/check-in"),
            Some(&security_cookie),
            json!({ "entry_code": "WRONG1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/security/visits/by-pass/{pass_id}"),
            Some(&security_cookie),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("approved"));

    // Correct code checks the visitor in.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/security/visits/{visit_id}/check-in"),
            Some(&security_cookie),
            json!({ "entry_code": entry_code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("checked-in"));
    let check_in_time = body["data"]["check_in_time"].as_str().unwrap().to_string();

    // Rejecting after check-in is a conflict.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/host/visits/{visit_id}/reject"),
            Some(&host_cookie),
            json!({ "reason": "changed my mind" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The entry code does not work as an exit code.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/security/visits/{visit_id}/check-out"),
            Some(&security_cookie),
            json!({ "exit_code": entry_code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/security/visits/{visit_id}/check-out"),
            Some(&security_cookie),
            json!({ "exit_code": exit_code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("checked-out"));
    let check_out_time = body["data"]["check_out_time"].as_str().unwrap();
    let entered = chrono::DateTime::parse_from_rfc3339(&check_in_time).unwrap();
    let exited = chrono::DateTime::parse_from_rfc3339(check_out_time).unwrap();
    assert!(exited > entered);

    // Checked-out is terminal.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/security/visits/{visit_id}/check-in"),
            Some(&security_cookie),
            json!({ "entry_code": entry_code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn host_cannot_act_on_another_hosts_visit() {
    let app = spawn_app().await;
    let host_cookie = approved_host(&app, "harriet", "harriet@example.com").await;
    let visit = register_visit(&app, "someone-else@example.com").await;
    let visit_id = visit["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/host/visits/{visit_id}/approve"),
            Some(&host_cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // And the visit never shows up in their listing.
    let response = app
        .clone()
        .oneshot(get("/api/host/visits", Some(&host_cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn host_reject_records_reason() {
    let app = spawn_app().await;
    let host_cookie = approved_host(&app, "harriet", "harriet@example.com").await;
    let visit = register_visit(&app, "harriet@example.com").await;
    let visit_id = visit["id"].as_i64().unwrap();

    // A reason is mandatory; a reject without one changes nothing.
    for body in [json!({}), json!({ "reason": "" }), json!({ "reason": "   " })] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/host/visits/{visit_id}/reject"),
                Some(&host_cookie),
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/visitors/{}", visit["pass_id"].as_str().unwrap()), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("pending"));

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/host/visits/{visit_id}/reject"),
            Some(&host_cookie),
            json!({ "reason": "No meeting scheduled" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("rejected"));
    assert_eq!(
        body["data"]["host_confirmation_reason"],
        json!("No meeting scheduled")
    );

    // Rejected is terminal.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/host/visits/{visit_id}/reject"),
            Some(&host_cookie),
            json!({ "reason": "still no" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_reject_overrides_host_ownership() {
    let app = spawn_app().await;
    let visit = register_visit(&app, "nobody@example.com").await;
    let visit_id = visit["id"].as_i64().unwrap();

    let admin_cookie = login(&app, "admin", "admin", "admin123").await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/admin/visits/{visit_id}/reject"),
            Some(&admin_cookie),
            json!({ "reason": "Site closed" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("rejected"));
}

#[tokio::test]
async fn admin_manages_staff_accounts() {
    let app = spawn_app().await;
    let admin_cookie = login(&app, "admin", "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/users",
            Some(&admin_cookie),
            json!({
                "username": "frontdesk",
                "email": "frontdesk@example.com",
                "full_name": "Front Desk",
                "role": "security",
                "password": "desk-password-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let user_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["role"], json!("security"));

    // Username conflict.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/users",
            Some(&admin_cookie),
            json!({
                "username": "frontdesk",
                "email": "other@example.com",
                "full_name": "Other",
                "role": "security",
                "password": "desk-password-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let cookie = login(&app, "security", "frontdesk", "desk-password-1").await;
    let response = app
        .clone()
        .oneshot(get("/api/auth/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Deactivation locks the account out, even with a live session.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/users/{user_id}/active"))
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &admin_cookie)
                .body(Body::from(json!({ "is_active": false }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/auth/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            json!({ "username": "frontdesk", "password": "desk-password-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = spawn_app().await;
    let cookie = login(&app, "security", "security", "security123").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(
                    json!({ "current_password": "wrong", "new_password": "new-password-1" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(
                    json!({ "current_password": "security123", "new_password": "new-password-1" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login(&app, "security", "security", "new-password-1").await;
}

#[tokio::test]
async fn admin_lists_notifications() {
    let app = spawn_app().await;
    let admin_cookie = login(&app, "admin", "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(get("/api/admin/notifications", Some(&admin_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"].is_array());
}
