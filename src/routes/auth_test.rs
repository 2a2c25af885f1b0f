use super::*;
use crate::config::{AppConfig, AuthConfig};
use crate::state::test_helpers;

async fn post(state: AppState, body: &str) -> (StatusCode, AuthResponse) {
    let (status, Json(resp)) = login(State(state), Bytes::from(body.to_owned())).await;
    (status, resp)
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn default_credentials_succeed() {
    let (status, resp) = post(test_helpers::test_app_state(), r#"{"username":"admin","password":"admin123"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp.success);
    assert_eq!(resp.message, "认证成功");
    assert_eq!(resp.user.as_deref(), Some("admin"));
}

#[tokio::test]
async fn configured_credentials_replace_defaults() {
    let config = AppConfig {
        auth: AuthConfig { username: "alice".into(), password: "wonderland".into() },
        ..test_helpers::test_config()
    };
    let state = AppState::new(config, None);

    let (status, _) = post(state.clone(), r#"{"username":"alice","password":"wonderland"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = post(state, r#"{"username":"admin","password":"admin123"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!resp.success);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (status, resp) = post(test_helpers::test_app_state(), r#"{"username":"admin","password":"nope"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!resp.success);
    assert_eq!(resp.message, "用户名或密码错误");
    assert!(resp.user.is_none());
}

#[tokio::test]
async fn missing_fields_are_bad_request() {
    for body in [
        r"{}",
        r#"{"username":"admin"}"#,
        r#"{"username":"","password":"admin123"}"#,
        r#"{"username":"admin","password":null}"#,
    ] {
        let (status, resp) = post(test_helpers::test_app_state(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp.message, "用户名和密码不能为空");
    }
}

#[tokio::test]
async fn non_string_credentials_are_unauthorized() {
    let (status, resp) = post(test_helpers::test_app_state(), r#"{"username":123,"password":"admin123"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.message, "用户名或密码错误");

    let (status, _) = post(test_helpers::test_app_state(), r#"{"username":"admin","password":0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_server_error() {
    let (status, resp) = post(test_helpers::test_app_state(), "username=admin").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!resp.success);
    assert_eq!(resp.message, MSG_SERVER_ERROR);
}

#[test]
fn failure_response_omits_user() {
    let resp = AuthResponse { success: false, message: "用户名或密码错误", user: None };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json, serde_json::json!({ "success": false, "message": "用户名或密码错误" }));
}

#[test]
fn outcome_status_mapping() {
    assert_eq!(outcome_status(&AuthOutcome::Accepted { user: "a".into() }), StatusCode::OK);
    assert_eq!(outcome_status(&AuthOutcome::MissingFields), StatusCode::BAD_REQUEST);
    assert_eq!(outcome_status(&AuthOutcome::Rejected), StatusCode::UNAUTHORIZED);
}
