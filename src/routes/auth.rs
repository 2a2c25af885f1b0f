//! Auth route: login gate over the configured credentials.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::services::auth::{self as auth_svc, AuthOutcome};
use crate::state::AppState;

pub const MSG_SERVER_ERROR: &str = "服务器错误";

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// `POST /api/auth`: check `{username, password}` against the gate.
///
/// 200 on match, 400 for missing fields, 401 on mismatch, 500 when the body
/// is not JSON.
pub async fn login(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<AuthResponse>) {
    let parsed: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "auth: request body is not JSON");
            let failure = AuthResponse { success: false, message: MSG_SERVER_ERROR, user: None };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(failure));
        }
    };

    let outcome = auth_svc::check_submission(&state.config.auth, parsed.get("username"), parsed.get("password"));

    let status = outcome_status(&outcome);
    let success = outcome.is_accepted();
    let message = outcome.message();
    let user = match outcome {
        AuthOutcome::Accepted { user } => Some(user),
        AuthOutcome::MissingFields | AuthOutcome::Rejected => None,
    };

    (status, Json(AuthResponse { success, message, user }))
}

pub(crate) fn outcome_status(outcome: &AuthOutcome) -> StatusCode {
    match outcome {
        AuthOutcome::Accepted { .. } => StatusCode::OK,
        AuthOutcome::MissingFields => StatusCode::BAD_REQUEST,
        AuthOutcome::Rejected => StatusCode::UNAUTHORIZED,
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
