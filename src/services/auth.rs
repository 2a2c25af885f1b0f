//! Login gate: exact comparison of submitted credentials against the
//! configured secrets. No hashing, no lockout, no persistence.

use serde_json::Value;
use tracing::info;

use crate::config::AuthConfig;

pub const MSG_ACCEPTED: &str = "认证成功";
pub const MSG_MISSING_FIELDS: &str = "用户名和密码不能为空";
pub const MSG_REJECTED: &str = "用户名或密码错误";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Accepted { user: String },
    MissingFields,
    Rejected,
}

impl AuthOutcome {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => MSG_ACCEPTED,
            Self::MissingFields => MSG_MISSING_FIELDS,
            Self::Rejected => MSG_REJECTED,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Check a submitted username/password pair. Absent or empty values never
/// reach the comparison.
#[must_use]
pub fn check_credentials(config: &AuthConfig, username: Option<&str>, password: Option<&str>) -> AuthOutcome {
    let (Some(username), Some(password)) = (username.filter(|u| !u.is_empty()), password.filter(|p| !p.is_empty()))
    else {
        return AuthOutcome::MissingFields;
    };

    if username == config.username && password == config.password {
        info!(%username, "auth: login accepted");
        AuthOutcome::Accepted { user: username.to_owned() }
    } else {
        info!(%username, "auth: login rejected");
        AuthOutcome::Rejected
    }
}

/// Check credentials as submitted in a JSON body.
///
/// `null`, `false`, `0` and `""` count as missing. Any other non-string value
/// is present but can never equal a configured secret, so it is rejected.
#[must_use]
pub fn check_submission(config: &AuthConfig, username: Option<&Value>, password: Option<&Value>) -> AuthOutcome {
    let (username, password) = (username.filter(|v| is_truthy(v)), password.filter(|v| is_truthy(v)));
    match (username, password) {
        (Some(Value::String(u)), Some(Value::String(p))) => check_credentials(config, Some(u), Some(p)),
        (Some(u), Some(_)) => {
            info!(username = %u, "auth: login rejected, non-string credential");
            AuthOutcome::Rejected
        }
        _ => AuthOutcome::MissingFields,
    }
}

#[allow(clippy::float_cmp)]
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
