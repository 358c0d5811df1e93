//! Result and wire types for the authentication client. Results pass the
//! backend's fields through untouched; the UI layer decides how to render
//! them.

use serde::Deserialize;
use serde_json::Value;

/// Outcome of a login attempt. `attempts_left` is only present when the
/// backend counts failed attempts towards a lockout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginResult {
    pub success: bool,
    pub message: String,
    pub user: Option<Value>,
    pub attempts_left: Option<i64>,
    pub token: Option<String>,
}

/// Outcome of a password recovery request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecoveryResult {
    pub success: bool,
    pub message: String,
}

/// Snapshot of the locally authenticated user.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub username: String,
    pub is_admin: bool,
    pub info: Value,
}

/// Result of validating the stored token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenValidation {
    pub valid: bool,
    pub message: Option<String>,
    pub user: Option<CurrentUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default, rename = "attemptsLeft")]
    pub attempts_left: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecoveryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
