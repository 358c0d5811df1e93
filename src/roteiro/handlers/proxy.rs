//! Pass-through proxy to the authentication backend. Bodies and statuses
//! are forwarded verbatim in both directions; an unreachable backend
//! degrades to a soft JSON failure so the page can render it.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::roteiro::AppState;

#[instrument(skip_all)]
pub async fn proxy_login(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> impl IntoResponse {
    forward(&state, "/login", payload).await
}

#[instrument(skip_all)]
pub async fn proxy_forgot_password(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> impl IntoResponse {
    forward(&state, "/forgot-password", payload).await
}

async fn forward(
    state: &AppState,
    path: &str,
    payload: Option<Json<Value>>,
) -> (StatusCode, Json<Value>) {
    let body = payload.map_or_else(|| json!({}), |Json(value)| value);
    let url = format!("{}{path}", state.api_url);

    match state.client.post(&url).json(&body).send().await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status().as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            match response.json::<Value>().await {
                Ok(value) => (status, Json(value)),
                Err(err) => {
                    error!("invalid response from the authentication API: {err}");
                    unreachable_response()
                }
            }
        }
        Err(err) => {
            error!("error reaching the authentication API: {err}");
            unreachable_response()
        }
    }
}

fn unreachable_response() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "message": "Could not reach the authentication API"
        })),
    )
}
