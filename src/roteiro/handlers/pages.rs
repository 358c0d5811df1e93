use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tracing::error;

use crate::roteiro::AppState;

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    page(&state, "index.html").await
}

pub async fn admin(State(state): State<AppState>) -> impl IntoResponse {
    page(&state, "admin.html").await
}

pub async fn public_trips(State(state): State<AppState>) -> impl IntoResponse {
    page(&state, "public-trips.html").await
}

pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, page(&state, "404.html").await)
}

async fn page(state: &AppState, file: &str) -> Html<String> {
    let path = state.public_dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => Html(contents),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            Html(format!("<h1>{file}</h1>"))
        }
    }
}
