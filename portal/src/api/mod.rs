pub mod achievements;
pub mod directory;
pub mod login;
pub mod register;

use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(directory::show_directory))
        .route("/login", get(login::show_login).post(login::login))
        .route("/logout", post(login::logout))
        .route("/achievements", get(achievements::show_achievements))
        .route("/register", get(register::start))
        .route("/register/{id}", get(register::show))
        .route("/register/{id}/fields", post(register::update_fields))
        .route("/register/{id}/departments", post(register::link_department))
        .route("/register/{id}/schools/search", post(register::search_school))
        .route("/register/{id}/schools", post(register::link_school))
        .route(
            "/register/{id}/entities/{index}/remove",
            post(register::remove_entity),
        )
        .route("/register/{id}/submit", post(register::submit))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
