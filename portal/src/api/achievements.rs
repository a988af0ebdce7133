use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use super::login::SESSION_COOKIE;
use crate::db::repository;
use crate::error::AppError;
use crate::render;
use crate::state::AppState;

pub async fn show_achievements(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, AppError> {
    let coordinator = match jar.get(SESSION_COOKIE) {
        Some(cookie) => repository::find_session(&state.db, cookie.value()).await?,
        None => None,
    };

    let achievements = match state.gateway.fetch_achievements().await {
        Ok(achievements) => achievements,
        Err(e) => {
            error!("Error loading achievements: {}", e);
            Vec::new()
        }
    };

    Ok(Html(render::achievements::achievements_page(
        &achievements,
        coordinator.as_ref(),
    )))
}
