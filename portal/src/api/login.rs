use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{error, info};

use crate::db::repository;
use crate::error::{AppError, MSG_CONNECTION};
use crate::render;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "coordinator_session";

pub const MSG_BAD_CREDENTIALS: &str = "بيانات تسجيل الدخول غير صحيحة";
pub const MSG_LOGIN_FAILED: &str = "حدث خطأ أثناء تسجيل الدخول";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    civil_record: String,
    #[serde(default)]
    phone_number: String,
}

pub async fn show_login() -> Html<String> {
    Html(render::login::login_page(None, ""))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let civil_record = form.civil_record.trim();
    let phone_number = form.phone_number.trim();

    let refuse = |status: StatusCode, message: &str| {
        (status, Html(render::login::login_page(Some(message), civil_record))).into_response()
    };

    let coordinator = match state
        .gateway
        .find_coordinator(civil_record, phone_number)
        .await
    {
        Ok(Some(coordinator)) => coordinator,
        Ok(None) => return Ok(refuse(StatusCode::UNAUTHORIZED, MSG_BAD_CREDENTIALS)),
        Err(AppError::Config(e)) => {
            error!("gateway unavailable: {}", e);
            return Ok(refuse(StatusCode::SERVICE_UNAVAILABLE, MSG_CONNECTION));
        }
        Err(e) => {
            error!("Error in login: {}", e);
            return Ok(refuse(StatusCode::BAD_GATEWAY, MSG_LOGIN_FAILED));
        }
    };

    let session_id = repository::insert_session(&state.db, &coordinator).await?;
    info!("coordinator {} logged in", coordinator.civil_record);

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::to("/achievements")).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        repository::delete_session(&state.db, cookie.value()).await?;
    }

    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/"),
    ))
}
