use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::controller::{
    MSG_SCHOOL_NOT_FOUND, MSG_SEARCH_FAILED, MSG_STATISTICAL_NUMBER_REQUIRED, Notice,
    RegistrationSession, SchoolSearch,
};
use crate::db::repository;
use crate::error::{AppError, MSG_CONNECTION};
use crate::gateway::DataGateway;
use crate::models::{CoordinatorType, ReferenceData};
use crate::render;
use crate::state::AppState;
use crate::validation::FormFields;

pub const MSG_DRAFT_EXPIRED: &str = "انتهت صلاحية جلسة التسجيل، يرجى البدء من جديد";
pub const MSG_REGISTERED: &str = "تم تسجيل المنسق بنجاح";
pub const MSG_REGISTER_FAILED: &str = "حدث خطأ أثناء تسجيل المنسق";

/// Registration fields as posted by `coordinatorForm`. Every action button
/// submits that form, so unsaved edits travel with each request.
#[derive(Debug, Deserialize)]
pub struct FieldsForm {
    civil_record: Option<String>,
    name: Option<String>,
    phone_number: Option<String>,
    coordinator_type: Option<String>,
}

impl FieldsForm {
    /// `None` when the request carried none of the fields.
    fn into_fields(self) -> Option<FormFields> {
        if self.civil_record.is_none()
            && self.name.is_none()
            && self.phone_number.is_none()
            && self.coordinator_type.is_none()
        {
            return None;
        }

        Some(FormFields {
            coordinator_type: CoordinatorType::parse(self.coordinator_type.as_deref().unwrap_or("")),
            ..FormFields::new(
                self.civil_record.as_deref().unwrap_or(""),
                self.name.as_deref().unwrap_or(""),
                self.phone_number.as_deref().unwrap_or(""),
            )
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DepartmentForm {
    #[serde(default)]
    department_id: String,
    #[serde(flatten)]
    fields: FieldsForm,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    statistical_number: String,
    #[serde(flatten)]
    fields: FieldsForm,
}

#[derive(Debug, Deserialize)]
pub struct SchoolForm {
    #[serde(default)]
    school_id: String,
    #[serde(flatten)]
    fields: FieldsForm,
}

fn apply_fields(session: &mut RegistrationSession, form: FieldsForm) {
    if let Some(fields) = form.into_fields() {
        session.update_fields(fields);
    }
}

async fn load_reference(gateway: &dyn DataGateway) -> ReferenceData {
    match gateway.fetch_departments().await {
        Ok(departments) => ReferenceData { departments },
        Err(e) => {
            error!("Error loading departments: {}", e);
            ReferenceData::default()
        }
    }
}

async fn load_draft(db: &SqlitePool, id: &str) -> Result<RegistrationSession, AppError> {
    repository::find_draft(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(MSG_DRAFT_EXPIRED.to_string()))
}

async fn save_draft(
    db: &SqlitePool,
    id: &str,
    session: &RegistrationSession,
) -> Result<Redirect, AppError> {
    if !repository::update_draft(db, id, session).await? {
        return Err(AppError::NotFound(MSG_DRAFT_EXPIRED.to_string()));
    }
    Ok(Redirect::to(&format!("/register/{}", id)))
}

/// Takes the department snapshot and opens a fresh draft.
pub async fn start(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let reference = load_reference(state.gateway.as_ref()).await;
    let count = reference.departments.len();

    let session = RegistrationSession::new(reference);
    let id = repository::insert_draft(&state.db, &session).await?;
    info!("registration draft {} opened with {} departments", id, count);

    Ok(Redirect::to(&format!("/register/{}", id)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let mut session = load_draft(&state.db, &id).await?;

    // the notice is shown once
    let notice = session.take_notice();
    if notice.is_some() {
        repository::update_draft(&state.db, &id, &session).await?;
    }

    Ok(Html(render::register::registration_page(
        &id,
        &session,
        notice.as_ref(),
    )))
}

pub async fn update_fields(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FieldsForm>,
) -> Result<Redirect, AppError> {
    let mut session = load_draft(&state.db, &id).await?;

    session.update_fields(form.into_fields().unwrap_or_default());

    save_draft(&state.db, &id, &session).await
}

pub async fn link_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DepartmentForm>,
) -> Result<Redirect, AppError> {
    let mut session = load_draft(&state.db, &id).await?;
    apply_fields(&mut session, form.fields);

    let department_id = form.department_id.trim();
    if !department_id.is_empty() && session.coordinator_type() == Some(CoordinatorType::Department) {
        if let Err(e) = session.link_department(department_id) {
            debug!("draft {}: {}", id, AppError::from(e));
        }
    }

    save_draft(&state.db, &id, &session).await
}

pub async fn search_school(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, AppError> {
    let mut session = load_draft(&state.db, &id).await?;
    apply_fields(&mut session, form.fields);

    let statistical_number = form.statistical_number.trim();
    if statistical_number.is_empty() {
        session.notice = Some(Notice::Warning(MSG_STATISTICAL_NUMBER_REQUIRED.to_string()));
        return save_draft(&state.db, &id, &session).await;
    }

    let search = match state
        .gateway
        .find_school_by_statistical_number(statistical_number)
        .await
    {
        Ok(Some(school)) => SchoolSearch::Found(school),
        Ok(None) => SchoolSearch::Failed(MSG_SCHOOL_NOT_FOUND.to_string()),
        Err(AppError::Config(e)) => {
            error!("gateway unavailable: {}", e);
            return save_draft(&state.db, &id, &session).await;
        }
        Err(e) => {
            error!("Error searching school {}: {}", statistical_number, e);
            SchoolSearch::Failed(MSG_SEARCH_FAILED.to_string())
        }
    };
    session.record_search(search);

    save_draft(&state.db, &id, &session).await
}

pub async fn link_school(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SchoolForm>,
) -> Result<Redirect, AppError> {
    let mut session = load_draft(&state.db, &id).await?;
    apply_fields(&mut session, form.fields);

    if let Err(e) = session.link_searched_school(form.school_id.trim()) {
        debug!("draft {}: {}", id, AppError::from(e));
    }

    save_draft(&state.db, &id, &session).await
}

pub async fn remove_entity(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Form(form): Form<FieldsForm>,
) -> Result<Redirect, AppError> {
    let mut session = load_draft(&state.db, &id).await?;
    apply_fields(&mut session, form);
    session.remove_entity(index);
    save_draft(&state.db, &id, &session).await
}

pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FieldsForm>,
) -> Result<Response, AppError> {
    let mut session = load_draft(&state.db, &id).await?;
    apply_fields(&mut session, form);

    let payload = match session.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            // keep what was typed so the page re-renders with it
            repository::update_draft(&state.db, &id, &session).await?;
            return Err(e);
        }
    };

    match state.gateway.insert_coordinator(&payload).await {
        Ok(()) => {
            repository::delete_draft(&state.db, &id).await?;
            info!(
                "registered {} coordinator {} with {} linked entities",
                payload.coordinator_type.as_str(),
                payload.civil_record,
                payload.linked_entities.len()
            );
            Ok(Html(render::layout::success_page(MSG_REGISTERED, "/")).into_response())
        }
        Err(e) => {
            let message = match &e {
                AppError::Config(_) => MSG_CONNECTION,
                _ => MSG_REGISTER_FAILED,
            };
            warn!("Error registering coordinator: {}", e);
            session.notice = Some(Notice::Danger(message.to_string()));
            Ok(save_draft(&state.db, &id, &session).await?.into_response())
        }
    }
}
