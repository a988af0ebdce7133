use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::{debug, error};

use crate::directory::{total_pages, DirectoryView};
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DirectoryParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    page: Option<usize>,
}

pub async fn show_directory(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> Html<String> {
    let schools = match state.gateway.fetch_schools().await {
        Ok(schools) => schools,
        Err(e) => {
            error!("Error loading schools: {}", e);
            Vec::new()
        }
    };

    let mut view = DirectoryView::new();
    if let Some(q) = params.q.as_deref() {
        view.search(q);
    }

    let results = view.results(&schools);
    if let Some(page) = params.page {
        let total = total_pages(results.len());
        if !view.change_page(page, total) {
            debug!("ignoring page {} of {}", page, total);
        }
    }

    Html(render::directory::directory_page(&view, &results))
}
