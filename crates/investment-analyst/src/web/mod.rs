//! HTTP surface: one form page, re-evaluated on every submit

mod form;
mod handlers;
mod page;

pub use form::{DownloadForm, SubmitForm};
pub use handlers::{RenderError, evaluate};
pub use page::{Notice, NoticeKind, PageView, Pages, ReportView, busy_text, render_markdown};

use crate::report::ReportRequestBuilder;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Shared, read-only application state. Nothing per session lives here.
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<ReportRequestBuilder>,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(builder: ReportRequestBuilder, pages: Pages) -> Self {
        Self {
            builder: Arc::new(builder),
            pages: Arc::new(pages),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/download", post(handlers::download))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
