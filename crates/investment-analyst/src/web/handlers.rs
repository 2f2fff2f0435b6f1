use super::AppState;
use super::form::{DownloadForm, SubmitForm};
use super::page::{Notice, PageView, ReportView, busy_text};
use crate::report::{REPORT_MIME, ReportRequestBuilder, report_file_name};
use crate::session::{Panel, Readiness};
use axum::Form;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, error};

const NEEDS_KEY_MESSAGE: &str = "👈 Please select a provider and enter your API key in the sidebar to get started.";
const WAITING_FOR_TICKER_MESSAGE: &str = "👆 Please enter both stock symbols to begin the analysis.";

/// Template failure, reported as a bare 500
#[derive(Debug)]
pub struct RenderError(minijinja::Error);

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Failed to render page");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
    }
}

pub(super) async fn index(State(state): State<AppState>) -> Result<Html<String>, RenderError> {
    let view = evaluate(&state.builder, SubmitForm::default()).await;
    Ok(Html(state.pages.render(&view)?))
}

pub(super) async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, RenderError> {
    let view = evaluate(&state.builder, form).await;
    Ok(Html(state.pages.render(&view)?))
}

pub(super) async fn download(Form(form): Form<DownloadForm>) -> Response {
    // Form submission turns newlines into CRLF
    let content = form.content.replace("\r\n", "\n");
    if content.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "No report to download").into_response();
    }

    let file_name = report_file_name(&form.ticker_a, &form.ticker_b);
    debug!(file_name = %file_name, bytes = content.len(), "Serving report download");
    (
        [
            (header::CONTENT_TYPE, format!("{REPORT_MIME}; charset=utf-8")),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        content,
    )
        .into_response()
}

pub(super) async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Re-evaluate the form and, when it is complete and the trigger was
/// pressed, run the analysis once
pub async fn evaluate(builder: &ReportRequestBuilder, form: SubmitForm) -> PageView {
    let (input, generate) = form.into_parts();
    let panel = Panel::from_input(&input);
    if panel.provider_changed {
        debug!(provider = %panel.provider, "Provider changed, API key cleared");
    }

    let mut view = PageView::new(&panel);
    match panel.readiness() {
        Readiness::NeedsApiKey => {
            view.notices.push(Notice::info(NEEDS_KEY_MESSAGE));
            view.show_help = true;
        }
        Readiness::Idle => {}
        Readiness::WaitingForTicker => view.notices.push(Notice::info(WAITING_FOR_TICKER_MESSAGE)),
        Readiness::Ready(config) => {
            view.can_generate = true;
            view.busy_text = Some(busy_text(&config));
            if generate {
                match builder.build_and_run(&config).await {
                    Ok(report) => view.report = Some(ReportView::from_report(&report)),
                    Err(err) => {
                        view.notices.push(Notice::error(format!("❌ {err}")));
                        view.notices.push(Notice::info(err.suggestion()));
                    }
                }
            }
        }
    }
    view
}
