//! View model and template rendering for the form page

use crate::analysis::AnalysisType;
use crate::provider::Provider;
use crate::report::AnalysisReport;
use crate::session::{KeyStatus, Panel, SessionConfig};
use minijinja::Environment;
use serde::Serialize;

const INDEX: &str = "index.html";

/// Compiled page templates
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        // `.html` names get HTML autoescaping
        env.add_template(INDEX, include_str!("../../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &PageView) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX)?.render(view)
    }
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeyLink {
    pub provider: &'static str,
    pub url: &'static str,
}

/// A finished report: rendered for display, verbatim for download
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub html: String,
    pub markdown: String,
    pub file_name: String,
    pub ticker_a: String,
    pub ticker_b: String,
}

impl ReportView {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            html: render_markdown(report.content()),
            markdown: report.content().to_string(),
            file_name: report.file_name(),
            ticker_a: report.ticker_a().to_string(),
            ticker_b: report.ticker_b().to_string(),
        }
    }
}

/// Everything the page template needs. Holds the key to echo it back into
/// the password field, so it deliberately has no `Debug`.
#[derive(Serialize)]
pub struct PageView {
    pub providers: Vec<Choice>,
    pub provider: &'static str,
    pub key_label: &'static str,
    pub api_key: String,
    pub key_configured: bool,
    pub key_status: String,
    pub models: Vec<Choice>,
    pub ticker_a: String,
    pub ticker_b: String,
    pub analysis_types: Vec<Choice>,
    pub notices: Vec<Notice>,
    pub show_help: bool,
    pub key_links: Vec<KeyLink>,
    pub can_generate: bool,
    pub busy_text: Option<String>,
    pub report: Option<ReportView>,
}

impl PageView {
    pub fn new(panel: &Panel) -> Self {
        let provider = panel.provider;
        Self {
            providers: Provider::ALL
                .iter()
                .map(|p| Choice {
                    label: p.name(),
                    selected: *p == provider,
                })
                .collect(),
            provider: provider.name(),
            key_label: provider.profile().key_label,
            api_key: panel
                .api_key
                .as_ref()
                .map(|key| key.expose().to_string())
                .unwrap_or_default(),
            key_configured: panel.key_status() == KeyStatus::Configured,
            key_status: panel.key_status_message(),
            models: provider
                .model_labels()
                .map(|label| Choice {
                    label,
                    selected: label == panel.model.label,
                })
                .collect(),
            ticker_a: panel.ticker_a.clone(),
            ticker_b: panel.ticker_b.clone(),
            analysis_types: AnalysisType::ALL
                .iter()
                .map(|t| Choice {
                    label: t.label(),
                    selected: *t == panel.analysis_type,
                })
                .collect(),
            notices: Vec::new(),
            show_help: false,
            key_links: Provider::ALL
                .iter()
                .map(|p| KeyLink {
                    provider: p.name(),
                    url: p.profile().key_url,
                })
                .collect(),
            can_generate: false,
            busy_text: None,
            report: None,
        }
    }
}

/// Text shown while an analysis is running
pub fn busy_text(config: &SessionConfig) -> String {
    format!(
        "Analyzing {} vs {} using {} ({})...",
        config.ticker_a(),
        config.ticker_b(),
        config.provider(),
        config.model().label
    )
}

/// GitHub-flavoured markdown to HTML. Raw HTML in the input is escaped.
pub fn render_markdown(content: &str) -> String {
    markdown::to_html_with_options(content, &markdown::Options::gfm()).unwrap_or_else(|_| markdown::to_html(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{input, ready_config};

    #[test]
    fn test_render_markdown_tables_and_escaping() {
        let html = render_markdown("| | AAPL |\n|---|---|\n| Price | 1 |\n\n<script>alert(1)</script>");
        assert!(html.contains("<table>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_busy_text() {
        let config = ready_config(&input("Groq", "Gemma 7B", "k", "aapl", "msft", ""));
        assert_eq!(busy_text(&config), "Analyzing AAPL vs MSFT using Groq (Gemma 7B)...");
    }

    #[test]
    fn test_view_lists_only_the_selected_providers_models() {
        let panel = Panel::from_input(&input("Groq", "Mixtral 8x7B", "", "", "", ""));
        let view = PageView::new(&panel);
        let labels: Vec<_> = view.models.iter().map(|m| m.label).collect();
        assert_eq!(labels, Provider::Groq.model_labels().collect::<Vec<_>>());
        assert!(view.models.iter().any(|m| m.selected && m.label == "Mixtral 8x7B"));
        assert_eq!(view.key_label, "Groq API Key");
        assert!(!view.key_configured);
    }

    #[test]
    fn test_page_renders_and_escapes_inputs() {
        let pages = Pages::new().unwrap();
        let panel = Panel::from_input(&input("Cerebras", "", "k", "<b>", "", ""));
        let html = pages.render(&PageView::new(&panel)).unwrap();
        assert!(html.contains("AI Investment Analyst"));
        assert!(html.contains("✅ Cerebras API Key configured"));
        assert!(html.contains("&lt;B&gt;"));
        assert!(!html.contains("Generate Analysis"));
    }

    #[test]
    fn test_page_with_report_offers_generate_and_download() {
        let pages = Pages::new().unwrap();
        let form = input("Cerebras", "", "k", "aapl", "msft", "Quick Overview");
        let config = ready_config(&form);
        let mut view = PageView::new(&Panel::from_input(&form));
        view.can_generate = true;
        view.busy_text = Some(busy_text(&config));
        let markdown = "\n## Snapshot\n\nAT&T is not in this table.";
        view.report = Some(ReportView::from_report(&AnalysisReport::new("AAPL", "MSFT", markdown)));

        let html = pages.render(&view).unwrap();
        assert!(html.contains("🔍 Generate Analysis"));
        assert!(html.contains("Analyzing AAPL vs MSFT using Cerebras (Llama 3.3 70B)..."));
        assert!(html.contains("📊 Investment Analysis Report"));
        assert!(html.contains("<h2>Snapshot</h2>"));
        assert!(html.contains(r#"action="/download""#));
        assert!(html.contains(r#"<input type="hidden" name="ticker_a" value="AAPL">"#));
        assert!(html.contains(r#"<input type="hidden" name="ticker_b" value="MSFT">"#));
        assert!(html.contains("📥 Download Report"));
        // The newline after <textarea> is eaten by the parser, so the content
        // keeps its own leading newline
        assert!(html.contains("<textarea name=\"content\" hidden>\n\n## Snapshot\n\nAT&amp;T is not in this table.</textarea>"));
    }
}
