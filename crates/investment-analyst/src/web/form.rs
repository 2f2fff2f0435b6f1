use crate::session::PanelInput;
use serde::Deserialize;

/// The main form as posted. `generate` is only present when the
/// Generate Analysis button submitted the form.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SubmitForm {
    pub provider: String,
    pub previous_provider: String,
    pub model: String,
    pub api_key: String,
    pub ticker_a: String,
    pub ticker_b: String,
    pub analysis_type: String,
    pub generate: Option<String>,
}

impl SubmitForm {
    /// Split into the panel fields and the trigger flag
    pub fn into_parts(self) -> (PanelInput, bool) {
        let input = PanelInput {
            provider: self.provider,
            previous_provider: self.previous_provider,
            model: self.model,
            api_key: self.api_key,
            ticker_a: self.ticker_a,
            ticker_b: self.ticker_b,
            analysis_type: self.analysis_type,
        };
        (input, self.generate.is_some())
    }
}

/// Posted by the Download Report button
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DownloadForm {
    pub ticker_a: String,
    pub ticker_b: String,
    pub content: String,
}
