//! Output formatter trait

use panel_domain::{FinalResponse, OutputFormat};

/// Trait for formatting panel results
pub trait OutputFormatter {
    /// Every provider's answer followed by the summary
    fn format_full(&self, prompt: &str, response: &FinalResponse) -> String;

    /// Summary only (concise output)
    fn format_summary(&self, prompt: &str, response: &FinalResponse) -> String;

    /// Format as JSON
    fn format_json(&self, response: &FinalResponse) -> String;

    fn render(&self, format: OutputFormat, prompt: &str, response: &FinalResponse) -> String {
        match format {
            OutputFormat::Full => self.format_full(prompt, response),
            OutputFormat::Summary => self.format_summary(prompt, response),
            OutputFormat::Json => self.format_json(response),
        }
    }
}
