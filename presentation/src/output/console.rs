//! Console output formatter for panel results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use panel_domain::{AggregateEntry, FinalResponse, SummaryInput, SummaryResult};

/// Formats panel results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every provider's answer followed by the summary
    pub fn format(prompt: &str, response: &FinalResponse) -> String {
        let aggregate = response.aggregate();
        let mut output = String::new();

        output.push_str(&Self::header("AI Panel Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Prompt:".cyan().bold(), prompt));

        let providers: Vec<&str> = aggregate.providers().map(|p| p.as_str()).collect();
        output.push_str(&format!(
            "{} {}\n",
            "Providers:".cyan().bold(),
            providers.join(", ")
        ));

        output.push_str(&Self::section_header("Provider Responses"));
        for entry in aggregate.iter() {
            output.push_str(&Self::format_entry(entry));
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&Self::format_summary_body(response.summary()));

        output.push_str(&Self::footer());

        output
    }

    fn format_entry(entry: &AggregateEntry) -> String {
        let mut label = format!("── {}", entry.provider());
        if let Some(fallback) = entry.served_by() {
            label.push_str(&format!(" (via {})", fallback));
        }
        label.push_str(" ──");

        if entry.is_success() {
            return format!("\n{}\n{}\n", label.yellow().bold(), entry.text());
        }

        let mut block = format!("\n{}\n{}\n", label.red().bold(), entry.text());
        if let Some(failure) = entry.result().failure_detail() {
            if !failure.detail.is_empty() {
                block.push_str(&format!("{}\n", failure.detail.dimmed()));
            }
        }
        block
    }

    fn format_summary_body(summary: &SummaryResult) -> String {
        match summary {
            SummaryResult::Success { text, input } => {
                let mut body = format!("\n{}\n", text);
                match input {
                    SummaryInput::Direct => {}
                    SummaryInput::Reduced { chunks, rounds } => body.push_str(&format!(
                        "\n{}\n",
                        format!(
                            "(condensed from {} chunks in {} round(s))",
                            chunks, rounds
                        )
                        .dimmed()
                    )),
                    SummaryInput::Truncated => body.push_str(&format!(
                        "\n{}\n",
                        "(input was truncated to fit the summarizer)".dimmed()
                    )),
                }
                body
            }
            SummaryResult::Failure(failure) => format!(
                "\n{}\n{}\n",
                summary.display_text().unwrap_or_default().red(),
                failure.detail.dimmed()
            ),
            SummaryResult::Skipped => format!("\n{}\n", "(skipped)".dimmed()),
        }
    }

    /// Format as JSON
    pub fn format_json(response: &FinalResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the summary only (concise output)
    pub fn format_summary_only(prompt: &str, response: &FinalResponse) -> String {
        let aggregate = response.aggregate();
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== AI Panel Summary ===".cyan().bold()));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), prompt));

        let answered = aggregate.successful().count();
        output.push_str(&format!(
            "{} {}/{}\n\n",
            "Providers answered:".dimmed(),
            answered,
            aggregate.len()
        ));

        match response.summary().display_text() {
            Some(text) => output.push_str(&text),
            // Without a summary the answers are the only content left to show
            None => {
                for entry in aggregate.iter() {
                    output.push_str(&format!(
                        "{}: {}\n",
                        entry.provider().as_str().bold(),
                        entry.text()
                    ));
                }
            }
        }
        if !output.ends_with('\n') {
            output.push('\n');
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, prompt: &str, response: &FinalResponse) -> String {
        Self::format(prompt, response)
    }

    fn format_summary(&self, prompt: &str, response: &FinalResponse) -> String {
        Self::format_summary_only(prompt, response)
    }

    fn format_json(&self, response: &FinalResponse) -> String {
        Self::format_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::{
        FailureKind, OutputFormat, ProviderFailure, ProviderId, ProviderResult, ResponseAggregator,
        SettledSlot,
    };

    fn sample(summary: SummaryResult) -> FinalResponse {
        colored::control::set_override(false);
        let aggregate = ResponseAggregator::new(vec![
            ProviderId::gemini(),
            ProviderId::chatgpt(),
            ProviderId::perplexity(),
        ])
        .collect(vec![
            SettledSlot::new(0, ProviderId::gemini(), ProviderResult::success("Paris."), 1),
            SettledSlot::new(
                1,
                ProviderId::chatgpt(),
                ProviderResult::failure(FailureKind::RateLimited, "quota exceeded"),
                1,
            )
            .with_fallback(ProviderId::local(), ProviderResult::success("Paris, France.")),
            SettledSlot::new(
                2,
                ProviderId::perplexity(),
                ProviderResult::failure(FailureKind::Timeout, "no response after 60s"),
                4,
            ),
        ]);
        FinalResponse::new(aggregate, summary)
    }

    #[test]
    fn test_full_output_lists_providers_in_order() {
        let response = sample(SummaryResult::success("All agree: Paris.", SummaryInput::Direct));
        let text = ConsoleFormatter::format("Capital of France?", &response);

        let gemini = text.find("── Gemini ──").unwrap();
        let chatgpt = text.find("── ChatGPT (via Local) ──").unwrap();
        let perplexity = text.find("── Perplexity ──").unwrap();
        assert!(gemini < chatgpt && chatgpt < perplexity);

        assert!(text.contains("Paris, France."));
        assert!(text.contains("no response after 60s"));
        assert!(text.contains("All agree: Paris."));
        assert!(text.contains("Providers: Gemini, ChatGPT, Perplexity"));
    }

    #[test]
    fn test_failed_fallback_has_no_via_marker() {
        colored::control::set_override(false);
        let aggregate = ResponseAggregator::new(vec![ProviderId::chatgpt()]).collect(vec![
            SettledSlot::new(
                0,
                ProviderId::chatgpt(),
                ProviderResult::failure(FailureKind::RateLimited, "429"),
                1,
            )
            .with_fallback(
                ProviderId::local(),
                ProviderResult::failure(FailureKind::Unavailable, "fallback Local failed: refused"),
            ),
        ]);
        let response = FinalResponse::new(aggregate, SummaryResult::Skipped);
        let text = ConsoleFormatter::format("q", &response);

        assert!(text.contains("── ChatGPT ──"));
        assert!(!text.contains("(via Local)"));
        assert!(text.contains("fallback Local failed: refused"));
    }

    #[test]
    fn test_full_output_marks_skipped_summary() {
        let response = sample(SummaryResult::Skipped);
        let text = ConsoleFormatter::format("q", &response);
        assert!(text.contains("(skipped)"));
    }

    #[test]
    fn test_summary_only_shows_failure_sentinel() {
        let response = sample(SummaryResult::Failure(ProviderFailure::timeout("slow")));
        let text = ConsoleFormatter::format_summary_only("q", &response);

        assert!(text.contains("Providers answered: 2/3"));
        assert!(text.contains("Summary unavailable"));
        assert!(!text.contains("── Gemini ──"));
    }

    #[test]
    fn test_summary_only_without_summary_lists_answers() {
        let response = sample(SummaryResult::Skipped);
        let text = ConsoleFormatter::format_summary_only("q", &response);
        assert!(text.contains("Gemini: Paris."));
    }

    #[test]
    fn test_render_json_matches_wire_shape() {
        let response = sample(SummaryResult::success("Paris.", SummaryInput::Direct));
        let text = ConsoleFormatter.render(OutputFormat::Json, "q", &response);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["model_responses"]["Gemini"], "Paris.");
        assert_eq!(value["model_responses"]["ChatGPT"], "Paris, France.");
        assert_eq!(value["summary"], "Paris.");
        assert_eq!(value["fallbacks"]["ChatGPT"], "Local");
    }
}
