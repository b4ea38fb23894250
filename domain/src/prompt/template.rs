//! Prompt templates for the summary stage

use crate::orchestration::aggregate::AggregateResult;

/// Templates for generating summarizer prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// One provider-labeled section of the summarizer input
    pub fn section(provider: &str, text: &str) -> String {
        format!("--- {} ---\n{}\n", provider, text)
    }

    /// Provider-labeled sections in the aggregate's fixed key order
    pub fn sections(aggregate: &AggregateResult) -> Vec<String> {
        aggregate
            .iter()
            .map(|entry| Self::section(entry.provider().as_str(), entry.text()))
            .collect()
    }

    /// Prompt asking for one synthesized answer
    pub fn summary_prompt(sections: &str) -> String {
        format!(
            r#"Several AI assistants answered the same question. Their answers follow, one section per assistant.
Sections starting with "⚠" mark an assistant that could not answer; ignore them.

{}
Write one concise summary that combines the answers. Point out where they agree and where they differ."#,
            sections
        )
    }

    /// Prompt for one chunk of an oversized input (map step)
    pub fn chunk_prompt(chunk: &str, part: usize, total: usize) -> String {
        format!(
            r#"This is part {} of {} of a set of answers from several AI assistants.
Summarize the answers in this part, keeping the assistant names.

{}"#,
            part, total, chunk
        )
    }

    /// Prompt combining partial summaries (reduce step)
    pub fn combine_prompt(partials: &[String]) -> String {
        let mut prompt = String::from(
            "The following are summaries of different parts of a set of answers from several AI assistants.\n",
        );
        for (i, partial) in partials.iter().enumerate() {
            prompt.push_str(&format!("\n--- Part {} ---\n{}\n", i + 1, partial));
        }
        prompt.push_str(
            "\nWrite one concise summary that combines them. Point out where the assistants agree and where they differ.",
        );
        prompt
    }

    /// Characters the chunk template adds around a chunk
    pub fn chunk_overhead(total: usize) -> usize {
        Self::chunk_prompt("", total, total).chars().count()
    }
}
