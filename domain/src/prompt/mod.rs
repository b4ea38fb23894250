//! Prompt construction for the summary stage.

pub mod chunking;
pub mod template;

pub use chunking::chunk_sections;
pub use template::PromptTemplate;
