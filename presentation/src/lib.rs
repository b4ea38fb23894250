//! Presentation layer for ai-panel
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP service.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, GlobalArgs, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use server::{AppState, router, serve};
