//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for panel results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every provider's answer followed by the summary
    Full,
    /// Only the summary
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for panel_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => panel_domain::OutputFormat::Full,
            OutputFormat::Summary => panel_domain::OutputFormat::Summary,
            OutputFormat::Json => panel_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for ai-panel
#[derive(Parser, Debug)]
#[command(name = "ai-panel")]
#[command(author, version, about = "Ask several AI providers at once and summarize their answers")]
#[command(long_about = r#"
ai-panel sends one prompt to several AI providers concurrently, collects
every answer (or a marker for a provider that failed), and asks a
summarization backend for one combined answer.

Providers that fail with a transient error are retried; ChatGPT quota
errors fall back to a locally hosted model by default.

Configuration files are loaded from (in priority order):
1. AI_PANEL_* environment variables
2. --config <path>     Explicit config file
3. ./panel.toml        Project-level config
4. ~/.config/ai-panel/config.toml   Global config

API keys are read from GEMINI_API_KEY, OPENAI_API_KEY and
PERPLEXITY_API_KEY unless set in the config file.

Example:
  ai-panel "What is the capital of France?"
  ai-panel -p gemini -p chatgpt --no-summary "Explain Rust lifetimes"
  echo "Compare TCP and QUIC" | ai-panel -o json
  ai-panel serve --bind 0.0.0.0:8000
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// The prompt to send (read from stdin when omitted)
    pub prompt: Option<String>,

    /// Providers to ask, in order (can be specified multiple times)
    #[arg(short, long, value_name = "PROVIDER")]
    pub provider: Vec<String>,

    /// Skip the summary stage
    #[arg(long)]
    pub no_summary: bool,

    /// Output format [default: from config, else full]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every mode
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to listen on [default: from config, else 127.0.0.1:8000]
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}
