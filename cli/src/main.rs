//! CLI entrypoint for ai-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use panel_application::{
    ConversationLogger, NoProgress, Orchestrator, ProgressNotifier, RunPanelError, RunPanelInput,
    RunPanelUseCase, Summarizer,
};
use panel_domain::OutputFormat;
use panel_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, ProviderRegistry};
use panel_presentation::{
    AppState, Cli, Command, ConsoleFormatter, GlobalArgs, OutputFormatter, ProgressReporter,
    SimpleProgress,
};
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli.global)?;

    info!("Starting ai-panel");

    if cli.global.show_config {
        print!(
            "{}",
            ConfigLoader::config_sources_report(cli.global.config.as_deref())
        );
        return Ok(());
    }

    let config = load_config(&cli.global)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let use_case = build_use_case(config.clone())?;

    // Ctrl-C cancels in-flight provider calls
    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling");
                token.cancel();
            }
        });
    }

    if let Some(Command::Serve { bind }) = cli.command {
        let bind = bind.unwrap_or_else(|| config.server.bind.clone());
        let listener = tokio::net::TcpListener::bind(&bind)
            .await
            .with_context(|| format!("failed to bind {}", bind))?;
        panel_presentation::serve(listener, AppState::new(use_case, cancellation)).await?;
        return Ok(());
    }

    // Single prompt mode: argument, else piped stdin
    let prompt = match cli.prompt {
        Some(prompt) => prompt,
        None if !std::io::stdin().is_terminal() => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read prompt from stdin")?;
            buffer
        }
        None => bail!("A prompt is required. Pass it as an argument or pipe it on stdin."),
    };

    let mut input = RunPanelInput::new(prompt.clone()).with_providers(cli.provider);
    if cli.no_summary {
        input = input.without_summary();
    }

    // Progress bars only make sense on a terminal; plain lines otherwise
    let progress: Box<dyn ProgressNotifier> = if cli.global.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };
    let result = use_case
        .execute_with_progress(input, progress.as_ref(), Some(&cancellation))
        .await;

    let response = match result {
        Ok(response) => response,
        Err(RunPanelError::Cancelled) => bail!("Cancelled"),
        Err(err) => return Err(err.into()),
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(format, prompt.trim(), &response));

    Ok(())
}

/// Install the tracing subscriber chosen by `-v`, with an optional log file
fn init_logging(args: &GlobalArgs) -> Result<Option<WorkerGuard>> {
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Load and validate configuration, logging warnings
fn load_config(args: &GlobalArgs) -> Result<FileConfig> {
    let config = if args.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(args.config.as_deref())?
    };

    for issue in config.ensure_valid()? {
        warn!("{}", issue.message);
    }

    Ok(config)
}

fn build_use_case(config: FileConfig) -> Result<RunPanelUseCase> {
    let conversation_log = config.logging.conversation_log.clone();
    let registry = ProviderRegistry::new(config)?;
    let setup = registry.setup()?;

    info!(
        providers = ?setup.panel.ids(),
        fallbacks = setup.fallback.len(),
        "Panel configured"
    );

    let mut orchestrator = Orchestrator::new(&setup.dispatch, Arc::new(setup.fallback));
    let logger: Option<Arc<dyn ConversationLogger>> = conversation_log
        .as_deref()
        .and_then(|path| JsonlConversationLogger::open(path))
        .map(|logger| Arc::new(logger) as Arc<dyn ConversationLogger>);
    if let Some(logger) = &logger {
        orchestrator = orchestrator.with_conversation_logger(Arc::clone(logger));
    }

    let mut use_case = RunPanelUseCase::new(setup.panel, orchestrator);
    if let Some(client) = setup.summarizer {
        use_case = use_case.with_summarizer(Summarizer::new(client, setup.summary));
    }
    if let Some(logger) = logger {
        use_case = use_case.with_conversation_logger(logger);
    }

    Ok(use_case)
}
