use anyhow::{Context, Result};
use clap::Parser;
use deepcode_ui::config::UiConfig;
use deepcode_ui::gate::{GateEnvelope, GateMachine, GateSnapshot};
use deepcode_ui::paths;
use deepcode_ui::resolver::resolve;
use deepcode_ui::state::ProjectGates;
use deepcode_ui::structured_logger::StructuredLogger;
use deepcode_ui::tokens::{TokenStore, DEFAULT_TOKEN_DOCUMENT};
use deepcode_ui::tui::PreviewApp;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "deepcode-ui")]
#[command(about = "Design-token resolution and step-gate preview for the DeepCode orchestrator")]
#[command(version)]
struct Cli {
    /// Token document to load (defaults to the bundled one)
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Config file (defaults to ~/.deepcode-ui/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project name (defaults to the configured one)
    #[arg(long)]
    project: Option<String>,

    /// Validate the token document and exit
    #[arg(long)]
    validate: bool,

    /// Print the resolved CSS variable block and exit
    #[arg(long)]
    export_css: bool,

    /// Consume gate events as JSON lines on stdin instead of running the TUI
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = UiConfig::load_or_default(cli.config.as_deref())?;

    let tokens_path = cli.tokens.or(config.tokens_file);
    let document = match &tokens_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token document: {}", path.display()))?,
        None => DEFAULT_TOKEN_DOCUMENT.to_string(),
    };
    let store = TokenStore::load(&document)?;

    if cli.validate {
        println!("token document OK");
        println!("  groups: {}", store.groups().len());
        println!("  tokens: {}", store.token_count());
        println!("  fingerprint: {}", store.fingerprint());
        return Ok(());
    }

    if cli.export_css {
        print!("{}", resolve(&store).css_block());
        return Ok(());
    }

    let project_name = cli.project.unwrap_or(config.project.name);
    let session_path = paths::session_path(&project_name)?;
    let project = match ProjectGates::load(&session_path)? {
        Some(project) => project,
        None => ProjectGates::new(&project_name),
    };

    let logs_dir = match config.logs_dir {
        Some(dir) => dir,
        None => paths::logs_dir()?,
    };
    let logger = Arc::new(StructuredLogger::new(&project.session_id, &logs_dir)?);
    let (machine, snapshot_rx) = GateMachine::new(project, Arc::clone(&logger));

    if cli.headless {
        run_headless(machine, snapshot_rx, &session_path).await
    } else {
        let mut app = PreviewApp::new(machine, snapshot_rx, &store, tokens_path, logger);
        app.run().await?;
        app.machine().save(&session_path)?;
        Ok(())
    }
}

/// Applies the orchestrator's gate-event stream from stdin, one JSON
/// envelope per line, and emits the resulting snapshot for each successful
/// transition.
/// Failures go to stderr and leave gate state untouched.
async fn run_headless(
    mut machine: GateMachine,
    snapshot_rx: watch::Receiver<GateSnapshot>,
    session_path: &std::path::Path,
) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let envelope: GateEnvelope = match serde_json::from_str(&line) {
            Ok(envelope) => envelope,
            Err(err) => {
                eprintln!("malformed gate event: {}", err);
                continue;
            }
        };
        match machine.apply(envelope.into()) {
            Ok(_) => {
                let snapshot = snapshot_rx.borrow().clone();
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            Err(err) => eprintln!("{}", err),
        }
    }

    machine.save(session_path)?;
    Ok(())
}
