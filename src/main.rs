//! Ghostline CLI
//!
//! Headless entry point: run the agents on a task, apply a unified diff to a
//! file, or print the roadmap forecast.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ghostline_core::CodeGraph;
use ghostline_studio::{AppState, UnifiedDiffApplier};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ghostline")]
#[command(about = "Ghostline Studio headless core")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every agent on a task and print the merged plan as JSON
    Plan {
        /// Task description handed to the agents
        task: String,
    },
    /// Apply a unified diff to a file in place
    Apply {
        file: PathBuf,
        patch: PathBuf,
    },
    /// Print the planner's roadmap forecast
    Roadmap,
}

/// `RUST_LOG` when it is set and parses, `info` otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Plan { task } => {
            let state = AppState::load(Arc::new(CodeGraph::new()))?;
            state.agents().set_workspace_active(true);
            let plan = state.agents().propose_plan(&task).await;
            state.agents().shutdown();
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Apply { file, patch } => {
            let original = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let diff = std::fs::read_to_string(&patch)
                .with_context(|| format!("failed to read {}", patch.display()))?;
            let patched = UnifiedDiffApplier::new()
                .apply(&original, &diff)
                .with_context(|| format!("failed to patch {}", file.display()))?;
            std::fs::write(&file, patched)
                .with_context(|| format!("failed to write {}", file.display()))?;
            tracing::info!(file = %file.display(), "patch applied");
        }
        Command::Roadmap => {
            let state = AppState::load(Arc::new(CodeGraph::new()))?;
            state.agents().planner().forecast_moves();
            println!("{}", state.agents().planner().roadmap_feed());
        }
    }

    Ok(())
}
