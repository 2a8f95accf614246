use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use todo_core::{LocalClock, TaskStore};
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod session;

use config::{load_config, DEFAULT_CONFIG_FILE};
use prompt::Prompter;
use session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "todo",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TODO_BUILD_SHA"), ")"),
    about = "Interactive to-do list manager"
)]
struct Cli {
    /// Task file (default: storage.tasks_file from config, else ./tasks.json)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Config file (default: ./todo.toml if present)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<()> {
    if std::env::var("TODO_DEBUG").is_ok() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("todo_core=debug,todo_cli=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let cfg = load_config(&cli.config)?;
    let tasks_path = cfg.tasks_path(cli.file);
    let store = TaskStore::load(&tasks_path)
        .with_context(|| format!("loading tasks from {}", tasks_path.display()))?;

    let prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let mut session = Session::new(store, cfg.reminder_policy(), LocalClock, prompter);
    session.run()
}
