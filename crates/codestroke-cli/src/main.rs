use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "codestroke", version, about = "Acute stroke decision and timeline engine")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the session record (default: platform cache dir)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the treatment window for a last-known-well time
    Window {
        /// RFC 3339 timestamp, or a wall-clock time like 14:30
        #[arg(long)]
        lkw: String,
        /// Evaluate at this instant instead of now (RFC 3339)
        #[arg(long)]
        at: Option<String>,
    },
    /// Weight-based thrombolytic doses
    Dose {
        weight: f64,
        #[arg(long, value_enum, default_value = "kg")]
        unit: UnitArg,
    },
    /// Run a scripted session from a JSON file of steps
    Replay {
        script: PathBuf,
        /// Print the handoff note after the last step
        #[arg(long)]
        note: bool,
    },
    /// Print the handoff note for the stored encounter
    Note,
    /// Print live elapsed time on every tick until interrupted
    Live,
    /// Discard the stored encounter
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Kg,
    Lb,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let config = match &cli.config {
        Some(path) => codestroke_workflow::config::load_config_from(path)?,
        None => codestroke_workflow::config::load_config()?,
    };
    let session_dir = match cli.session_dir {
        Some(dir) => dir,
        None => commands::default_session_dir()?,
    };

    match cli.cmd {
        Command::Window { lkw, at } => commands::window::run(&config, &lkw, at.as_deref()),
        Command::Dose { weight, unit } => {
            let weight = match unit {
                UnitArg::Kg => codestroke_core::dosing::BodyWeight::kg(weight),
                UnitArg::Lb => codestroke_core::dosing::BodyWeight::lb(weight),
            };
            commands::dose::run(weight)
        }
        Command::Replay { script, note } => commands::replay::run(config, &script, note),
        Command::Note => commands::note::run(config, &session_dir),
        Command::Live => commands::live::run(config, &session_dir).await,
        Command::Reset => commands::reset::run(config, &session_dir),
    }
}
