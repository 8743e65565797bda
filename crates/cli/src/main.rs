use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use aps_gantt_cli::{CliResult, Command, GridArgs, resolve_config};

/// APS Gantt - lay out simulated schedules as Gantt charts
#[derive(Parser)]
#[command(name = "apsg")]
#[command(version = "0.1.0")]
#[command(about = "Lay out APS simulation schedules as Gantt charts", long_about = None)]
struct Args {
    /// Path to a JSON config file (can also be set via APSG_CONFIG env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    grid: GridArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Initialize logging from `RUST_LOG`, defaulting to warnings only.
///
/// Logs go to stderr so they never mix with command output.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() {
    init_logging();

    if let Err(e) = run_app() {
        eprintln!("error: {}", e.full_message());
        process::exit(1);
    }
}

/// Main application logic - separated for testability
fn run_app() -> CliResult<()> {
    let args = Args::parse();
    println!("{}", run_with_args(&args)?);
    Ok(())
}

/// Run the application with the given arguments
fn run_with_args(args: &Args) -> CliResult<String> {
    // Config priority: CLI args > env vars > config file > defaults
    let config = resolve_config(args.config.clone(), &args.grid)?;

    match &args.command {
        Some(cmd) => cmd.execute(&config),
        None => Ok("Use 'apsg --help' for usage information.".to_string()),
    }
}
