use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lullaby", version, about = "Lullaby infant sleep coach")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sleep assessment management
    Assessment {
        #[command(subcommand)]
        action: commands::assessment::AssessmentAction,
    },
    /// Recommended method plus daily schedule for the active assessment
    Plan,
    /// Build a daily schedule from explicit inputs
    Schedule(commands::schedule::ScheduleArgs),
    /// Multi-night program control
    Program {
        #[command(subcommand)]
        action: commands::program::ProgramAction,
    },
    /// Manual check-in countdown for the current night
    Countdown(commands::countdown::CountdownArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LULLABY_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let filter = if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Assessment { action } => commands::assessment::run(action),
        Commands::Plan => commands::plan::run(),
        Commands::Schedule(args) => commands::schedule::run(args),
        Commands::Program { action } => commands::program::run(action),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
