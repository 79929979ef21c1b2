use clap::{Parser, Subcommand};
use portalquiz_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "portalquiz-cli", version, about = "Portal Quiz CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the quiz interactively
    Play {
        /// Skip presentation delays
        #[arg(long)]
        fast: bool,
    },
    /// Run a scripted session and print its events as JSON
    Simulate {
        /// Option index (0-based) for each question, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        answers: Vec<usize>,
        /// Print only the final result
        #[arg(long)]
        summary: bool,
    },
    /// Print the configured question bank as JSON
    Questions,
    /// Print the configured archetype table as JSON
    Archetypes,
    /// Print the configured milestone table as JSON
    Milestones,
    /// Validate the configured quiz tables
    Validate,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&Config::load_or_default().logging.filter);

    let result = match cli.command {
        Commands::Play { fast } => commands::play::run(fast),
        Commands::Simulate { answers, summary } => commands::simulate::run(&answers, summary),
        Commands::Questions => commands::tables::questions(),
        Commands::Archetypes => commands::tables::archetypes(),
        Commands::Milestones => commands::tables::milestones(),
        Commands::Validate => commands::tables::validate(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
