use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "healthytime", version, about = "HealthyTime meal timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive meal timer session (records live until exit)
    Session(commands::session::SessionArgs),
    /// Print the meal type for a time of day
    Classify {
        /// `HH:MM` in local time, or an RFC 3339 timestamp
        time: String,
    },
    /// Format seconds as MM:SS
    Format {
        seconds: u64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HEALTHYTIME_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session(args) => commands::session::run(args),
        Commands::Classify { time } => commands::classify::run_classify(&time),
        Commands::Format { seconds } => commands::classify::run_format(seconds),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
