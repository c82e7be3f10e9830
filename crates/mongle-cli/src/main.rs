use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mongle-cli", version, about = "Mongle CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pet status and gestures
    Pet {
        #[command(subcommand)]
        action: commands::pet::PetCommand,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Gauge cache inspection
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Pet { action } => commands::pet::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Cache { action } => commands::cache::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
