//! CropSense CLI
//!
//! Command-line front end for the crop recommendation form.
//!
//! # Usage
//!
//! ```bash
//! cropsense schema
//! cropsense validate -F nitrogen=90 -F ph=6.5
//! cropsense recommend -F nitrogen=90 -F phosphorus=42 -F potassium=43 \
//!     -F temperature=20.8 -F humidity=82 -F ph=6.5 -F rainfall=202.9
//! cropsense config set api_url http://localhost:5000
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;
mod surface;

#[derive(Parser)]
#[command(name = "cropsense")]
#[command(author = "CropSense")]
#[command(version)]
#[command(about = "CropSense Command Line Interface", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "CROPSENSE_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    /// Form schema JSON file (defaults to the crop recommendation form)
    #[arg(long, env = "CROPSENSE_SCHEMA")]
    schema: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate field values without submitting
    Validate {
        /// Field value as name=value, repeatable
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,
    },
    /// Submit field values and print the recommendation
    Recommend {
        /// Field value as name=value, repeatable
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Refuse overlapping submissions
        #[arg(long)]
        exclusive: bool,
    },
    /// Print the form schema
    Schema,
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config not loaded, using defaults: {}", e);
        config::Config::default()
    });
    let settings = commands::Settings::resolve(&cli, &config);

    let result = match cli.command {
        Commands::Validate { fields } => commands::validate::handle(&fields, &settings),
        Commands::Recommend {
            fields,
            timeout,
            exclusive,
        } => commands::recommend::handle(&fields, timeout, exclusive, &settings).await,
        Commands::Schema => commands::schema::handle(&settings),
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
