use std::path::PathBuf;

use ares::{Ares, Config, Error};
use clap::Parser;
use tracing::{info, Level};


/// Look up businesses in the ARES registry
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML file with the transport settings
    #[arg(long, env = "ARES_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Fetch a business by its identification number and print it as JSON
    Lookup {
        /// The identification number (IČO) of the business
        identification_number: String,
    },
}


fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            info!(?path, "Loading config");
            Config::load(path)?
        }
        None => Config::default(),
    };

    match &cli.command {
        Commands::Lookup { identification_number } => {
            let ares = Ares::new(&config)?;
            let record = ares.load_data(identification_number)?;

            let json = serde_json::to_string_pretty(&record)?;
            println!("{json}");
        }
    }

    Ok(())
}
