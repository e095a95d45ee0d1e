//! Burrow - Kademlia bucket-refresh target generation harness

use anyhow::Result;
use burrow_dht::catalogue::Catalogue;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "burrow")]
#[command(about = "Kademlia bucket-refresh target generation", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "~/.burrow/config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Catalogue document path (overrides config)
    #[arg(long)]
    catalogue: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a peer ID at an exact common prefix length from a local key
    Generate {
        /// Target common prefix length (0-15)
        #[arg(required = true)]
        cpl: u16,

        /// Random seed, widened to 16 bits
        #[arg(required = true)]
        seed: u16,

        /// Local Kademlia key (hex-encoded, 32 bytes)
        #[arg(required = true)]
        local_id: String,
    },

    /// Precompute the prefix catalogue and persist it
    BuildCatalogue {
        /// Output path (defaults to the configured catalogue path)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check every catalogue entry against its prefix
    VerifyCatalogue,

    /// Initialize configuration
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = load_config(&cli.config);
    let catalogue_path = cli
        .catalogue
        .as_deref()
        .map(config::expand_path)
        .unwrap_or_else(|| config.catalogue_path());

    match cli.command {
        Commands::Generate { cpl, seed, local_id } => {
            generate(cpl, seed, &local_id, &catalogue_path)?;
        }
        Commands::BuildCatalogue { output } => {
            let output = output
                .as_deref()
                .map(config::expand_path)
                .unwrap_or(catalogue_path);
            build_catalogue(&output)?;
        }
        Commands::VerifyCatalogue => {
            verify_catalogue(&catalogue_path)?;
        }
        Commands::Init => {
            init_config()?;
        }
    }

    Ok(())
}

fn load_config(path: &str) -> Config {
    let path = config::expand_path(path);
    if path.exists() {
        match Config::load(&path) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Failed to load config {}: {}", path.display(), e),
        }
    }
    Config::default()
}

fn generate(cpl: u16, seed: u16, local_id: &str, catalogue_path: &Path) -> Result<()> {
    let local = burrow_core::hex_to_kad_id(local_id)
        .map_err(|e| anyhow::anyhow!("Invalid local key: {}", e))?;

    tracing::info!("Loading catalogue from {}", catalogue_path.display());
    let catalogue = Catalogue::load(catalogue_path)?;

    let peer_id = burrow_dht::generator::peer_id_for_cpl(&local, cpl, seed, &catalogue)?;
    println!("{:?}", peer_id);

    Ok(())
}

fn build_catalogue(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Building catalogue, this scans on the order of a million hashes");
    let catalogue = Catalogue::build();
    catalogue.save(output)?;

    println!("Catalogue written to {}", output.display());
    Ok(())
}

fn verify_catalogue(path: &Path) -> Result<()> {
    let catalogue = Catalogue::load(path)?;
    let mismatched = catalogue.verify();

    if !mismatched.is_empty() {
        for prefix in &mismatched {
            tracing::debug!("Prefix {:#06x} does not reproduce from its key", prefix);
        }
        anyhow::bail!(
            "{} of 65536 catalogue entries failed verification",
            mismatched.len()
        );
    }

    println!("Catalogue OK: all 65536 prefixes reproduce");
    Ok(())
}

fn init_config() -> Result<()> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".burrow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        tracing::info!("Created config directory: {}", config_dir.display());
    }

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        return Ok(());
    }

    let config = Config::default();
    let toml = toml::to_string_pretty(&config)?;
    std::fs::write(&config_path, toml)?;

    println!("Initialized Burrow at: {}", config_dir.display());

    Ok(())
}
