//! # Swiggy Admin
//!
//! Operator commands for the marketplace: schema migrations, catalog
//! seeding, health checks and configuration inspection.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swiggy_core::config::{ConfigManager, StoreBackend};
use swiggy_core::database::{embedded_migrations, run_migrations, DatabaseConnection};
use swiggy_core::logging::init_structured_logging;
use swiggy_core::Marketplace;
use tracing::info;

#[derive(Parser)]
#[command(name = "swiggy-admin")]
#[command(about = "Administer the Swiggy marketplace database and catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration directory (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to load (default: SWIGGY_ENV or development)
    #[arg(short, long)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Load restaurants and menus from a YAML catalog
    Seed {
        /// Catalog file (default: seed.catalog_path from configuration)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Check that the configured store answers
    Health,

    /// Print the effective configuration as JSON with credentials masked
    Config,

    /// List restaurants
    Restaurants,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.environment {
        Some(environment) => {
            ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), environment)
        }
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    }
    .context("failed to load configuration")?;

    init_structured_logging(
        &config_manager.config().logging,
        config_manager.environment(),
    );

    match cli.command {
        Commands::Migrate => {
            let database = &config_manager.config().database;
            if database.backend != StoreBackend::Postgres {
                bail!("migrations only apply to the postgres backend");
            }
            let connection = DatabaseConnection::new(database)
                .await
                .context("failed to connect to database")?;
            run_migrations(connection.pool())
                .await
                .context("failed to run migrations")?;
            for (version, description) in embedded_migrations() {
                println!("{version} {description}");
            }
            connection.close().await;
        }
        Commands::Seed { file } => {
            let marketplace = Marketplace::connect(config_manager).await?;
            let report = marketplace
                .seed_catalog(file.as_deref())
                .await
                .context("catalog seeding failed")?;
            info!(
                restaurants = report.restaurants,
                foods = report.foods,
                skipped = report.skipped,
                "Seed finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            marketplace.shutdown().await;
        }
        Commands::Health => {
            let marketplace = Marketplace::connect(config_manager).await?;
            let healthy = marketplace.health_check().await.unwrap_or(false);
            marketplace.shutdown().await;
            if !healthy {
                bail!("store health check failed");
            }
            println!("ok");
        }
        Commands::Config => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config_manager.debug_config())?
            );
        }
        Commands::Restaurants => {
            let marketplace = Marketplace::connect(config_manager).await?;
            for restaurant in marketplace.restaurants.list().await? {
                println!(
                    "{:>6}  {:<24} {}",
                    restaurant.id,
                    restaurant.name,
                    restaurant.phone_number.as_deref().unwrap_or("-")
                );
            }
            marketplace.shutdown().await;
        }
    }

    Ok(())
}
