mod api;
mod config;
mod db;
mod extract;
mod load;
mod pipeline;

use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(
    name = "roster_sync",
    about = "User roster ETL: REST API -> staging -> published table"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the roster API into the staging table
    Extract,
    /// Publish staging into the final table
    Load,
    /// Extract + publish, in dependency order
    Run,
    /// Row counts for both tables
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Extract => {
            let staged = extract::run(&settings).await?;
            if staged == 0 {
                println!("No records returned by the API. Staging left untouched.");
            } else {
                println!("Staged {} records into staging_users.", staged);
            }
            Ok(())
        }
        Commands::Load => {
            let published = load::run(&settings)?;
            println!("Published {} rows into users.", published);
            Ok(())
        }
        Commands::Run => {
            for stage in pipeline::execution_order()? {
                match stage {
                    pipeline::Stage::Extract => {
                        let staged = extract::run(&settings).await?;
                        println!("[{}] {} records staged", stage.name(), staged);
                    }
                    pipeline::Stage::Load => {
                        let published = load::run(&settings)?;
                        println!("[{}] {} rows published", stage.name(), published);
                    }
                }
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            let s = db::get_stats(&conn)?;
            println!("Staged:    {}", s.staged);
            println!("Published: {}", s.published);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}
