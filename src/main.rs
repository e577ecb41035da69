use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use farmo::{
    engine::{EngineBuilder, EngineSettings},
    farm::{Farm, Plot},
    web::{self, WebServerConfig},
    ConfigLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Farmo interactive farm")]
struct Cli {
    /// Path to the farm config YAML file
    #[arg(long, global = true, default_value = "farms/default.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the farm headless in virtual time and print a summary
    Simulate {
        /// Time units to advance
        #[arg(long, default_value_t = 500)]
        units: u64,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Plots to plant before the clock starts, as `x,y`
        #[arg(long = "plant", value_parser = parse_plot)]
        plant: Vec<Plot>,
    },
    /// Serve the farm UI over HTTP until Ctrl+C
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_plot(value: &str) -> Result<Plot, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{value}'"))?;
    let x = x
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid column '{x}'"))?;
    let y = y
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid row '{y}'"))?;
    Plot::new(x, y).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::new(".").load(&cli.config)?;
    info!(farm = %config.name, path = %cli.config.display(), "configuration loaded");

    match cli.command {
        Command::Simulate { units, seed, plant } => {
            let seed = seed.unwrap_or_else(|| config.resolve_seed());
            let mut engine = EngineBuilder::standard(EngineSettings {
                farm_name: config.name.clone(),
                seed,
            })
            .build();
            let mut farm = Farm::new();

            for plot in plant {
                // Select, then confirm.
                engine.click(&mut farm, plot);
                engine.click(&mut farm, plot);
            }
            engine.advance(&mut farm, units)?;

            let snapshot = farm.snapshot(engine.farm_name());
            println!(
                "Farm '{}' (seed {}) ran {} units. Weather: {} {}°C, {}. Crops: {} total, {} ready, {} growing.",
                snapshot.farm,
                seed,
                snapshot.elapsed_units,
                snapshot.weather.label,
                snapshot.weather.temperature_c,
                snapshot.phase,
                snapshot.stats.total,
                snapshot.stats.ready,
                snapshot.stats.growing,
            );
            for plot in &snapshot.plots {
                if let Some(crop) = &plot.crop {
                    println!(
                        "  ({}, {}) {} {}%{}",
                        plot.x,
                        plot.y,
                        crop.name,
                        crop.growth_percent,
                        if crop.harvest_ready { " ready" } else { "" }
                    );
                }
            }
        }
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.web.host.clone());
            let port = port.unwrap_or(config.web.port);
            web::run(WebServerConfig {
                farm: config,
                host,
                port,
            })
            .await?;
        }
    }
    Ok(())
}
