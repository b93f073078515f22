use echo_base::config::EchoConfig;
use echo_base::document::{read_json, write_json};
use echo_base::{uninhabited_planets, EchoBasePipeline, EntityKind, SwapiClient};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "echo-base")]
#[command(about = "Merge SWAPI data with local Echo Base fixtures")]
#[command(version)]
struct Args {
    /// SWAPI base URL (or set SWAPI_ENDPOINT env var)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build both output documents
    Run {
        /// Directory holding the input fixtures and receiving the outputs (or set ECHO_DATA_DIR)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Passengers per transport before overload (or set ECHO_BASE_CAPACITY)
        #[arg(long)]
        base_capacity: Option<i64>,
    },
    /// Write only the uninhabited planets list
    Uninhabited {
        /// Planet list (default: swapi_planets-v1p0.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: swapi_planets_uninhabited-v1p1.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Normalize a single entity document
    Clean {
        /// JSON file holding one entity
        file: PathBuf,

        /// Entity kind (person, planet, hoth, starship, vehicle, species); inferred when omitted
        #[arg(short, long)]
        kind: Option<EntityKind>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search SWAPI and print the cleaned first match
    Search {
        /// Resource collection, e.g. people, planets, starships
        resource: String,

        /// Search term
        term: String,

        /// Entity kind used to filter the record
        #[arg(short, long)]
        kind: Option<EntityKind>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = EchoConfig::from_env().context("Failed to load configuration")?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    match args.command {
        Commands::Run { data_dir, base_capacity } => {
            if let Some(data_dir) = data_dir {
                config = EchoConfig {
                    endpoint: config.endpoint,
                    base_capacity: config.base_capacity,
                    ..EchoConfig::in_dir(&data_dir)
                };
            }
            if let Some(base_capacity) = base_capacity {
                config.base_capacity = base_capacity;
            }
            run(config).await
        }
        Commands::Uninhabited { input, output } => {
            if let Some(input) = input {
                config.planets_input = input;
            }
            if let Some(output) = output {
                config.planets_output = output;
            }
            write_uninhabited(config).await
        }
        Commands::Clean { file, kind, output } => clean_file(config, file, kind, output).await,
        Commands::Search { resource, term, kind } => search(config, resource, term, kind).await,
    }
}

async fn run(config: EchoConfig) -> Result<()> {
    info!("Using SWAPI at {}", config.endpoint);
    let pipeline = EchoBasePipeline::new(SwapiClient::new(&config.endpoint), config.base_capacity);

    let summary = pipeline.run(&config).await.context("Echo Base run failed")?;

    info!(
        "Done: {} uninhabited planets, {} transport assignments",
        summary.uninhabited_planets, summary.transport_assignments
    );
    Ok(())
}

async fn write_uninhabited(config: EchoConfig) -> Result<()> {
    let pipeline = EchoBasePipeline::new(SwapiClient::new(&config.endpoint), config.base_capacity);

    let planets = read_json(&config.planets_input)
        .with_context(|| format!("Failed to read {}", config.planets_input.display()))?;
    let uninhabited = uninhabited_planets(&pipeline.normalizer(), &planets).await?;

    write_json(
        &config.planets_output,
        &Value::Array(uninhabited.into_iter().map(Value::Object).collect()),
    )
    .with_context(|| format!("Failed to write {}", config.planets_output.display()))?;

    info!("Wrote {}", config.planets_output.display());
    Ok(())
}

async fn clean_file(
    config: EchoConfig,
    file: PathBuf,
    kind: Option<EntityKind>,
    output: Option<PathBuf>,
) -> Result<()> {
    let pipeline = EchoBasePipeline::new(SwapiClient::new(&config.endpoint), config.base_capacity);

    let document = read_json(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    let entity = document
        .as_object()
        .with_context(|| format!("{} does not hold a JSON object", file.display()))?;

    let kind = kind.or_else(|| EntityKind::infer(entity));
    match kind {
        Some(kind) => info!("Cleaning {} as {}", file.display(), kind),
        None => warn!("Could not infer entity kind of {}, keeping every key", file.display()),
    }

    let cleaned = Value::Object(pipeline.normalizer().clean(entity, kind).await?);
    emit(&cleaned, output)
}

async fn search(config: EchoConfig, resource: String, term: String, kind: Option<EntityKind>) -> Result<()> {
    let kind = kind.or_else(|| resource.parse().ok());
    let pipeline = EchoBasePipeline::new(SwapiClient::new(&config.endpoint), config.base_capacity);

    if kind.is_none() {
        warn!("No entity kind for '{}', printing the record unfiltered", resource);
    }
    let record = pipeline.lookup(&resource, &term, kind).await?;

    emit(&Value::Object(record), None)
}

fn emit(value: &Value, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            write_json(&path, value).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
