//! moodmix - mood-based cocktail recipe generator
//!
//! Loads the catalog documents from the data directory, runs one generation
//! engine plus finalization, and prints the recipe as JSON or share text.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use moodmix_common::config::{resolve_data_dir, TomlConfig};
use moodmix_common::{FlavorKey, TasteInput, Unit};
use moodmix_engine::{EngineContext, EngineKind, GenerateOptions, Intensity};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for moodmix
#[derive(Parser, Debug)]
#[command(name = "moodmix")]
#[command(about = "Mood-based cocktail recipe generator")]
#[command(version)]
struct Cli {
    /// Bootstrap TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the catalog documents
    #[arg(long, global = true, env = "MOODMIX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one recipe
    Generate(GenerateArgs),
    /// List the mood grid
    Moods,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Mood key
    #[arg(long)]
    mood: String,

    /// Engine (classic, creative, corpus); the configured default otherwise
    #[arg(long)]
    engine: Option<EngineKind>,

    /// Non-alcoholic mode
    #[arg(long)]
    na: bool,

    #[arg(long)]
    low_sugar: bool,

    /// Allergen tag to exclude (repeatable)
    #[arg(long = "allergy")]
    allergies: Vec<String>,

    /// Ingredient id or name on hand (repeatable)
    #[arg(long = "inventory")]
    inventory: Vec<String>,

    #[arg(long)]
    prefer_inventory: bool,

    /// Taste slider as dim=value, value 0-100 (repeatable)
    #[arg(long = "taste", value_parser = parse_taste)]
    taste: Vec<(FlavorKey, f64)>,

    /// Creative risk level, 0-1
    #[arg(long)]
    risk: Option<f64>,

    /// Creative modernity override, 0-1
    #[arg(long)]
    modernity: Option<f64>,

    /// Naming variability, 0-1
    #[arg(long)]
    variability: Option<f64>,

    /// Micro-tuning intensity: low, medium, high or a number
    #[arg(long)]
    intensity: Option<Intensity>,

    /// Disable creative micro-tuning
    #[arg(long)]
    no_tune: bool,

    /// Naming seed salt
    #[arg(long)]
    seed: Option<String>,

    /// Display unit (ml, oz)
    #[arg(long)]
    unit: Option<Unit>,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn parse_taste(s: &str) -> std::result::Result<(FlavorKey, f64), String> {
    let (dim, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected dim=value, got '{}'", s))?;
    let key = FlavorKey::parse(dim).ok_or_else(|| format!("unknown flavor dimension '{}'", dim))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid taste value '{}'", value))?;
    Ok((key, value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TomlConfig::load_or_default(cli.config.as_deref());

    // Initialize tracing; stdout is reserved for output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting moodmix v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), &config);
    info!("Data directory: {}", data_dir.display());
    let ctx = EngineContext::load(&data_dir)
        .with_context(|| format!("Failed to load catalog from {}", data_dir.display()))?;

    match cli.command {
        Command::Moods => {
            for mood in ctx.moods() {
                println!("{}\t{}", mood.key, mood.display_name);
            }
        }
        Command::Generate(args) => run_generate(&ctx, &config, args)?,
    }
    Ok(())
}

fn run_generate(ctx: &EngineContext, config: &TomlConfig, args: GenerateArgs) -> Result<()> {
    let engine = match args.engine {
        Some(engine) => engine,
        None => config
            .defaults
            .engine
            .parse::<EngineKind>()
            .map_err(|e| anyhow!("Invalid default engine in config: {}", e))?,
    };

    let mut taste = TasteInput::new();
    for (key, value) in &args.taste {
        taste.set(*key, *value);
    }

    let mut opts = GenerateOptions::new(args.mood)
        .with_taste(taste)
        .with_na(args.na)
        .with_low_sugar(args.low_sugar)
        .with_inventory(args.inventory, args.prefer_inventory);
    opts.allergies = args.allergies;
    opts.risk_level = args.risk;
    opts.modernity = args.modernity;
    opts.variability = args.variability;
    opts.seed_salt = args.seed.or_else(|| config.defaults.seed_salt.clone());
    opts.micro_tune.enabled = !args.no_tune;
    opts.micro_tune.intensity = args.intensity;
    debug!("Generation options: {}", serde_json::to_string(&opts)?);

    let unit = args.unit.unwrap_or(config.defaults.unit);
    let recipe = moodmix_engine::generate(ctx, engine, &opts)?.with_unit(unit);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recipe)?),
        OutputFormat::Text => println!("{}", recipe.share_text()),
    }
    Ok(())
}
