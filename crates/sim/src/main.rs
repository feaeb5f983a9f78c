//! Headless arena: runs boss encounters against a scripted party and tunes
//! difficulty across battles.
//!
//! Run with: `cargo run -p combat-sim --bin arena -- --battles 20 --adaptive`
mod arena;
mod battlefield;
mod party;
mod resolver;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use combat_content::{Encounter, EncounterLoader, PresetLoader};
use combat_core::{AiConfig, Preset};
use combat_runtime::{BalanceRepository, Balancer, BalancerConfig, FileBalanceRepository};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use arena::Arena;

/// Run NPC combat simulations and balance difficulty between battles
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(about = "Run boss encounters against a scripted party", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of battles to run
    #[arg(long, default_value_t = 10)]
    battles: u32,

    /// Base seed for deterministic runs (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Boss configuration: a preset name (story, normal, hard, nightmare) or a TOML file
    #[arg(long, value_name = "PRESET|FILE")]
    preset: Option<String>,

    /// Encounter RON file (defaults to the bundled Crypt Lord)
    #[arg(long, value_name = "FILE")]
    encounter: Option<PathBuf>,

    /// Directory to load balance profiles from and save them to
    #[arg(long, value_name = "DIR", env = "ARENA_PROFILES_DIR")]
    profiles: Option<PathBuf>,

    /// Player win rate the balancer aims for
    #[arg(long, default_value_t = 0.6)]
    target_win_rate: f32,

    /// Generate each battle's boss configuration from the current difficulty
    #[arg(long)]
    adaptive: bool,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);

    let encounter = match &cli.encounter {
        Some(path) => EncounterLoader::load(path)?,
        None => EncounterLoader::bundled()?,
    };
    let base_config = boss_config(&encounter, cli.preset.as_deref())?;

    let mut balancer = Balancer::new(BalancerConfig {
        target_win_rate: cli.target_win_rate,
        ..BalancerConfig::default()
    });
    let repo = cli
        .profiles
        .as_deref()
        .map(FileBalanceRepository::new)
        .transpose()
        .context("Failed to open profile directory")?;
    if let Some(repo) = &repo {
        let loaded = balancer.load_from(repo)?;
        tracing::info!("Loaded {} balance profiles from {}", loaded, repo.base_dir().display());
    }

    tracing::info!(
        "Running {} battles of {} (seed={}, adaptive={})",
        cli.battles,
        encounter.name,
        seed,
        cli.adaptive
    );

    let mut player_wins = 0;
    for battle in 0..u64::from(cli.battles) {
        let config = if cli.adaptive {
            balancer.config_for(&encounter.name)
        } else {
            base_config.clone()
        };

        let outcome = Arena::new(&encounter, config, seed).run(battle)?;
        player_wins += u32::from(outcome.report.player_won);
        if outcome.summoned > 0 {
            tracing::debug!("Battle {} summoned {} skeletons", battle + 1, outcome.summoned);
        }

        let profile = balancer.record_battle(&encounter.name, &outcome.report);
        if let Some(repo) = &repo {
            repo.save(profile)?;
        }
    }

    print_summary(&balancer, &encounter, cli.battles, player_wins);
    Ok(())
}

/// Resolves `--preset` against the encounter's own configuration.
fn boss_config(encounter: &Encounter, preset: Option<&str>) -> Result<AiConfig> {
    let Some(preset) = preset else {
        return Ok(encounter.boss_config());
    };
    if let Ok(named) = preset.parse::<Preset>() {
        return Ok(named.config());
    }
    PresetLoader::load(Path::new(preset))
}

fn print_summary(balancer: &Balancer, encounter: &Encounter, battles: u32, player_wins: u32) {
    println!("\n════════════════════════════════════════════════════════");
    println!("  {} - {} battles", encounter.name, battles);
    println!("════════════════════════════════════════════════════════");
    println!("  Party wins:  {}", player_wins);
    println!("  Boss wins:   {}", battles - player_wins);
    if let Some(profile) = balancer.profile(&encounter.name) {
        println!("  Lifetime:    {} battles", profile.total_battles);
        println!("  Win rate:    {:.2}", profile.player_win_rate());
        println!("  Performance: {:.1}", profile.average_performance);
        println!("  Difficulty:  {:.1}", profile.difficulty);
    }
}

/// Setup logging to stderr, filtered by `RUST_LOG` (default `info`).
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
