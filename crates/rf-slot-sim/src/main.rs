//! rf-slot-sim: spin, verify and simulate rf-slot-math games
//!
//! Usage:
//!   rf-slot-sim spin <client> <server> <nonce>    - Play one spin (or a full round)
//!   rf-slot-sim verify <client> <server> <nonce>  - Recompute and check a grid
//!   rf-slot-sim simulate --spins 1000000          - Base game RTP / hit frequency
//!   rf-slot-sim features free_spins               - Feature rounds in isolation
//!   rf-slot-sim info                              - Game info for hosts
//!   rf-slot-sim validate                          - Configuration checks

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use rf_slot_math::{
    AdapterConfig, FeatureType, GameConfig, Grid, HostAdapter, MathAdapter, Selections,
    Simulator, SpinEngine, generate, server_seed_hash, verify_grid,
};

#[derive(Parser)]
#[command(name = "rf-slot-sim", about = "Provably fair slot math: spin, verify, simulate")]
struct Cli {
    /// Game configuration (.json, .yaml, .yml); defaults to the reference game
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one spin
    Spin {
        client_seed: String,
        server_seed: String,
        nonce: u64,
        /// Bet amount
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Also play triggered feature rounds
        #[arg(long)]
        round: bool,
        /// Player selections as a JSON object, echoed back
        #[arg(long)]
        selections: Option<String>,
    },
    /// Recompute a grid from revealed seeds
    Verify {
        client_seed: String,
        server_seed: String,
        nonce: u64,
        /// Claimed grid as JSON (array of rows)
        #[arg(long)]
        grid: Option<String>,
        /// Server seed hash published before play
        #[arg(long)]
        commitment: Option<String>,
    },
    /// Run a base game simulation
    Simulate {
        #[arg(short = 'n', long, default_value_t = 100_000)]
        spins: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Worker threads (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Spins per work unit
        #[arg(long, default_value_t = rf_slot_math::DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,
        /// Play and pay triggered feature rounds
        #[arg(long)]
        features: bool,
    },
    /// Play feature rounds in isolation (free_spins, bonus_round)
    Features {
        feature: String,
        #[arg(short, long, default_value_t = 1_000)]
        rounds: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
    },
    /// Print game info
    Info {
        /// Maximum win multiplier reported to hosts
        #[arg(long, default_value_t = 5000.0)]
        max_win: f64,
    },
    /// Validate the configuration
    Validate {
        /// RTP the host expects
        #[arg(long)]
        expected_rtp: Option<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Arc::new(load_config(cli.config.as_ref())?);
    log::info!("Loaded game '{}'", config.name);
    let engine = SpinEngine::new(Arc::clone(&config));

    match cli.command {
        Commands::Spin {
            client_seed,
            server_seed,
            nonce,
            bet,
            round,
            selections,
        } => {
            let selections = selections
                .map(|s| serde_json::from_str::<Selections>(&s))
                .transpose()
                .context("Failed to parse --selections")?;
            if round {
                print_json(&engine.play_round(&client_seed, &server_seed, nonce, bet, selections))
            } else {
                print_json(&engine.spin(&client_seed, &server_seed, nonce, bet, selections))
            }
        }
        Commands::Verify {
            client_seed,
            server_seed,
            nonce,
            grid,
            commitment,
        } => verify(&config, &client_seed, &server_seed, nonce, grid, commitment),
        Commands::Simulate {
            spins,
            bet,
            threads,
            chunk_size,
            features,
        } => {
            let report = Simulator::new(engine)
                .with_threads(threads)
                .with_chunk_size(chunk_size)
                .with_features(features)
                .simulate(spins, bet);
            print_json(&report)
        }
        Commands::Features {
            feature,
            rounds,
            bet,
        } => {
            let feature = parse_feature(&feature)?;
            print_json(&Simulator::new(engine).simulate_features(feature, rounds, bet))
        }
        Commands::Info { max_win } => {
            let adapter = HostAdapter::new(
                engine,
                AdapterConfig {
                    game_name: config.name.clone(),
                    max_win_multiplier: max_win,
                    ..AdapterConfig::default()
                },
            );
            print_json(&adapter.game_info())
        }
        Commands::Validate { expected_rtp } => {
            let adapter_config = AdapterConfig {
                game_name: config.name.clone(),
                expected_rtp,
                ..AdapterConfig::default()
            };
            let adapter = HostAdapter::new(engine, adapter_config.clone());
            let report = adapter.validate_configuration(&adapter_config);
            print_json(&report)?;
            if !report.valid {
                bail!("Configuration has {} defect(s)", report.defects().count());
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GameConfig::reference()),
    }
}

fn parse_feature(name: &str) -> Result<FeatureType> {
    FeatureType::ALL
        .into_iter()
        .find(|f| f.as_str() == name)
        .with_context(|| format!("Unknown feature '{name}' (expected free_spins or bonus_round)"))
}

#[derive(Serialize)]
struct VerifyReport {
    server_seed_hash: String,
    commitment_matches: Option<bool>,
    grid: Grid,
    grid_matches: Option<bool>,
}

fn verify(
    config: &GameConfig,
    client_seed: &str,
    server_seed: &str,
    nonce: u64,
    claimed: Option<String>,
    commitment: Option<String>,
) -> Result<()> {
    let generated = generate(
        client_seed,
        server_seed,
        nonce,
        &config.weights,
        config.grid.rows,
        config.grid.cols,
        &config.fallback_symbol,
    );
    let hash = server_seed_hash(server_seed);

    let grid_matches = claimed
        .map(|json| serde_json::from_str::<Grid>(&json).context("Failed to parse --grid"))
        .transpose()?
        .map(|claimed| {
            verify_grid(
                client_seed,
                server_seed,
                nonce,
                &config.weights,
                config.grid.rows,
                config.grid.cols,
                &config.fallback_symbol,
                &claimed,
            )
        });

    let report = VerifyReport {
        commitment_matches: commitment.map(|c| c.eq_ignore_ascii_case(&hash)),
        server_seed_hash: hash,
        grid: generated.grid,
        grid_matches,
    };
    print_json(&report)?;

    if report.commitment_matches == Some(false) || report.grid_matches == Some(false) {
        bail!("Verification failed");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
