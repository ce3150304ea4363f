//! # rf-slot-math: Provably fair slot math core
//!
//! Computes slot spin outcomes deterministically from a seed pair and a
//! nonce, scores them against paylines and scatter rules, and measures
//! long-run behaviour with a parallel simulator.
//!
//! ## Features
//!
//! - **Outcome Generator**: per-cell SHA-256 draws, verifiable by anyone holding the seeds
//! - **Win Evaluator**: left-to-right line wins with wild substitution, paying scatter
//! - **Trigger Detector**: free spins and bonus round triggers by symbol count
//! - **Feature Rounds**: symbol transformation, wild injection / expansion, retriggers
//! - **Simulator**: RTP, hit frequency and win distribution over millions of spins
//!
//! ## Architecture
//!
//! ```text
//! GameConfig (read-only, Arc-shared)
//!     │
//!     ├── SymbolCatalog / Paytable / Paylines / SymbolWeights
//!     └── TriggerRules / FreeSpinsConfig / BonusRoundConfig
//!           │
//!           v
//! SpinEngine::spin
//!     generate → evaluate_lines + evaluate_scatter → detect_triggers
//!           │
//!           ├── play_round → FeatureRound (free spins, bonus)
//!           ├── HostAdapter (MathAdapter for hosting platforms)
//!           └── Simulator (rayon chunks → SimulationReport)
//! ```

pub mod adapter;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod features;
pub mod generator;
pub mod grid;
pub mod paytable;
pub mod simulator;
pub mod symbols;
pub mod triggers;
pub mod validation;

pub use adapter::*;
pub use config::*;
pub use engine::*;
pub use evaluator::*;
pub use features::*;
pub use generator::*;
pub use grid::*;
pub use paytable::*;
pub use simulator::*;
pub use symbols::*;
pub use triggers::*;
pub use validation::*;
