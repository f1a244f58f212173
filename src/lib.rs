//! Champion draft simulator: a turn-order state machine for 5v5 bans and
//! picks, a fixed-width feature encoder, and a recommender that blends a
//! win-probability model with synergy, counter and meta statistics.

pub mod analysis;
pub mod config;
pub mod controller;
pub mod data;
pub mod display;
pub mod draft;
pub mod error;
pub mod features;
pub mod history;
pub mod input;
pub mod logging;
pub mod oracle;

pub use analysis::{Recommendation, Recommender};
pub use config::{Config, ScoringConfig, ScoringWeights};
pub use controller::{AiAction, GameController, GameMode};
pub use data::DraftData;
pub use draft::{DraftEngine, DraftState, Phase, Role, Side};
pub use error::{AppError, DataIntegrityError, InvalidAction, OracleError};
pub use features::{FeatureEncoder, FeatureVector};
pub use oracle::{load_oracle, WinProbabilityOracle};
