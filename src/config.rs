use crate::error::AppError;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub model_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("DRAFT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let model_path = env::var("DRAFT_MODEL_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let output_dir = match env::var("DRAFT_OUTPUT_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_output_dir(),
        };

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError(
                "DRAFT_DATA_DIR must not be empty".to_string(),
            ));
        }

        Ok(Config {
            data_dir,
            model_path,
            output_dir,
        })
    }
}

pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".draft_sim")
        .join("history")
}

/// Blend weights for the four recommendation components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub win_probability: f64,
    pub synergy: f64,
    pub counter: f64,
    pub meta: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            win_probability: 0.40,
            synergy: 0.30,
            counter: 0.20,
            meta: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.win_probability + self.synergy + self.counter + self.meta
    }
}

/// Tunables shared by the calculators and the recommender. Built once and
/// passed in; nothing reads these from globals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Neutral win rate that smoothing shrinks towards.
    pub prior_mean: f64,
    /// Equivalent number of games backing the prior.
    pub prior_strength: f64,
    /// Synergy/matchup rows backed by fewer games are treated as missing.
    pub min_pair_games: u64,
    /// Champion/role rows backed by fewer games fall back to global averages.
    pub min_meta_games: u64,
    /// Candidate roles below this pick rate are never recommended.
    pub candidate_pick_rate_floor: f64,
    /// Only the first N enumerated candidates are scored.
    pub candidate_limit: usize,
    /// Advantage beyond +/- this value counts as favorable/unfavorable.
    pub advantage_threshold: f64,
    pub top_n: usize,
    /// Score candidates on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            weights: ScoringWeights::default(),
            prior_mean: 0.5,
            prior_strength: 20.0,
            min_pair_games: 20,
            min_meta_games: 0,
            candidate_pick_rate_floor: 0.01,
            candidate_limit: 20,
            advantage_threshold: 0.05,
            top_n: 5,
            parallel: true,
        }
    }
}

impl ScoringConfig {
    pub fn with_weights(mut self, weights: ScoringWeights) -> Result<Self, AppError> {
        self.weights = weights;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let w = &self.weights;
        let all = [w.win_probability, w.synergy, w.counter, w.meta];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AppError::ConfigError(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }
        if (w.sum() - 1.0).abs() > 1e-9 {
            return Err(AppError::ConfigError(format!(
                "scoring weights must sum to 1.0 (got {:.4})",
                w.sum()
            )));
        }
        if !(0.0..=1.0).contains(&self.prior_mean) || self.prior_strength < 0.0 {
            return Err(AppError::ConfigError(
                "smoothing prior must be a rate in [0, 1] with non-negative strength".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.advantage_threshold) {
            return Err(AppError::ConfigError(format!(
                "advantage threshold {} must be in [0, 0.5)",
                self.advantage_threshold
            )));
        }
        if self.candidate_limit == 0 {
            return Err(AppError::ConfigError(
                "candidate limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = ScoringWeights {
            win_probability: 0.5,
            synergy: 0.5,
            counter: 0.5,
            meta: 0.0,
        };
        assert!(ScoringConfig::default().with_weights(weights).is_err());

        let weights = ScoringWeights {
            win_probability: 1.0,
            synergy: 0.0,
            counter: 0.0,
            meta: 0.0,
        };
        assert!(ScoringConfig::default().with_weights(weights).is_ok());
    }
}
