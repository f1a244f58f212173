use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::draft::{DraftState, Side};
use crate::error::{AppError, OracleError};
use crate::features::schema::slot;
use crate::features::{FeatureEncoder, FeatureVector, F, FEATURE_SCHEMA_ID};

/// Models predict the win probability of this side.
pub const REFERENCE_SIDE: Side = Side::Blue;

pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// A trained (or hand-built) win-probability model.
pub trait WinProbabilityOracle: Send + Sync {
    fn name(&self) -> &str;

    /// Probability that [`REFERENCE_SIDE`] wins.
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError>;
}

/// Converts a reference-side probability into `side`'s probability.
pub fn side_probability(reference: f64, side: Side) -> f64 {
    if side == REFERENCE_SIDE {
        reference
    } else {
        1.0 - reference
    }
}

/// Runs the oracle, substituting the neutral value for errors and for
/// outputs outside [0, 1]. The flag is true when the substitute was used.
pub fn predict_or_neutral(oracle: &dyn WinProbabilityOracle, features: &FeatureVector) -> (f64, bool) {
    match oracle.predict(features) {
        Ok(p) if p.is_finite() && (0.0..=1.0).contains(&p) => (p, false),
        Ok(p) => {
            warn!(oracle = oracle.name(), value = p, "prediction out of range, using neutral");
            (NEUTRAL_PROBABILITY, true)
        }
        Err(e) => {
            warn!(oracle = oracle.name(), error = %e, "prediction failed, using neutral");
            (NEUTRAL_PROBABILITY, true)
        }
    }
}

/// Win probability of `side` for the draft as it stands.
pub fn predict_current(
    oracle: &dyn WinProbabilityOracle,
    encoder: &FeatureEncoder<'_>,
    state: &DraftState,
    side: Side,
) -> f64 {
    let features = encoder.extract(state, None);
    let (p, _) = predict_or_neutral(oracle, &features);
    side_probability(p, side)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    name: String,
    #[serde(default)]
    schema_id: Option<u32>,
    bias: f64,
    weights: Vec<f64>,
}

/// Logistic regression over the full feature vector, loaded from JSON:
/// `{"name": "...", "bias": 0.0, "weights": [129 numbers]}`.
#[derive(Debug, Clone)]
pub struct LogisticOracle {
    name: String,
    bias: f64,
    weights: Vec<f64>,
}

impl LogisticOracle {
    pub fn new(name: impl Into<String>, bias: f64, weights: Vec<f64>) -> Result<Self, AppError> {
        if weights.len() != F {
            return Err(AppError::ModelError(
                OracleError::WidthMismatch {
                    expected: F,
                    actual: weights.len(),
                }
                .to_string(),
            ));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(AppError::ModelError(OracleError::NonFinite.to_string()));
        }
        Ok(LogisticOracle {
            name: name.into(),
            bias,
            weights,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|e| AppError::JsonError(e.to_string()))?;
        if let Some(id) = artifact.schema_id {
            if id != FEATURE_SCHEMA_ID {
                return Err(AppError::ModelError(format!(
                    "model was trained on feature schema {id}, this build encodes schema {FEATURE_SCHEMA_ID}"
                )));
            }
        }
        LogisticOracle::new(artifact.name, artifact.bias, artifact.weights)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let oracle = LogisticOracle::from_json(&json)?;
        info!(model = %oracle.name, path = %path.display(), "loaded win-probability model");
        Ok(oracle)
    }
}

impl WinProbabilityOracle for LogisticOracle {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        let x = features.as_slice();
        if x.len() != self.weights.len() {
            return Err(OracleError::WidthMismatch {
                expected: self.weights.len(),
                actual: x.len(),
            });
        }
        let z = self.bias
            + self
                .weights
                .iter()
                .zip(x)
                .map(|(w, &v)| w * v as f64)
                .sum::<f64>();
        let p = sigmoid(z);
        if p.is_finite() {
            Ok(p)
        } else {
            Err(OracleError::NonFinite)
        }
    }
}

/// Model used when no artifact is configured: a logistic blend of the
/// synergy difference, mean matchup advantage and team win-rate difference.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicOracle {
    pub synergy_weight: f64,
    pub matchup_weight: f64,
    pub meta_weight: f64,
}

impl Default for HeuristicOracle {
    fn default() -> Self {
        HeuristicOracle {
            synergy_weight: 6.0,
            matchup_weight: 6.0,
            meta_weight: 4.0,
        }
    }
}

impl WinProbabilityOracle for HeuristicOracle {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        let at = |i: usize| {
            features
                .get(i)
                .map(f64::from)
                .ok_or(OracleError::WidthMismatch {
                    expected: F,
                    actual: features.len(),
                })
        };
        let z = self.synergy_weight * at(slot::SYNERGY_DIFF)?
            + self.matchup_weight * at(slot::MATCHUP_MEAN)?
            + self.meta_weight * (at(slot::BLUE_AVG_WIN)? - at(slot::RED_AVG_WIN)?);
        let p = sigmoid(z);
        if p.is_finite() {
            Ok(p)
        } else {
            Err(OracleError::NonFinite)
        }
    }
}

/// Loads the model at `path`, or the heuristic model when none is given.
pub fn load_oracle(path: Option<&Path>) -> Result<Box<dyn WinProbabilityOracle>, AppError> {
    match path {
        Some(path) => Ok(Box::new(LogisticOracle::load(path)?)),
        None => {
            info!("no model configured, using heuristic win-probability model");
            Ok(Box::new(HeuristicOracle::default()))
        }
    }
}
