//! Learned evaluation backed by an external win-probability model.
//!
//! Training happens elsewhere; this module only consumes the result. The
//! bundled [`LogisticModel`] reads a JSON file of the form
//! `{"weights": [38 numbers], "bias": 0.1}`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::board::BoardState;
use crate::evaluator::{terminal_score, Evaluator};
use crate::features::{extract_features, NUM_FEATURES};
use crate::types::Color;
use crate::{Result, SantoriniError};

/// A model mapping a feature vector to the probability that the
/// perspective color wins.
pub trait WinProbabilityModel: Send + Sync {
    /// Probability in `[0, 1]`.
    fn predict_win_probability(&self, features: &[f64]) -> f64;
}

/// Logistic regression over the standard feature vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticModel {
    /// Create a model, checking the weight count.
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self> {
        let model = Self { weights, bias };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.len() != NUM_FEATURES {
            return Err(SantoriniError::InvalidModel(format!(
                "expected {} weights, found {}",
                NUM_FEATURES,
                self.weights.len()
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(SantoriniError::InvalidModel(
                "weights must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl WinProbabilityModel for LogisticModel {
    fn predict_win_probability(&self, features: &[f64]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        1.0 / (1.0 + (-z).exp())
    }
}

/// Evaluator scoring positions as `2p - 1` where `p` is the model's win
/// probability for the perspective color.
pub struct LearnedEvaluator<M: WinProbabilityModel> {
    model: M,
}

impl<M: WinProbabilityModel> LearnedEvaluator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: WinProbabilityModel> Evaluator for LearnedEvaluator<M> {
    fn score(&self, state: &BoardState, perspective: Color) -> f64 {
        if let Some(score) = terminal_score(state, perspective) {
            return score;
        }
        let features = extract_features(state, perspective);
        let p = self.model.predict_win_probability(&features).clamp(0.0, 1.0);
        2.0 * p - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::WIN_SCORE;

    fn start() -> BoardState {
        BoardState::from_notation("0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4")
            .unwrap()
    }

    #[test]
    fn test_zero_model_is_even() {
        let model = LogisticModel::new(vec![0.0; NUM_FEATURES], 0.0).unwrap();
        let eval = LearnedEvaluator::new(model);
        assert!(eval.score(&start(), Color::White).abs() < 1e-12);
    }

    #[test]
    fn test_bias_shifts_score() {
        let model = LogisticModel::new(vec![0.0; NUM_FEATURES], 2.0).unwrap();
        let eval = LearnedEvaluator::new(model);
        let score = eval.score(&start(), Color::White);
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let err = LogisticModel::new(vec![0.0; 3], 0.0).unwrap_err();
        assert!(matches!(err, SantoriniError::InvalidModel(_)));
    }

    #[test]
    fn test_from_json() {
        let json = format!(
            "{{\"weights\": {:?}, \"bias\": 0.5}}",
            vec![0.1; NUM_FEATURES]
        );
        let model = LogisticModel::from_json(&json).unwrap();
        assert_eq!(model.weights.len(), NUM_FEATURES);
        assert!(LogisticModel::from_json("{\"weights\": [1.0]}").is_err());
    }

    #[test]
    fn test_terminal_still_uses_sentinel() {
        let state = BoardState::from_notation(
            "3W0.0.0.0./0W0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0. g 11",
        )
        .unwrap();
        let model = LogisticModel::new(vec![0.0; NUM_FEATURES], 0.0).unwrap();
        let eval = LearnedEvaluator::new(model);
        assert_eq!(eval.score(&state, Color::Gray), -WIN_SCORE);
    }
}
