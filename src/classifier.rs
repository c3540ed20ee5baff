use crate::features::FEATURE_COLUMNS;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque classifier capability. The scorer only ever sees this interface,
/// so the training technology behind a bundle can change without touching
/// the scoring pipeline.
///
/// `predict_proba` returns `[p_safe, p_scam]`, both in `[0, 1]` and summing
/// to 1 up to floating rounding.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &[f64]) -> u8;
    fn predict_proba(&self, row: &[f64]) -> [f64; 2];
}

/// Logistic-regression weights exported from the offline training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    fn decision(&self, row: &[f64]) -> f64 {
        let dot: f64 = self
            .weights
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum();
        dot + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, row: &[f64]) -> u8 {
        u8::from(self.decision(row) >= 0.0)
    }

    fn predict_proba(&self, row: &[f64]) -> [f64; 2] {
        let p_scam = 1.0 / (1.0 + (-self.decision(row)).exp());
        [1.0 - p_scam, p_scam]
    }
}

/// The persisted model artifact: classifier weights, the column ordering
/// the model was trained with, and the keyword-table version in effect at
/// training time. All three travel together so a version skew between
/// extractor and model is detectable at load time instead of surfacing as
/// quietly wrong scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub feature_columns: Vec<String>,
    pub keyword_set_version: String,
    pub model: LogisticModel,
}

impl ModelBundle {
    /// Load and validate a bundle. Any failure here is a deployment
    /// problem, not a data problem; the scorer must not run without a
    /// usable model.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model bundle: {}", path.display()))?;
        let bundle: ModelBundle = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse model bundle: {}", path.display()))?;
        bundle
            .validate()
            .with_context(|| format!("invalid model bundle: {}", path.display()))?;
        log::info!(
            "loaded model bundle from {} ({} features, keyword set {})",
            path.display(),
            bundle.feature_columns.len(),
            bundle.keyword_set_version
        );
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_columns.len() != self.model.weights.len() {
            bail!(
                "model bundle is inconsistent: {} feature columns but {} weights",
                self.feature_columns.len(),
                self.model.weights.len()
            );
        }
        if self.feature_columns.len() != FEATURE_COLUMNS.len() {
            bail!(
                "model bundle carries {} feature columns but the extractor produces {}; \
                 the model was trained against a different feature schema",
                self.feature_columns.len(),
                FEATURE_COLUMNS.len()
            );
        }
        for name in &self.feature_columns {
            if !FEATURE_COLUMNS.contains(&name.as_str()) {
                bail!(
                    "model bundle expects feature '{name}' that the extractor does not produce; \
                     extractor and model have drifted out of sync"
                );
            }
        }
        Ok(())
    }

    pub fn classifier(&self) -> &dyn Classifier {
        &self.model
    }
}

/// Reference bundle used by the demo mode and the scenario binary. The
/// weights come from a training run over the labeled page corpus; real
/// deployments load their own bundle file instead.
pub fn demo_bundle() -> ModelBundle {
    ModelBundle {
        feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        keyword_set_version: crate::keywords::KEYWORD_SET_VERSION.to_string(),
        model: LogisticModel {
            weights: vec![
                0.52,    // urgency_count
                0.61,    // threat_count
                0.58,    // sensitive_data_count
                0.47,    // action_phrase_count
                0.19,    // exclamation_count
                0.04,    // question_count
                2.35,    // caps_ratio
                0.74,    // multiple_exclamations
                0.28,    // all_caps_words
                -0.0009, // text_length
                -0.012,  // word_count
                0.03,    // avg_word_length
                0.92,    // has_form_pattern
                0.88,    // has_verification_pattern
                0.81,    // has_urgency_pattern
                1.54,    // requests_card_cvv
                1.21,    // requests_multiple_sensitive
            ],
            intercept: -2.9,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_bundle_is_valid() {
        assert!(demo_bundle().validate().is_ok());
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let bundle = demo_bundle();
        let row = vec![1.0; FEATURE_COLUMNS.len()];
        let proba = bundle.classifier().predict_proba(&row);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-9);
        assert!(proba[1] > 0.0 && proba[1] < 1.0);
    }

    #[test]
    fn test_prediction_matches_probability() {
        let bundle = demo_bundle();
        let zeros = vec![0.0; FEATURE_COLUMNS.len()];
        let proba = bundle.classifier().predict_proba(&zeros);
        let label = bundle.classifier().predict(&zeros);
        assert_eq!(label, u8::from(proba[1] >= 0.5));
    }

    #[test]
    fn test_weight_count_mismatch_rejected() {
        let mut bundle = demo_bundle();
        bundle.model.weights.pop();
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut bundle = demo_bundle();
        bundle.feature_columns[0] = "sentiment_score".to_string();
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn test_missing_bundle_file_is_error() {
        assert!(ModelBundle::load_from_file("/nonexistent/model.json").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let bundle = demo_bundle();
        let json = serde_json::to_string(&bundle).unwrap();
        let parsed: ModelBundle = serde_json::from_str(&json).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.feature_columns, bundle.feature_columns);
    }
}
