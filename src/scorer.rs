use crate::classifier::Classifier;
use crate::features::FeatureVector;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Discrete risk classification of a scam score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    Safe,
    Suspicious,
    HighRisk,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Safe => "SAFE",
            RiskBand::Suspicious => "SUSPICIOUS",
            RiskBand::HighRisk => "HIGH RISK",
        }
    }
}

/// Score cutoffs for the band mapping. These are policy constants agreed
/// with downstream consumers, not derived from the model; they can be
/// overridden from configuration when a different calibration is wanted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskThresholds {
    pub high_risk: u8,
    pub suspicious: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_risk: 70,
            suspicious: 40,
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.suspicious > self.high_risk {
            bail!(
                "risk thresholds are inverted: suspicious ({}) exceeds high_risk ({})",
                self.suspicious,
                self.high_risk
            );
        }
        if self.high_risk > 100 {
            bail!("high_risk threshold {} exceeds the score range", self.high_risk);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probability {
    pub safe: f64,
    pub scam: f64,
}

/// The complete scoring result for one block of text. Built once per call
/// and owned by the caller; serializes to JSON for machine consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub is_scam: bool,
    pub scam_score: u8,
    pub risk_band: RiskBand,
    pub probability: Probability,
    pub contributing_factors: Vec<String>,
}

/// Scores a [`FeatureVector`] through an external classifier and explains
/// the result from the vector itself, independent of whatever feature
/// importances the model may have internally.
pub struct RiskScorer {
    thresholds: RiskThresholds,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScorer {
    pub fn new() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: RiskThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn assess(
        &self,
        features: &FeatureVector,
        classifier: &dyn Classifier,
        columns: &[String],
    ) -> Result<RiskAssessment> {
        // Assemble the row in the model's column order before the
        // classifier is ever invoked; a name the extractor does not produce
        // means the extractor and the trained model have drifted apart.
        let mut row = Vec::with_capacity(columns.len());
        for name in columns {
            match features.value(name) {
                Some(value) => row.push(value),
                None => bail!(
                    "feature column '{name}' is not produced by the extractor; \
                     extractor and model are out of sync"
                ),
            }
        }

        let label = classifier.predict(&row);
        let proba = classifier.predict_proba(&row);
        let scam_score = (proba[1] * 100.0).round() as u8;
        let risk_band = self.band_for(scam_score);

        log::debug!(
            "scored text: label={label} score={scam_score} band={}",
            risk_band.label()
        );

        Ok(RiskAssessment {
            is_scam: label == 1,
            scam_score,
            risk_band,
            probability: Probability {
                safe: round2(proba[0] * 100.0),
                scam: round2(proba[1] * 100.0),
            },
            contributing_factors: contributing_factors(features),
        })
    }

    /// Closed thresholds, checked in descending order, first match wins.
    pub fn band_for(&self, scam_score: u8) -> RiskBand {
        if scam_score >= self.thresholds.high_risk {
            RiskBand::HighRisk
        } else if scam_score >= self.thresholds.suspicious {
            RiskBand::Suspicious
        } else {
            RiskBand::Safe
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Red-flag explanations derived directly from the feature vector. The
/// guard order is fixed; an empty result is the valid "no major red flags"
/// outcome for benign text.
fn contributing_factors(features: &FeatureVector) -> Vec<String> {
    let mut factors = Vec::new();

    if features.urgency_count > 0 {
        factors.push(format!("Contains {} urgency keywords", features.urgency_count));
    }
    if features.threat_count > 0 {
        factors.push(format!("Contains {} threat words", features.threat_count));
    }
    if features.sensitive_data_count > 0 {
        factors.push(format!(
            "Requests {} types of sensitive data",
            features.sensitive_data_count
        ));
    }
    if features.requests_card_cvv == 1 {
        factors.push("Requests both card number AND CVV".to_string());
    }
    if features.exclamation_count > 2 {
        factors.push(format!(
            "Excessive exclamation marks ({})",
            features.exclamation_count
        ));
    }
    if features.caps_ratio > 0.2 {
        factors.push(format!(
            "High capitalization ratio ({:.1}%)",
            features.caps_ratio * 100.0
        ));
    }
    if features.has_urgency_pattern == 1 {
        factors.push("Uses urgent action language pattern".to_string());
    }
    if features.has_verification_pattern == 1 {
        factors.push("Requests account/identity verification".to_string());
    }

    factors
}
