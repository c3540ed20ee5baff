use serde::{Deserialize, Serialize};

/// Canonical feature ordering. This is the column contract shared with the
/// trained model: the names and their order are fixed at design time, and a
/// model bundle whose columns disagree with this list is unusable.
pub const FEATURE_COLUMNS: [&str; 17] = [
    "urgency_count",
    "threat_count",
    "sensitive_data_count",
    "action_phrase_count",
    "exclamation_count",
    "question_count",
    "caps_ratio",
    "multiple_exclamations",
    "all_caps_words",
    "text_length",
    "word_count",
    "avg_word_length",
    "has_form_pattern",
    "has_verification_pattern",
    "has_urgency_pattern",
    "requests_card_cvv",
    "requests_multiple_sensitive",
];

/// One extraction result: counts, statistics and indicator flags for a
/// single block of page text. Built fresh per input and never mutated.
///
/// Counts are non-negative integers, ratios lie in `[0, 1]` and indicator
/// fields are `0` or `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub urgency_count: u32,
    pub threat_count: u32,
    pub sensitive_data_count: u32,
    pub action_phrase_count: u32,
    pub exclamation_count: u32,
    pub question_count: u32,
    pub caps_ratio: f64,
    pub multiple_exclamations: u8,
    pub all_caps_words: u32,
    pub text_length: usize,
    pub word_count: usize,
    pub avg_word_length: f64,
    pub has_form_pattern: u8,
    pub has_verification_pattern: u8,
    pub has_urgency_pattern: u8,
    pub requests_card_cvv: u8,
    pub requests_multiple_sensitive: u8,
}

impl FeatureVector {
    /// Look up a feature by column name. Returns `None` for names outside
    /// the schema; the scorer turns that into a schema-mismatch fault.
    pub fn value(&self, name: &str) -> Option<f64> {
        let value = match name {
            "urgency_count" => f64::from(self.urgency_count),
            "threat_count" => f64::from(self.threat_count),
            "sensitive_data_count" => f64::from(self.sensitive_data_count),
            "action_phrase_count" => f64::from(self.action_phrase_count),
            "exclamation_count" => f64::from(self.exclamation_count),
            "question_count" => f64::from(self.question_count),
            "caps_ratio" => self.caps_ratio,
            "multiple_exclamations" => f64::from(self.multiple_exclamations),
            "all_caps_words" => f64::from(self.all_caps_words),
            "text_length" => self.text_length as f64,
            "word_count" => self.word_count as f64,
            "avg_word_length" => self.avg_word_length,
            "has_form_pattern" => f64::from(self.has_form_pattern),
            "has_verification_pattern" => f64::from(self.has_verification_pattern),
            "has_urgency_pattern" => f64::from(self.has_urgency_pattern),
            "requests_card_cvv" => f64::from(self.requests_card_cvv),
            "requests_multiple_sensitive" => f64::from(self.requests_multiple_sensitive),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_17_columns() {
        assert_eq!(FEATURE_COLUMNS.len(), 17);
    }

    #[test]
    fn test_every_column_is_resolvable() {
        let features = FeatureVector {
            urgency_count: 1,
            threat_count: 2,
            sensitive_data_count: 3,
            action_phrase_count: 4,
            exclamation_count: 5,
            question_count: 6,
            caps_ratio: 0.5,
            multiple_exclamations: 1,
            all_caps_words: 7,
            text_length: 100,
            word_count: 20,
            avg_word_length: 4.5,
            has_form_pattern: 1,
            has_verification_pattern: 0,
            has_urgency_pattern: 1,
            requests_card_cvv: 0,
            requests_multiple_sensitive: 1,
        };

        for name in FEATURE_COLUMNS {
            assert!(features.value(name).is_some(), "unresolvable column: {name}");
        }
        assert_eq!(features.value("urgency_count"), Some(1.0));
        assert_eq!(features.value("caps_ratio"), Some(0.5));
    }

    #[test]
    fn test_unknown_column_is_none() {
        let features = FeatureVector {
            urgency_count: 0,
            threat_count: 0,
            sensitive_data_count: 0,
            action_phrase_count: 0,
            exclamation_count: 0,
            question_count: 0,
            caps_ratio: 0.0,
            multiple_exclamations: 0,
            all_caps_words: 0,
            text_length: 0,
            word_count: 0,
            avg_word_length: 0.0,
            has_form_pattern: 0,
            has_verification_pattern: 0,
            has_urgency_pattern: 0,
            requests_card_cvv: 0,
            requests_multiple_sensitive: 0,
        };
        assert_eq!(features.value("tfidf_score"), None);
    }
}
