use crate::features::FeatureVector;
use crate::keywords::KeywordSets;
use anyhow::{Context, Result};
use regex::Regex;

/// Turns raw page text into a [`FeatureVector`].
///
/// Construction compiles the suspicious-pattern regexes and validates the
/// keyword tables; both are fatal if they fail, since a partially built
/// extractor would emit vectors with silently different semantics. After
/// construction every call is pure and total: `extract` never fails, for
/// any input including the empty string.
pub struct ScamFeatureExtractor {
    keywords: KeywordSets,
    form_pattern: Regex,
    verification_pattern: Regex,
    urgency_pattern: Regex,
    word_tokenizer: Option<Regex>,
}

impl ScamFeatureExtractor {
    pub fn new() -> Result<Self> {
        Self::with_keywords(KeywordSets::default())
    }

    pub fn with_keywords(keywords: KeywordSets) -> Result<Self> {
        keywords
            .validate()
            .context("feature extractor rejected keyword tables")?;

        // Request verb followed by a data noun, optionally through "your".
        let form_pattern =
            Regex::new(r"(enter|provide|submit|input)\s+(your\s+)?(detail|information|data|credential)")
                .context("failed to compile form-request pattern")?;
        let verification_pattern =
            Regex::new(r"(verify|confirm|validate|update)\s+(your\s+)?(account|identity|kyc|detail)")
                .context("failed to compile verification pattern")?;
        let urgency_pattern =
            Regex::new(r"(urgent|immediate|now|today)\s+(action|required|verify|update|confirm)")
                .context("failed to compile urgency pattern")?;

        // Word-level tokenizer: runs of word characters, plus lone
        // punctuation so "account." splits into two tokens. If it fails to
        // compile we degrade to whitespace splitting rather than refuse to
        // extract; only the word_count and avg_word_length features shift.
        let word_tokenizer = match Regex::new(r"\w+|[^\w\s]") {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("word tokenizer unavailable, using whitespace splitting: {e}");
                None
            }
        };

        Ok(Self {
            keywords,
            form_pattern,
            verification_pattern,
            urgency_pattern,
            word_tokenizer,
        })
    }

    pub fn keywords(&self) -> &KeywordSets {
        &self.keywords
    }

    pub fn extract(&self, text: &str) -> FeatureVector {
        let lower = text.to_lowercase();
        let tokens = self.tokenize(&lower);

        let urgency_count = count_category(&lower, &self.keywords.urgency);
        let threat_count = count_category(&lower, &self.keywords.threat);
        let sensitive_data_count = count_category(&lower, &self.keywords.sensitive_data);
        let action_phrase_count = count_category(&lower, &self.keywords.action_phrases);

        let text_length = text.chars().count();
        let uppercase_chars = text.chars().filter(|c| c.is_uppercase()).count();
        let caps_ratio = if text_length > 0 {
            uppercase_chars as f64 / text_length as f64
        } else {
            0.0
        };

        let all_caps_words = text
            .split_whitespace()
            .filter(|word| is_all_caps(word) && word.chars().count() > 1)
            .count() as u32;

        let word_count = tokens.len();
        let avg_word_length = if tokens.is_empty() {
            0.0
        } else {
            let total: usize = tokens.iter().map(|t| t.chars().count()).sum();
            total as f64 / tokens.len() as f64
        };

        let requests_card_cvv =
            u8::from(lower.contains("card") && (lower.contains("cvv") || lower.contains("cvc")));

        FeatureVector {
            urgency_count,
            threat_count,
            sensitive_data_count,
            action_phrase_count,
            exclamation_count: text.chars().filter(|&c| c == '!').count() as u32,
            question_count: text.chars().filter(|&c| c == '?').count() as u32,
            caps_ratio,
            multiple_exclamations: u8::from(text.contains("!!")),
            all_caps_words,
            text_length,
            word_count,
            avg_word_length,
            has_form_pattern: u8::from(self.form_pattern.is_match(&lower)),
            has_verification_pattern: u8::from(self.verification_pattern.is_match(&lower)),
            has_urgency_pattern: u8::from(self.urgency_pattern.is_match(&lower)),
            requests_card_cvv,
            requests_multiple_sensitive: u8::from(sensitive_data_count >= 3),
        }
    }

    /// Two-branch tokenization: the word tokenizer when it is available,
    /// plain whitespace splitting otherwise. Both branches are
    /// deterministic and neither can fail at call time.
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match &self.word_tokenizer {
            Some(re) => re.find_iter(text).map(|m| m.as_str()).collect(),
            None => text.split_whitespace().collect(),
        }
    }
}

/// Substring-occurrence counting, deliberately not word-boundary aware:
/// scam pages stuff and concatenate keywords, and counting every occurrence
/// keeps those visible to the model. The model was trained against these
/// counting semantics, so switching to whole-word matching would require
/// retraining.
fn count_category(lower_text: &str, phrases: &[String]) -> u32 {
    phrases
        .iter()
        .map(|phrase| lower_text.matches(phrase.as_str()).count() as u32)
        .sum()
}

/// A token counts as ALL CAPS when it has at least one uppercase letter and
/// no lowercase letters, so "ACT!" qualifies but "I" is filtered out by the
/// caller's length check and "Act" never qualifies.
fn is_all_caps(word: &str) -> bool {
    word.chars().any(|c| c.is_uppercase()) && !word.chars().any(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COLUMNS;

    fn extractor() -> ScamFeatureExtractor {
        ScamFeatureExtractor::new().unwrap()
    }

    #[test]
    fn test_empty_text_is_all_zero() {
        let features = extractor().extract("");
        assert_eq!(features.text_length, 0);
        assert_eq!(features.word_count, 0);
        assert_eq!(features.caps_ratio, 0.0);
        assert_eq!(features.avg_word_length, 0.0);
        assert_eq!(features.urgency_count, 0);
        assert_eq!(features.threat_count, 0);
        assert_eq!(features.sensitive_data_count, 0);
        assert_eq!(features.action_phrase_count, 0);
        assert_eq!(features.multiple_exclamations, 0);
        assert_eq!(features.requests_card_cvv, 0);
        assert_eq!(features.requests_multiple_sensitive, 0);
        for name in FEATURE_COLUMNS {
            assert_eq!(features.value(name), Some(0.0), "non-zero column: {name}");
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let ex = extractor();
        let text = "URGENT! Verify your account now!!";
        assert_eq!(ex.extract(text), ex.extract(text));
    }

    #[test]
    fn test_urgency_count_grows_with_appended_keyword() {
        let ex = extractor();
        let base = "please review the attached invoice";
        let before = ex.extract(base).urgency_count;
        let after = ex.extract(&format!("{base} urgent")).urgency_count;
        assert!(after >= before + 1);
    }

    #[test]
    fn test_keyword_counting_is_substring_based() {
        // "now" occurs inside "knowledge"; substring counting picks it up
        // on purpose.
        let features = extractor().extract("knowledge base");
        assert_eq!(features.urgency_count, 1);
    }

    #[test]
    fn test_repeated_phrase_counts_every_occurrence() {
        let features = extractor().extract("urgent urgent urgent");
        assert_eq!(features.urgency_count, 3);
    }

    #[test]
    fn test_case_insensitive_keyword_matching() {
        let features = extractor().extract("Your account has been SUSPENDED");
        assert_eq!(features.threat_count, 1);
    }

    #[test]
    fn test_punctuation_counts_use_original_text() {
        let features = extractor().extract("Really?! Are you sure?? Yes!!!");
        assert_eq!(features.exclamation_count, 4);
        assert_eq!(features.question_count, 3);
        assert_eq!(features.multiple_exclamations, 1);
    }

    #[test]
    fn test_caps_ratio() {
        // 4 uppercase characters out of 8 total.
        let features = extractor().extract("ABCDabcd");
        assert!((features.caps_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_all_caps_words_excludes_single_letters() {
        let features = extractor().extract("I am SHOUTING at YOU");
        assert_eq!(features.all_caps_words, 2);
    }

    #[test]
    fn test_text_length_counts_chars_not_bytes() {
        let features = extractor().extract("héllo");
        assert_eq!(features.text_length, 5);
    }

    #[test]
    fn test_form_pattern() {
        let ex = extractor();
        assert_eq!(ex.extract("please enter your details below").has_form_pattern, 1);
        assert_eq!(ex.extract("submit information here").has_form_pattern, 1);
        assert_eq!(ex.extract("we never ask for credentials").has_form_pattern, 0);
    }

    #[test]
    fn test_verification_pattern() {
        let ex = extractor();
        assert_eq!(ex.extract("verify your account today").has_verification_pattern, 1);
        assert_eq!(ex.extract("update kyc to continue").has_verification_pattern, 1);
        assert_eq!(ex.extract("your order has shipped").has_verification_pattern, 0);
    }

    #[test]
    fn test_urgency_pattern_requires_adjacent_pair() {
        let ex = extractor();
        assert_eq!(ex.extract("urgent action needed").has_urgency_pattern, 1);
        assert_eq!(ex.extract("immediate verify required").has_urgency_pattern, 1);
        assert_eq!(ex.extract("urgent care clinic").has_urgency_pattern, 0);
    }

    #[test]
    fn test_card_cvv_conjunction_any_distance() {
        let ex = extractor();
        let far_apart = format!("card {} cvv", "x ".repeat(500));
        assert_eq!(ex.extract(&far_apart).requests_card_cvv, 1);
        assert_eq!(ex.extract("enter your card and cvc code").requests_card_cvv, 1);
        assert_eq!(ex.extract("enter your card number").requests_card_cvv, 0);
        assert_eq!(ex.extract("cvv required").requests_card_cvv, 0);
    }

    #[test]
    fn test_multiple_sensitive_threshold() {
        let ex = extractor();
        let features = ex.extract("enter your pin, password and otp");
        assert_eq!(features.sensitive_data_count, 3);
        assert_eq!(features.requests_multiple_sensitive, 1);

        let features = ex.extract("enter your password");
        assert_eq!(features.requests_multiple_sensitive, 0);
    }

    #[test]
    fn test_tokenizer_splits_punctuation() {
        let features = extractor().extract("stop. wait");
        assert_eq!(features.word_count, 3);
    }

    #[test]
    fn test_fallback_tokenizer_handles_non_empty_input() {
        let mut ex = extractor();
        ex.word_tokenizer = None;
        let features = ex.extract("two words");
        assert_eq!(features.word_count, 2);
        assert!((features.avg_word_length - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_scam_text_fires_expected_signals() {
        let text = "URGENT! Your account has been SUSPENDED due to security breach! \
                    Enter your card number, CVV, and PIN immediately to restore access.";
        let features = extractor().extract(text);
        assert!(features.urgency_count > 0);
        assert!(features.threat_count > 0);
        assert!(features.sensitive_data_count >= 3);
        assert_eq!(features.requests_card_cvv, 1);
        assert_eq!(features.requests_multiple_sensitive, 1);
        assert!(features.all_caps_words >= 3);
    }

    #[test]
    fn test_benign_text_stays_quiet() {
        let text = "Welcome to our online store. Browse our collection of products. \
                    We accept secure payments through encrypted checkout.";
        let features = extractor().extract(text);
        assert_eq!(features.threat_count, 0);
        assert_eq!(features.requests_card_cvv, 0);
        assert_eq!(features.has_form_pattern, 0);
        assert_eq!(features.has_verification_pattern, 0);
        assert_eq!(features.multiple_exclamations, 0);
    }
}
