use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version tag for the built-in keyword tables. Model bundles record the
/// version they were trained against; scoring with a different table shifts
/// the count features without any visible error, so callers compare this
/// against the bundle's recorded version.
pub const KEYWORD_SET_VERSION: &str = "2024-03";

/// The four lexical trigger categories used by the feature extractor.
///
/// Loaded once at extractor construction and never mutated afterward, so a
/// single instance can be shared across threads without synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordSets {
    pub urgency: Vec<String>,
    pub threat: Vec<String>,
    pub sensitive_data: Vec<String>,
    pub action_phrases: Vec<String>,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            // Pressure to act fast
            urgency: phrases(&[
                "urgent",
                "immediately",
                "now",
                "hurry",
                "limited time",
                "act fast",
                "expires",
                "deadline",
                "today only",
                "right now",
                "asap",
                "quick",
                "instant",
                "right away",
            ]),
            // Fear of losing access
            threat: phrases(&[
                "suspended",
                "blocked",
                "frozen",
                "locked",
                "deactivated",
                "unauthorized",
                "breach",
                "compromised",
                "security alert",
                "unusual activity",
                "verify immediately",
                "warning",
                "alert",
                "closed",
                "terminated",
                "cancelled",
            ]),
            // Data a legitimate page never asks for in free text
            sensitive_data: phrases(&[
                "card number",
                "credit card",
                "debit card",
                "cvv",
                "cvc",
                "pin",
                "password",
                "otp",
                "ssn",
                "social security",
                "account number",
                "routing number",
                "expiry date",
                "expiration date",
                "date of birth",
                "mother maiden name",
                "security question",
                "card details",
                "banking details",
            ]),
            // Imperatives pushing the reader toward a form or link
            action_phrases: phrases(&[
                "click here",
                "verify now",
                "confirm identity",
                "update kyc",
                "re-verify",
                "validate account",
                "enter details",
                "submit information",
                "provide details",
                "confirm your",
                "update your",
                "login here",
                "reset password",
                "update payment",
            ]),
        }
    }
}

impl KeywordSets {
    /// Load keyword tables from a YAML override file.
    ///
    /// A missing or malformed file is a fatal error: silently falling back
    /// to the built-in tables would change feature semantics without any
    /// signal that the model is now seeing different counts.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read keyword file: {}", path.display()))?;
        let sets: KeywordSets = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse keyword file: {}", path.display()))?;
        sets.validate()
            .with_context(|| format!("invalid keyword file: {}", path.display()))?;
        Ok(sets)
    }

    /// Matching runs on lowercased text, so every phrase must itself be
    /// lowercase or it can never fire.
    pub fn validate(&self) -> Result<()> {
        let categories = [
            ("urgency", &self.urgency),
            ("threat", &self.threat),
            ("sensitive_data", &self.sensitive_data),
            ("action_phrases", &self.action_phrases),
        ];

        for (name, list) in categories {
            if list.is_empty() {
                bail!("keyword category '{name}' is empty");
            }
            for phrase in list {
                if phrase.trim().is_empty() {
                    bail!("keyword category '{name}' contains a blank phrase");
                }
                if *phrase != phrase.to_lowercase() {
                    bail!("keyword '{phrase}' in category '{name}' is not lowercase");
                }
            }
        }

        Ok(())
    }
}
