pub mod classifier;
pub mod config;
pub mod extractor;
pub mod features;
pub mod keywords;
pub mod scorer;

pub use classifier::{Classifier, LogisticModel, ModelBundle};
pub use config::Config;
pub use extractor::ScamFeatureExtractor;
pub use features::{FeatureVector, FEATURE_COLUMNS};
pub use keywords::{KeywordSets, KEYWORD_SET_VERSION};
pub use scorer::{Probability, RiskAssessment, RiskBand, RiskScorer, RiskThresholds};
