//! The contradiction-detection pipeline.
//!
//! Given a topic query, retrieves similar decisions from different courts,
//! pairs them, keeps the pairs whose outcomes are opposed, confirms those
//! through a text-generation service, and clusters the confirmed
//! contradictions by theme.
//!
//! ```text
//! query → retrieval → PairGenerator → ContradictionChecker → DeepAnalyzer → ClusterEngine
//! ```

pub mod analyzer;
pub mod checker;
pub mod classify;
pub mod cluster;
pub mod detector;
pub mod pairs;
pub mod prompt;
pub mod report;
pub mod similarity;

pub use analyzer::DeepAnalyzer;
pub use checker::ContradictionChecker;
pub use classify::DecisionClassifier;
pub use cluster::ClusterEngine;
pub use detector::{AnalyzerConfig, ContradictionDetector, DetectOptions};
pub use pairs::PairGenerator;
pub use similarity::SimilarityScorer;
