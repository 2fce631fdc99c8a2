// Quality scoring — weighted sub-scores, rating, recommendations, trends.

pub mod quality;
pub mod trends;

pub use quality::{QualityScorer, ScoreWeights};
pub use trends::TrendTracker;
