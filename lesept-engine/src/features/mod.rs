pub mod compute;

use lesept_db::models::Draw;
use crate::analyzer::Analysis;

pub const FEATURE_NAMES: &[&str] = &[
    "lag",
    "freq_recent",
    "freq_long",
    "gap_norm",
    "primary_ratio",
];

#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub number: u8,
    pub features: Vec<f64>,
}

pub fn extract_features(draws: &[Draw], analysis: &Analysis, recent_window: usize, long_window: usize) -> Vec<FeatureRow> {
    compute::extract_features(draws, analysis, recent_window, long_window)
}
