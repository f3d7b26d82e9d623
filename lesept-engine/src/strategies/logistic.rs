use std::collections::HashMap;

use ndarray::{Array1, Array2};

use lesept_db::models::{Draw, PLAYER_PICK};
use super::{format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::features::{self, FEATURE_NAMES};
use crate::payout;
use crate::selection::{filter_ranked, finalize, merge_split, rank_scores_desc};

/// Poids fixes (hyperparamètres, pas d'entraînement), dans l'ordre de FEATURE_NAMES.
/// gap_norm : 0.004 par tirage de retard, soit 0.4 sur le retard ramené à [0, 1].
pub const WEIGHTS: [f64; 5] = [-0.2, 0.8, 0.4, 0.4, 0.3];

pub struct LogisticStrategy {
    stake: f64,
    recent_window: usize,
    long_window: usize,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LogisticStrategy {
    pub fn new(stake: f64, recent_window: usize, long_window: usize) -> Self {
        Self { stake, recent_window, long_window }
    }

    /// Pseudo-probabilité par numéro : sigmoid(x . w).
    pub fn probabilities(&self, draws: &[Draw], analysis: &Analysis) -> Vec<f64> {
        let rows = features::extract_features(draws, analysis, self.recent_window, self.long_window);
        let n_features = FEATURE_NAMES.len();

        let mut x = Array2::<f64>::zeros((rows.len(), n_features));
        for (i, row) in rows.iter().enumerate() {
            for (j, &val) in row.features.iter().enumerate() {
                x[[i, j]] = val;
            }
        }
        let weights = Array1::from_vec(WEIGHTS.to_vec());

        x.dot(&weights).mapv(sigmoid).to_vec()
    }

    /// EV par numéro : la probabilité répartie entre gains principaux et secondaires
    /// selon la part principale du numéro.
    pub fn number_evs(&self, draws: &[Draw], analysis: &Analysis) -> Vec<f64> {
        let avg_primary = payout::average_primary_payout();
        let avg_secondary = payout::average_secondary_payout();

        self.probabilities(draws, analysis)
            .iter()
            .enumerate()
            .map(|(i, &prob)| {
                let ratio = analysis.primary_ratio((i + 1) as u8);
                prob * ratio * avg_primary + prob * (1.0 - ratio) * avg_secondary
            })
            .collect()
    }
}

impl Strategy for LogisticStrategy {
    fn id(&self) -> &str {
        "logistic_ml"
    }

    fn label(&self) -> &str {
        "Logistique ML"
    }

    fn score(&self, draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let evs = self.number_evs(draws, analysis);
        let ranked = rank_scores_desc(&evs);
        let primary = filter_ranked(&ranked, |n| analysis.primary_ratio(n) >= 0.5);
        let secondary = filter_ranked(&ranked, |n| analysis.primary_ratio(n) < 0.5);
        let numbers = finalize(merge_split(&primary, &secondary, 4, 3));

        let ev = numbers.iter().map(|&n| evs[(n - 1) as usize]).sum::<f64>() / PLAYER_PICK as f64;
        let description = format!(
            "Régression logistique à poids fixes ({}), EV moyenne par numéro : {}",
            FEATURE_NAMES.join(", "),
            format_numbers(&numbers)
        );
        StrategyResult::ia(self, numbers, ev, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        let mut params: HashMap<String, f64> = FEATURE_NAMES
            .iter()
            .zip(WEIGHTS.iter())
            .map(|(name, &w)| (format!("w_{name}"), w))
            .collect();
        params.insert("recent_window".to_string(), self.recent_window as f64);
        params.insert("long_window".to_string(), self.long_window as f64);
        params
    }

    fn number_scores(&self, draws: &[Draw], analysis: &Analysis) -> Option<Vec<f64>> {
        Some(self.number_evs(draws, analysis))
    }
}
