use std::collections::HashMap;

use lesept_db::models::{Draw, PLAYER_PICK};
use super::{coverage_ev, format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::selection::{finalize, rank_asc, rank_desc};

const MOST_FREQUENT_RATING: f64 = 6.0;
const LEAST_FREQUENT_RATING: f64 = 4.0;

/// Les 7 numéros les plus sortis, tous groupes confondus.
pub struct MostFrequentStrategy {
    stake: f64,
}

impl MostFrequentStrategy {
    pub fn new(stake: f64) -> Self {
        Self { stake }
    }

    /// Sélection brute, réutilisée comme repli par d'autres stratégies.
    pub fn select(analysis: &Analysis) -> [u8; PLAYER_PICK] {
        finalize(rank_desc(&analysis.total_freq).into_iter().take(PLAYER_PICK).collect())
    }
}

impl Strategy for MostFrequentStrategy {
    fn id(&self) -> &str {
        "most_frequent"
    }

    fn label(&self) -> &str {
        "Plus fréquents"
    }

    fn score(&self, _draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let numbers = Self::select(analysis);
        let description = format!(
            "Top 7 des fréquences totales sur {} tirages : {}",
            analysis.draw_count,
            format_numbers(&numbers)
        );
        StrategyResult::heuristic(self, numbers, coverage_ev(&numbers, analysis), MOST_FREQUENT_RATING, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([("rating".to_string(), MOST_FREQUENT_RATING)])
    }
}

/// Les 7 numéros les moins sortis, jamais vus compris.
pub struct LeastFrequentStrategy {
    stake: f64,
}

impl LeastFrequentStrategy {
    pub fn new(stake: f64) -> Self {
        Self { stake }
    }
}

impl Strategy for LeastFrequentStrategy {
    fn id(&self) -> &str {
        "least_frequent"
    }

    fn label(&self) -> &str {
        "Moins fréquents"
    }

    fn score(&self, _draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let numbers = finalize(rank_asc(&analysis.total_freq).into_iter().take(PLAYER_PICK).collect());
        let unseen = numbers.iter().filter(|&&n| analysis.total_freq[(n - 1) as usize] == 0).count();
        let description = format!(
            "7 fréquences totales les plus basses ({} jamais sortis) : {}",
            unseen,
            format_numbers(&numbers)
        );
        StrategyResult::heuristic(self, numbers, coverage_ev(&numbers, analysis), LEAST_FREQUENT_RATING, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([("rating".to_string(), LEAST_FREQUENT_RATING)])
    }
}
