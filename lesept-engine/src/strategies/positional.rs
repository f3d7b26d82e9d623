use std::collections::HashMap;

use lesept_db::models::{Draw, Pool};
use super::{coverage_ev, format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::selection::{finalize, merge_split, nonzero, rank_desc};

/// Top N des fréquences en principal + top M des fréquences en secondaire.
pub struct PositionalStrategy {
    id: &'static str,
    label: &'static str,
    n_primary: usize,
    n_secondary: usize,
    rating: f64,
    stake: f64,
}

impl PositionalStrategy {
    pub fn new(id: &'static str, label: &'static str, n_primary: usize, n_secondary: usize, rating: f64, stake: f64) -> Self {
        Self { id, label, n_primary, n_secondary, rating, stake }
    }

    pub fn primary_max(stake: f64) -> Self {
        Self::new("primary_max", "Max principaux", 7, 0, 5.5, stake)
    }

    pub fn balanced_4_3(stake: f64) -> Self {
        Self::new("balanced_4_3", "Équilibre 4-3", 4, 3, 6.5, stake)
    }

    pub fn balanced_5_2(stake: f64) -> Self {
        Self::new("balanced_5_2", "Équilibre 5-2", 5, 2, 6.0, stake)
    }

    /// Classement par fréquence dans un groupe, numéros jamais vus exclus.
    fn ranked(analysis: &Analysis, pool: Pool) -> Vec<u8> {
        let counts = analysis.freq(pool);
        nonzero(&rank_desc(counts), counts)
    }
}

impl Strategy for PositionalStrategy {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn score(&self, _draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let primary = Self::ranked(analysis, Pool::Primary);
        let secondary = Self::ranked(analysis, Pool::Secondary);
        let numbers = finalize(merge_split(&primary, &secondary, self.n_primary, self.n_secondary));

        let description = format!(
            "Top {} en principal + top {} en secondaire : {}",
            self.n_primary,
            self.n_secondary,
            format_numbers(&numbers)
        );
        StrategyResult::heuristic(self, numbers, coverage_ev(&numbers, analysis), self.rating, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("n_primary".to_string(), self.n_primary as f64),
            ("n_secondary".to_string(), self.n_secondary as f64),
            ("rating".to_string(), self.rating),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::strategies::static_test_draws;

    #[test]
    fn test_primary_max_static() {
        let draws = static_test_draws(10);
        let result = PositionalStrategy::primary_max(2.0).score(&draws, &analyze(&draws));
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_balanced_4_3_static() {
        let draws = static_test_draws(10);
        let result = PositionalStrategy::balanced_4_3(2.0).score(&draws, &analyze(&draws));
        assert_eq!(result.numbers, [1, 2, 3, 4, 8, 9, 10]);
    }

    #[test]
    fn test_balanced_5_2_static() {
        let draws = static_test_draws(10);
        let result = PositionalStrategy::balanced_5_2(2.0).score(&draws, &analyze(&draws));
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 8, 9]);
    }

    #[test]
    fn test_overlap_uses_next_ranked() {
        // 1..4 sortent souvent dans les deux groupes : le top secondaire recouvre le top principal
        let mut draws = Vec::new();
        for i in 0..6 {
            draws.push(Draw {
                draw_id: format!("a{i}"),
                date: None,
                primary: [1, 2, 3, 4, 5, 6, 7],
                secondary: [20, 21, 22, 23, 24],
            });
            draws.push(Draw {
                draw_id: format!("b{i}"),
                date: None,
                primary: [14, 15, 16, 17, 18, 19, 28],
                secondary: [1, 2, 3, 4, 9],
            });
        }
        let result = PositionalStrategy::balanced_4_3(2.0).score(&draws, &analyze(&draws));
        // principaux 1..4 retenus, secondaires 1,2,3 déjà pris -> on continue en principal (5, 6, 7)
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_empty_dataset_pads() {
        let result = PositionalStrategy::balanced_4_3(2.0).score(&[], &analyze(&[]));
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result.rating_score, 6.5);
    }
}
