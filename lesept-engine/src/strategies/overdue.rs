use std::collections::HashMap;

use lesept_db::models::{Draw, MAX_NUM, PLAYER_PICK};
use super::{coverage_ev, format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::selection::{finalize, rank_desc};

const OVERDUE_RATING: f64 = 4.5;

/// Les 7 numéros en retard : plus long écart depuis leur dernière sortie.
pub struct OverdueStrategy {
    stake: f64,
}

impl OverdueStrategy {
    pub fn new(stake: f64) -> Self {
        Self { stake }
    }
}

impl Strategy for OverdueStrategy {
    fn id(&self) -> &str {
        "overdue"
    }

    fn label(&self) -> &str {
        "Retards"
    }

    fn score(&self, _draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        // un numéro jamais vu a le retard maximal (draw_count)
        let gaps: Vec<u32> = (1..=MAX_NUM as u8).map(|n| analysis.gap(n) as u32).collect();
        let numbers = finalize(rank_desc(&gaps).into_iter().take(PLAYER_PICK).collect());

        let max_gap = numbers.iter().map(|&n| gaps[(n - 1) as usize]).max().unwrap_or(0);
        let description = format!(
            "7 plus gros retards (max {} tirages) : {}",
            max_gap,
            format_numbers(&numbers)
        );
        StrategyResult::heuristic(self, numbers, coverage_ev(&numbers, analysis), OVERDUE_RATING, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([("rating".to_string(), OVERDUE_RATING)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::strategies::static_test_draws;
    use lesept_db::models::make_test_draws;

    #[test]
    fn test_overdue_prefers_unseen() {
        let draws = static_test_draws(10);
        let result = OverdueStrategy::new(2.0).score(&draws, &analyze(&draws));
        assert_eq!(result.numbers, [13, 14, 15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_overdue_skips_latest_draw() {
        let draws = make_test_draws(12);
        let result = OverdueStrategy::new(2.0).score(&draws, &analyze(&draws));
        for n in result.numbers {
            assert!(!draws[0].contains(n), "{n} vient de sortir");
        }
    }

    #[test]
    fn test_overdue_empty() {
        let result = OverdueStrategy::new(2.0).score(&[], &analyze(&[]));
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 6, 7]);
    }
}
