use std::collections::HashMap;

use lesept_db::models::{Draw, MAX_NUM};
use super::{format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::payout;
use crate::selection::{filter_ranked, finalize, merge_split, rank_scores_desc};

/// Chaîne de Markov numéro -> numéro entre tirages consécutifs.
pub struct MarkovStrategy {
    stake: f64,
}

impl MarkovStrategy {
    pub fn new(stake: f64) -> Self {
        Self { stake }
    }
}

/// Matrice 28x28 lissée (Laplace, 1 partout), normalisée par ligne.
/// transition[a][b] = P(b au tirage suivant | a au tirage courant).
pub fn transition_matrix(draws: &[Draw]) -> Vec<Vec<f64>> {
    let mut transition = vec![vec![1.0f64; MAX_NUM]; MAX_NUM];

    // draws[t + 1] précède draws[t] dans le temps
    for t in 0..draws.len().saturating_sub(1) {
        let previous = &draws[t + 1];
        let next = &draws[t];
        for from in previous.numbers() {
            for to in next.numbers() {
                transition[(from - 1) as usize][(to - 1) as usize] += 1.0;
            }
        }
    }

    for row in &mut transition {
        let total: f64 = row.iter().sum();
        for p in row.iter_mut() {
            *p /= total;
        }
    }

    transition
}

/// Poids de position : part du groupe dominant dans les apparitions du numéro.
fn dominant_position_weight(analysis: &Analysis, number: u8) -> f64 {
    let idx = (number - 1) as usize;
    let total = analysis.total_freq[idx];
    if total == 0 {
        return 0.5;
    }
    analysis.primary_freq[idx].max(analysis.secondary_freq[idx]) as f64 / total as f64
}

/// Score pondéré par numéro : somme des probabilités de transition depuis
/// chaque numéro du dernier tirage, multipliée par le poids de position.
pub fn weighted_scores(draws: &[Draw], analysis: &Analysis) -> Vec<f64> {
    let Some(latest) = draws.first() else {
        return vec![0.0; MAX_NUM];
    };
    let transition = transition_matrix(draws);

    (1..=MAX_NUM as u8)
        .map(|to| {
            let raw: f64 = latest
                .numbers()
                .map(|from| transition[(from - 1) as usize][(to - 1) as usize])
                .sum();
            raw * dominant_position_weight(analysis, to)
        })
        .collect()
}

impl Strategy for MarkovStrategy {
    fn id(&self) -> &str {
        "markov_roi"
    }

    fn label(&self) -> &str {
        "Markov ROI"
    }

    fn score(&self, draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let scores = weighted_scores(draws, analysis);
        let ranked = rank_scores_desc(&scores);
        let primary = filter_ranked(&ranked, |n| analysis.is_primary_leaning(n));
        let secondary = filter_ranked(&ranked, |n| !analysis.is_primary_leaning(n));
        let numbers = finalize(merge_split(&primary, &secondary, 4, 3));

        let total_score: f64 = numbers.iter().map(|&n| scores[(n - 1) as usize]).sum();
        let ev = total_score * payout::average_payout();
        let description = format!(
            "Transitions depuis le dernier tirage, score cumulé {:.3} : {}",
            total_score,
            format_numbers(&numbers)
        );
        StrategyResult::ia(self, numbers, ev, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([("laplace".to_string(), 1.0)])
    }

    fn number_scores(&self, draws: &[Draw], analysis: &Analysis) -> Option<Vec<f64>> {
        Some(weighted_scores(draws, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::strategies::static_test_draws;
    use lesept_db::models::make_test_draws;

    #[test]
    fn test_rows_sum_to_one() {
        let transition = transition_matrix(&make_test_draws(30));
        for row in &transition {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "Sum = {}", sum);
        }
    }

    #[test]
    fn test_uniform_without_pairs() {
        let transition = transition_matrix(&make_test_draws(1));
        for row in &transition {
            for &p in row {
                assert!((p - 1.0 / MAX_NUM as f64).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_static_transitions_stay_in_set() {
        let draws = static_test_draws(10);
        let analysis = analyze(&draws);
        let scores = weighted_scores(&draws, &analysis);
        // 1..12 se succèdent toujours : leur score dépasse celui des absents
        assert!(scores[0] > scores[20]);

        let result = MarkovStrategy::new(2.0).score(&draws, &analysis);
        assert_eq!(result.numbers, [1, 2, 3, 4, 8, 9, 10]);
        assert!(result.ev > 0.0);
    }

    #[test]
    fn test_empty_draws_zero_ev() {
        let result = MarkovStrategy::new(2.0).score(&[], &analyze(&[]));
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result.ev, 0.0);
    }

    #[test]
    fn test_dominant_position_weight() {
        let draw = |primary: [u8; 7], secondary: [u8; 5]| Draw {
            draw_id: String::new(),
            date: None,
            primary,
            secondary,
        };
        // 1 sort 3 fois en principal et 1 fois en secondaire
        let mut draws = vec![draw([1, 2, 3, 4, 5, 6, 7], [8, 9, 10, 11, 12]); 3];
        draws.push(draw([2, 3, 4, 5, 6, 7, 13], [1, 8, 9, 10, 11]));
        let analysis = analyze(&draws);

        assert_eq!(dominant_position_weight(&analysis, 1), 0.75);
        assert_eq!(dominant_position_weight(&analysis, 13), 1.0);
        assert_eq!(dominant_position_weight(&analysis, 8), 1.0);
        // jamais vu : aucune position ne domine
        assert_eq!(dominant_position_weight(&analysis, 28), 0.5);
        assert!((1..=MAX_NUM as u8).all(|n| dominant_position_weight(&analysis, n) >= 0.5));

        // le score brut de 1 est multiplié par sa part principale
        let transition = transition_matrix(&draws);
        let raw: f64 = draws[0].numbers().map(|from| transition[(from - 1) as usize][0]).sum();
        let scores = weighted_scores(&draws, &analysis);
        assert!((scores[0] - raw * 0.75).abs() < 1e-12);
    }
}
