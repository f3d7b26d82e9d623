use std::collections::HashMap;

use lesept_db::models::{Draw, MAX_NUM};
use super::{format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::payout;
use crate::selection::{finalize, merge_split, rank_scores_desc};

/// Beta-binomiale par numéro, a priori de Laplace (1, 1).
pub struct BayesianStrategy {
    prior_alpha: f64,
    prior_beta: f64,
    stake: f64,
}

impl BayesianStrategy {
    pub fn new(stake: f64) -> Self {
        Self { prior_alpha: 1.0, prior_beta: 1.0, stake }
    }

    /// Moyenne a posteriori alpha / (alpha + beta) pour chaque numéro.
    /// Une passe complète de l'univers par tirage : alpha si présent, beta sinon.
    pub fn posterior_means(&self, draws: &[Draw]) -> Vec<f64> {
        let mut alpha = vec![self.prior_alpha; MAX_NUM];
        let mut beta = vec![self.prior_beta; MAX_NUM];

        for draw in draws {
            for n in 1..=MAX_NUM as u8 {
                let idx = (n - 1) as usize;
                if draw.contains(n) {
                    alpha[idx] += 1.0;
                } else {
                    beta[idx] += 1.0;
                }
            }
        }

        alpha.iter().zip(&beta).map(|(a, b)| a / (a + b)).collect()
    }
}

impl Strategy for BayesianStrategy {
    fn id(&self) -> &str {
        "bayesian_ev"
    }

    fn label(&self) -> &str {
        "Bayésien EV"
    }

    fn score(&self, draws: &[Draw], _analysis: &Analysis) -> StrategyResult {
        let means = self.posterior_means(draws);
        let ranked = rank_scores_desc(&means);
        // top 4 = penchant principal, top 3 du reste = penchant secondaire
        let selected = merge_split(&ranked, &ranked[4..], 4, 3);
        let numbers = finalize(selected.clone());

        let ev = payout::independence_ev();
        let description = format!(
            "Posterior Beta(1,1) sur {} tirages ; principal : {} ; secondaire : {}",
            draws.len(),
            format_numbers(&selected[..4.min(selected.len())]),
            format_numbers(selected.get(4..).unwrap_or(&[])),
        );
        StrategyResult::ia(self, numbers, ev, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("prior_alpha".to_string(), self.prior_alpha),
            ("prior_beta".to_string(), self.prior_beta),
        ])
    }

    fn number_scores(&self, draws: &[Draw], _analysis: &Analysis) -> Option<Vec<f64>> {
        Some(self.posterior_means(draws))
    }
}
