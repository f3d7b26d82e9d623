use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lesept_db::models::Draw;
use super::bayesian::BayesianStrategy;
use super::logistic::LogisticStrategy;
use super::markov::MarkovStrategy;
use super::positional::PositionalStrategy;
use super::{format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::backtest::{self, BacktestReport};
use crate::config::EngineConfig;
use crate::selection::finalize;

/// Bandit epsilon-greedy : chaque bras est une stratégie, sa valeur est la
/// récompense moyenne de son backtest sur les derniers tirages.
pub struct BanditStrategy {
    pub arms: Vec<Box<dyn Strategy>>,
    epsilon: f64,
    window: usize,
    seed: u64,
    stake: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmChoice {
    pub index: usize,
    /// Bras tiré au hasard (exploration, ou aucun bras évalué).
    pub explored: bool,
}

impl BanditStrategy {
    pub fn new(config: &EngineConfig) -> Self {
        let arms: Vec<Box<dyn Strategy>> = vec![
            Box::new(BayesianStrategy::new(config.stake)),
            Box::new(MarkovStrategy::new(config.stake)),
            Box::new(LogisticStrategy::new(config.stake, config.recent_window, config.long_window)),
            Box::new(PositionalStrategy::balanced_4_3(config.stake)),
        ];
        Self {
            arms,
            epsilon: config.epsilon,
            window: config.backtest_window,
            seed: config.effective_seed(),
            stake: config.stake,
        }
    }

    pub fn backtest_arms(&self, draws: &[Draw]) -> Vec<BacktestReport> {
        self.arms
            .iter()
            .map(|arm| backtest::evaluate(arm.as_ref(), draws, self.window))
            .collect()
    }
}

/// Epsilon-greedy. Sans aucune évaluation, ou avec probabilité epsilon, un bras
/// uniforme ; sinon la meilleure récompense moyenne (égalité : premier bras).
pub fn select_arm<R: Rng>(reports: &[BacktestReport], epsilon: f64, rng: &mut R) -> ArmChoice {
    if reports.is_empty() {
        return ArmChoice { index: 0, explored: true };
    }

    let evaluated = reports.iter().any(|r| r.evaluations > 0);
    if !evaluated || rng.random::<f64>() < epsilon {
        return ArmChoice { index: rng.random_range(0..reports.len()), explored: true };
    }

    let mut best = 0;
    for (i, report) in reports.iter().enumerate().skip(1) {
        if report.average_reward > reports[best].average_reward {
            best = i;
        }
    }
    ArmChoice { index: best, explored: false }
}

impl Strategy for BanditStrategy {
    fn id(&self) -> &str {
        "bandit"
    }

    fn label(&self) -> &str {
        "Bandit epsilon-greedy"
    }

    fn score(&self, draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let reports = self.backtest_arms(draws);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let choice = select_arm(&reports, self.epsilon, &mut rng);

        let Some(arm) = self.arms.get(choice.index) else {
            return StrategyResult::ia(self, finalize(Vec::new()), 0.0, self.stake, "Aucun bras".to_string());
        };
        let avg_reward = reports.get(choice.index).map_or(0.0, |r| r.average_reward);
        for report in &reports {
            log::debug!("bandit : bras {} , récompense moyenne {:.3} ({} éval.)",
                report.strategy_id, report.average_reward, report.evaluations);
        }
        log::debug!("bandit : choix {} ({})", arm.id(), if choice.explored { "exploration" } else { "exploitation" });

        let suggestion = arm.score(draws, analysis);
        let ev = avg_reward.max(1.0) * self.stake;
        let description = format!(
            "Bras {} par {}, récompense moyenne {:.3} sur {} tirage(s) : {}",
            arm.label(),
            if choice.explored { "exploration" } else { "exploitation" },
            avg_reward,
            reports.get(choice.index).map_or(0, |r| r.evaluations),
            format_numbers(&suggestion.numbers)
        );
        StrategyResult::ia(self, suggestion.numbers, ev, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("epsilon".to_string(), self.epsilon),
            ("window".to_string(), self.window as f64),
            ("arms".to_string(), self.arms.len() as f64),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::selection::is_valid_ticket;
    use crate::strategies::static_test_draws;
    use lesept_db::models::make_test_draws;

    fn config(window: usize, epsilon: f64) -> EngineConfig {
        EngineConfig { seed: Some(42), backtest_window: window, epsilon, ..EngineConfig::default() }
    }

    fn report(id: &str, evaluations: usize, average_reward: f64) -> BacktestReport {
        BacktestReport {
            strategy_id: id.to_string(),
            evaluations,
            total_reward: average_reward * evaluations as f64,
            average_reward,
            match_histogram: [0; 8],
            prize_hits: 0,
            total_prize: 0.0,
            skipped_draws: 0,
        }
    }

    #[test]
    fn test_exploit_picks_best_first_on_tie() {
        let reports = vec![report("a", 5, 1.0), report("b", 5, 3.0), report("c", 5, 3.0)];
        let mut rng = StdRng::seed_from_u64(7);
        let choice = select_arm(&reports, 0.0, &mut rng);
        assert_eq!(choice, ArmChoice { index: 1, explored: false });
    }

    #[test]
    fn test_full_exploration() {
        let reports = vec![report("a", 5, 1.0), report("b", 5, 3.0)];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let choice = select_arm(&reports, 1.0, &mut rng);
            assert!(choice.explored);
            assert!(choice.index < reports.len());
        }
    }

    #[test]
    fn test_no_evaluation_is_random() {
        let reports = vec![report("a", 0, 0.0), report("b", 0, 0.0)];
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_arm(&reports, 0.0, &mut rng).explored);
    }

    #[test]
    fn test_window_larger_than_history() {
        let draws = make_test_draws(5);
        let bandit = BanditStrategy::new(&config(50, 0.1));
        let reports = bandit.backtest_arms(&draws);
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| r.evaluations == 4));

        let result = bandit.score(&draws, &analyze(&draws));
        assert!(is_valid_ticket(&result.numbers));
        assert!(result.ev >= 2.0);
    }

    #[test]
    fn test_single_draw_falls_back_to_random_arm() {
        let draws = make_test_draws(1);
        let bandit = BanditStrategy::new(&config(50, 0.0));
        let result = bandit.score(&draws, &analyze(&draws));
        assert!(is_valid_ticket(&result.numbers));
        // aucune récompense : EV plancher = mise
        assert_eq!(result.ev, 2.0);
        assert!(result.method_description.contains("exploration"));
    }

    #[test]
    fn test_static_draws_exploit_reward() {
        // Bayésien sur tirages identiques : toujours 7 bons numéros
        let draws = static_test_draws(15);
        let bandit = BanditStrategy::new(&config(10, 0.0));
        let result = bandit.score(&draws, &analyze(&draws));
        assert_eq!(result.numbers, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result.ev, 100.0 * 2.0);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let draws = make_test_draws(30);
        let analysis = analyze(&draws);
        let a = BanditStrategy::new(&config(10, 0.5)).score(&draws, &analysis);
        let b = BanditStrategy::new(&config(10, 0.5)).score(&draws, &analysis);
        assert_eq!(a, b);
    }
}
