pub mod frequency;
pub mod positional;
pub mod overdue;
pub mod bayesian;
pub mod markov;
pub mod logistic;
pub mod cluster;
pub mod consensus;
pub mod bandit;

use std::collections::HashMap;

use serde::Serialize;

use lesept_db::models::{Draw, PLAYER_PICK};
use crate::analyzer::Analysis;
use crate::config::EngineConfig;
use crate::payout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyFamily {
    /// Heuristiques historiques, classées par une note fixe.
    Heuristic,
    /// Stratégies "IA", classées par leur EV.
    Ia,
}

impl std::fmt::Display for StrategyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyFamily::Heuristic => write!(f, "HEURISTIQUE"),
            StrategyFamily::Ia => write!(f, "IA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    pub id: String,
    pub label: String,
    pub family: StrategyFamily,
    /// 7 numéros distincts, triés.
    pub numbers: [u8; PLAYER_PICK],
    pub ev: f64,
    pub roi: f64,
    pub rating_score: f64,
    pub method_description: String,
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl StrategyResult {
    /// Résultat d'une heuristique : la note fixe pilote le classement.
    pub fn heuristic(
        strategy: &dyn Strategy,
        numbers: [u8; PLAYER_PICK],
        ev: f64,
        rating: f64,
        stake: f64,
        method_description: String,
    ) -> Self {
        let ev = sanitize(ev);
        Self {
            id: strategy.id().to_string(),
            label: strategy.label().to_string(),
            family: StrategyFamily::Heuristic,
            numbers,
            ev,
            roi: ev / stake,
            rating_score: rating,
            method_description,
        }
    }

    /// Résultat d'une stratégie IA : l'EV pilote le classement.
    pub fn ia(
        strategy: &dyn Strategy,
        numbers: [u8; PLAYER_PICK],
        ev: f64,
        stake: f64,
        method_description: String,
    ) -> Self {
        let ev = sanitize(ev);
        Self {
            id: strategy.id().to_string(),
            label: strategy.label().to_string(),
            family: StrategyFamily::Ia,
            numbers,
            ev,
            roi: ev / stake,
            rating_score: ev,
            method_description,
        }
    }
}

pub trait Strategy: Send + Sync {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    /// draws[0] = tirage le plus récent, tirages déjà validés.
    /// Retourne toujours 7 numéros distincts dans 1..=28 et une EV >= 0.
    fn score(&self, draws: &[Draw], analysis: &Analysis) -> StrategyResult;
    fn params(&self) -> HashMap<String, f64>;

    /// Score par numéro (index numéro - 1) pour les stratégies qui en ont un.
    fn number_scores(&self, _draws: &[Draw], _analysis: &Analysis) -> Option<Vec<f64>> {
        None
    }
}

/// EV d'une heuristique : part des apparitions historiques couverte par la
/// grille, multipliée par le gain moyen du barème. 0 sans historique.
pub fn coverage_ev(numbers: &[u8], analysis: &Analysis) -> f64 {
    let total = analysis.total_occurrences();
    if total == 0 {
        return 0.0;
    }
    let covered: u64 = numbers
        .iter()
        .map(|&n| analysis.total_freq[(n - 1) as usize] as u64)
        .sum();
    covered as f64 / total as f64 * payout::average_payout()
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
}

/// Le menu complet, dans l'ordre de déclaration (qui départage les égalités).
pub fn all_strategies(config: &EngineConfig) -> Vec<Box<dyn Strategy>> {
    let stake = config.stake;
    vec![
        Box::new(frequency::MostFrequentStrategy::new(stake)),
        Box::new(frequency::LeastFrequentStrategy::new(stake)),
        Box::new(positional::PositionalStrategy::primary_max(stake)),
        Box::new(positional::PositionalStrategy::balanced_4_3(stake)),
        Box::new(positional::PositionalStrategy::balanced_5_2(stake)),
        Box::new(overdue::OverdueStrategy::new(stake)),
        Box::new(bayesian::BayesianStrategy::new(stake)),
        Box::new(markov::MarkovStrategy::new(stake)),
        Box::new(logistic::LogisticStrategy::new(stake, config.recent_window, config.long_window)),
        Box::new(cluster::ClusterStrategy::new(stake)),
        Box::new(consensus::ConsensusStrategy::new(config)),
        Box::new(bandit::BanditStrategy::new(config)),
    ]
}

/// Jeu statique : chaque tirage = principaux 1..7, secondaires 8..12.
#[cfg(test)]
pub(crate) fn static_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| Draw {
            draw_id: format!("{:03}", n - i),
            date: None,
            primary: [1, 2, 3, 4, 5, 6, 7],
            secondary: [8, 9, 10, 11, 12],
        })
        .collect()
}
