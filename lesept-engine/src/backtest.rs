use serde::Serialize;

use lesept_db::models::{Draw, PLAYER_PICK};
use crate::analyzer::analyze;
use crate::dataset::Dataset;
use crate::payout;
use crate::strategies::Strategy;

/// Récompense discrète selon le nombre de numéros trouvés.
pub fn reward(matches: usize) -> f64 {
    match matches {
        7 => 100.0,
        6 => 10.0,
        5 => 2.0,
        4 => 1.0,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub strategy_id: String,
    /// Nombre de tirages rejoués.
    pub evaluations: usize,
    pub total_reward: f64,
    /// 0 si aucune évaluation.
    pub average_reward: f64,
    /// match_histogram[k] = nombre de tirages où la grille trouvait k numéros.
    pub match_histogram: [usize; PLAYER_PICK + 1],
    /// Tirages où la grille atteignait un rang du barème.
    pub prize_hits: usize,
    /// Somme des gains du barème sur les tirages rejoués.
    pub total_prize: f64,
    /// Tirages malformés écartés avant de rejouer.
    pub skipped_draws: usize,
}

/// Numéros de la grille présents dans le tirage (principaux et secondaires confondus).
pub fn count_matches(numbers: &[u8], draw: &Draw) -> usize {
    numbers.iter().filter(|&&n| draw.contains(n)).count()
}

/// Walk-forward : pour t dans 1..=min(window, len - 1), la stratégie ne voit que
/// draws[t..] (le passé du tirage t - 1) et sa grille est confrontée à draws[t - 1].
///
/// draws[0] = le plus récent. Les tirages malformés sont écartés d'abord.
/// Fenêtre plus grande que l'historique : on rejoue ce qui est disponible,
/// éventuellement rien.
pub fn evaluate(strategy: &dyn Strategy, draws: &[Draw], window: usize) -> BacktestReport {
    let dataset = Dataset::from_draws(draws);
    let draws = &dataset.draws;
    let steps = window.min(draws.len().saturating_sub(1));
    let mut histogram = [0usize; PLAYER_PICK + 1];
    let mut total_reward = 0.0f64;
    let mut prize_hits = 0usize;
    let mut total_prize = 0.0f64;

    for t in 1..=steps {
        let history = &draws[t..];
        let analysis = analyze(history);
        let result = strategy.score(history, &analysis);

        let target = &draws[t - 1];
        let matches = count_matches(&result.numbers, target);
        histogram[matches.min(PLAYER_PICK)] += 1;
        total_reward += reward(matches);
        if let Some(row) = payout::prize_for(&result.numbers, target) {
            prize_hits += 1;
            total_prize += row.payout;
        }
    }

    let average_reward = if steps > 0 { total_reward / steps as f64 } else { 0.0 };
    log::debug!(
        "backtest {} : {} évaluation(s), récompense moyenne {:.3}",
        strategy.id(),
        steps,
        average_reward
    );

    BacktestReport {
        strategy_id: strategy.id().to_string(),
        evaluations: steps,
        total_reward,
        average_reward,
        match_histogram: histogram,
        prize_hits,
        total_prize,
        skipped_draws: dataset.skipped,
    }
}
