use std::collections::HashMap;

use lesept_db::models::{Draw, MAX_NUM};
use super::bayesian::BayesianStrategy;
use super::logistic::LogisticStrategy;
use super::markov::MarkovStrategy;
use super::{format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::config::EngineConfig;
use crate::selection::{filter_ranked, finalize, merge_split, rank_scores_desc};

/// Ensemble à poids uniformes des scores par numéro des stratégies IA.
pub struct ConsensusStrategy {
    pub members: Vec<Box<dyn Strategy>>,
    stake: f64,
}

#[derive(Debug, Clone)]
pub struct ConsensusScores {
    /// Moyenne des scores normalisés, somme 1.
    pub combined: Vec<f64>,
    pub member_scores: Vec<(String, Vec<f64>)>,
}

impl ConsensusStrategy {
    pub fn new(config: &EngineConfig) -> Self {
        let members: Vec<Box<dyn Strategy>> = vec![
            Box::new(BayesianStrategy::new(config.stake)),
            Box::new(MarkovStrategy::new(config.stake)),
            Box::new(LogisticStrategy::new(config.stake, config.recent_window, config.long_window)),
        ];
        Self { members, stake: config.stake }
    }

    pub fn combine(&self, draws: &[Draw], analysis: &Analysis) -> ConsensusScores {
        let mut combined = vec![0.0f64; MAX_NUM];
        let mut member_scores = Vec::with_capacity(self.members.len());

        for member in &self.members {
            let Some(scores) = member.number_scores(draws, analysis) else {
                continue;
            };
            let normalized = normalize(&scores);
            for (c, s) in combined.iter_mut().zip(&normalized) {
                *c += s;
            }
            member_scores.push((member.id().to_string(), normalized));
        }

        if !member_scores.is_empty() {
            let n = member_scores.len() as f64;
            for c in &mut combined {
                *c /= n;
            }
        }

        ConsensusScores { combined, member_scores }
    }
}

/// Ramène un vecteur de scores à une somme de 1 (uniforme si la somme est nulle).
pub fn normalize(scores: &[f64]) -> Vec<f64> {
    let clean: Vec<f64> = scores
        .iter()
        .map(|&s| if s.is_finite() { s.max(0.0) } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    if total > 0.0 {
        clean.iter().map(|s| s / total).collect()
    } else {
        vec![1.0 / scores.len().max(1) as f64; scores.len()]
    }
}

impl Strategy for ConsensusStrategy {
    fn id(&self) -> &str {
        "consensus_v2"
    }

    fn label(&self) -> &str {
        "Consensus IA v2"
    }

    fn score(&self, draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let consensus = self.combine(draws, analysis);
        let ranked = rank_scores_desc(&consensus.combined);
        let primary = filter_ranked(&ranked, |n| analysis.is_primary_leaning(n));
        let secondary = filter_ranked(&ranked, |n| !analysis.is_primary_leaning(n));
        let numbers = finalize(merge_split(&primary, &secondary, 4, 3));

        let evs: Vec<f64> = self.members.iter().map(|m| m.score(draws, analysis).ev).collect();
        let ev = if evs.is_empty() { 0.0 } else { evs.iter().sum::<f64>() / evs.len() as f64 };

        let names: Vec<&str> = consensus.member_scores.iter().map(|(id, _)| id.as_str()).collect();
        let description = format!(
            "Moyenne des scores normalisés ({}), EV moyenne des membres : {}",
            names.join(", "),
            format_numbers(&numbers)
        );
        StrategyResult::ia(self, numbers, ev, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([("members".to_string(), self.members.len() as f64)])
    }

    fn number_scores(&self, draws: &[Draw], analysis: &Analysis) -> Option<Vec<f64>> {
        Some(self.combine(draws, analysis).combined)
    }
}
