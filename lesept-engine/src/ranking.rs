use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::strategies::StrategyResult;

/// Résultats triés par rating_score décroissant ; à égalité, l'ordre de déclaration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedStrategyList {
    pub strategies: Vec<StrategyResult>,
    /// Tirages malformés écartés avant le scoring.
    pub skipped_draws: usize,
}

/// Tri stable : deux appels sur les mêmes résultats donnent le même ordre.
pub fn rank_all(mut results: Vec<StrategyResult>) -> RankedStrategyList {
    results.sort_by(|a, b| b.rating_score.total_cmp(&a.rating_score));
    RankedStrategyList { strategies: results, skipped_draws: 0 }
}

impl RankedStrategyList {
    pub fn best(&self) -> Option<&StrategyResult> {
        self.strategies.first()
    }

    /// Sélection 1-based, validée contre 1..=len.
    pub fn select_by_index(&self, index: usize) -> Result<&StrategyResult> {
        if index == 0 || index > self.strategies.len() {
            return Err(EngineError::IndexOutOfRange { index, len: self.strategies.len() });
        }
        Ok(&self.strategies[index - 1])
    }

    /// Index demandé s'il est valide, la meilleure stratégie sinon.
    pub fn select_or_best(&self, index: Option<usize>) -> Option<&StrategyResult> {
        match index {
            Some(i) => match self.select_by_index(i) {
                Ok(result) => Some(result),
                Err(e) => {
                    log::warn!("{e}, repli sur la meilleure stratégie");
                    self.best()
                }
            },
            None => self.best(),
        }
    }

    pub fn top(&self, n: usize) -> &[StrategyResult] {
        &self.strategies[..n.min(self.strategies.len())]
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
