pub mod analyzer;
pub mod backtest;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod payout;
pub mod ranking;
pub mod selection;
pub mod strategies;

use lesept_db::models::Draw;

pub use lesept_db::models::{MAX_NUM, PLAYER_PICK, PRIMARY_COUNT, SECONDARY_COUNT};
pub use config::EngineConfig;
pub use error::EngineError;
pub use payout::{PayoutRow, PAYOUT_TABLE};
pub use ranking::RankedStrategyList;
pub use strategies::{StrategyFamily, StrategyResult};

use analyzer::analyze;
use dataset::Dataset;
use strategies::{all_strategies, Strategy};

fn checked_config(config: &EngineConfig) -> EngineConfig {
    match config.validate() {
        Ok(()) => config.clone(),
        Err(e) => {
            log::warn!("{e}, configuration par défaut utilisée");
            EngineConfig::default()
        }
    }
}

/// Une passe complète : filtrage, analyse, les 12 stratégies, classement.
/// draws[0] = le plus récent. Aucun état conservé entre deux appels.
pub fn compute_all_strategies(draws: &[Draw], config: &EngineConfig) -> RankedStrategyList {
    let config = checked_config(config);
    let dataset = Dataset::from_draws(draws);
    if dataset.is_empty() {
        log::info!("aucun tirage valide, stratégies évaluées sans historique");
    }
    let analysis = analyze(&dataset.draws);

    let results: Vec<StrategyResult> = all_strategies(&config)
        .iter()
        .map(|strategy| strategy.score(&dataset.draws, &analysis))
        .collect();

    let mut ranked = ranking::rank_all(results);
    ranked.skipped_draws = dataset.skipped;

    if let Some(best) = ranked.best() {
        log::info!(
            "{} stratégies sur {} tirage(s), meilleure : {} ({:.2})",
            ranked.len(),
            dataset.len(),
            best.id,
            best.rating_score
        );
    }
    ranked
}

/// Premier de `compute_all_strategies`. La liste n'est jamais vide :
/// `all_strategies` fournit toujours les 12 stratégies.
pub fn compute_best_strategy(draws: &[Draw], config: &EngineConfig) -> StrategyResult {
    let mut ranked = compute_all_strategies(draws, config);
    ranked.strategies.swap_remove(0)
}
