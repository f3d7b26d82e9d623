use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Paramètres d'une passe de scoring. Sérialisable en JSON ; le chargement
/// du fichier est fait par l'appelant, le moteur ne touche pas au disque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Mise d'une grille, dénominateur du ROI.
    pub stake: f64,
    /// Taux d'exploration du bandit epsilon-greedy.
    pub epsilon: f64,
    /// Nombre de tirages rejoués par le backtest du bandit.
    pub backtest_window: usize,
    /// Seed du bandit. None = seed du jour (YYYYMMDD).
    pub seed: Option<u64>,
    /// Fenêtre courte des features logistiques.
    pub recent_window: usize,
    /// Fenêtre longue des features logistiques.
    pub long_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stake: 2.0,
            epsilon: 0.1,
            backtest_window: 50,
            seed: None,
            recent_window: 50,
            long_window: 250,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.stake.is_finite() && self.stake > 0.0) {
            return Err(EngineError::InvalidConfig(format!("mise {} non positive", self.stake)));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(EngineError::InvalidConfig(format!("epsilon {} hors de [0, 1]", self.epsilon)));
        }
        if self.backtest_window == 0 || self.recent_window == 0 || self.long_window == 0 {
            return Err(EngineError::InvalidConfig("fenêtre nulle".to_string()));
        }
        Ok(())
    }

    /// Seed effectif : celui de la config, sinon la date du jour.
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(date_seed)
    }
}

/// Génère un seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    use chrono::Datelike;

    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backtest_window, 50);
        assert!((config.epsilon - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_stake() {
        let config = EngineConfig { stake: 0.0, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_epsilon() {
        let config = EngineConfig { epsilon: 1.5, ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_seed_prefers_config() {
        let config = EngineConfig { seed: Some(7), ..EngineConfig::default() };
        assert_eq!(config.effective_seed(), 7);
    }

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        assert_eq!(seed.to_string().len(), 8, "seed devrait avoir 8 chiffres: {seed}");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"epsilon": 0.25}"#).unwrap();
        assert!((config.epsilon - 0.25).abs() < 1e-12);
        assert_eq!(config.long_window, 250);
        assert_eq!(config.seed, None);
    }
}
