use anyhow::{Context, Result, bail};
use std::path::Path;

use lesept_engine::EngineConfig;

/// Charge la configuration JSON. Fichier absent : valeurs par défaut.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    if !path.exists() {
        log::info!("{:?} introuvable, configuration par défaut", path);
        return Ok(EngineConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: EngineConfig = serde_json::from_str(&content)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    Ok(config)
}

/// Applique les options de la ligne de commande puis valide.
pub fn apply_overrides(
    mut config: EngineConfig,
    seed: Option<u64>,
    epsilon: Option<f64>,
    bandit_window: Option<usize>,
) -> Result<EngineConfig> {
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    if let Some(epsilon) = epsilon {
        config.epsilon = epsilon;
    }
    if let Some(window) = bandit_window {
        config.backtest_window = window;
    }
    if let Err(e) = config.validate() {
        bail!("{e}");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/lesept.json"))).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let path = std::env::temp_dir().join(format!("lesept_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "stake": 3.0, "seed": 7 }"#).unwrap();
        let config = load_config(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.stake, 3.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.backtest_window, 50);
    }

    #[test]
    fn test_overrides() {
        let config = apply_overrides(EngineConfig::default(), Some(1), Some(0.5), Some(20)).unwrap();
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.epsilon, 0.5);
        assert_eq!(config.backtest_window, 20);
    }

    #[test]
    fn test_invalid_override_rejected() {
        assert!(apply_overrides(EngineConfig::default(), None, Some(1.5), None).is_err());
        assert!(apply_overrides(EngineConfig::default(), None, None, Some(0)).is_err());
    }
}
