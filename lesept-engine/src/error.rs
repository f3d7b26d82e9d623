/// Erreurs récupérables du moteur. Rien n'est fatal : l'appelant retombe sur
/// la meilleure stratégie ou sur la configuration par défaut.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("index de stratégie {index} hors limites (1..={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("configuration invalide : {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
