use lesept_db::models::Draw;

/// Tirages valides d'une passe, dans l'ordre reçu (draws[0] = le plus récent).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub draws: Vec<Draw>,
    pub skipped: usize,
}

impl Dataset {
    /// Écarte les tirages malformés au lieu d'échouer et compte les rejets.
    pub fn from_draws(draws: &[Draw]) -> Self {
        let valid: Vec<Draw> = draws.iter().filter(|d| d.is_well_formed()).cloned().collect();
        let skipped = draws.len() - valid.len();
        if skipped > 0 {
            log::warn!("{skipped} tirage(s) malformé(s) ignoré(s) sur {}", draws.len());
        }
        Self { draws: valid, skipped }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesept_db::models::make_test_draws;

    #[test]
    fn test_malformed_draws_are_skipped() {
        let mut draws = make_test_draws(10);
        draws[3].primary[0] = 0;
        draws[6].secondary[4] = draws[6].primary[2];

        let dataset = Dataset::from_draws(&draws);
        assert_eq!(dataset.len(), 8);
        assert_eq!(dataset.skipped, 2);
        // l'ordre est conservé
        assert_eq!(dataset.draws[3].draw_id, draws[4].draw_id);
    }

    #[test]
    fn test_empty_input() {
        let dataset = Dataset::from_draws(&[]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.skipped, 0);
    }
}
