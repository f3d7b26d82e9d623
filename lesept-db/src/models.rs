use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable (1..=28).
pub const MAX_NUM: usize = 28;
/// Numéros du groupe principal par tirage.
pub const PRIMARY_COUNT: usize = 7;
/// Numéros du groupe secondaire par tirage.
pub const SECONDARY_COUNT: usize = 5;
/// Numéros joués par grille.
pub const PLAYER_PICK: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_id: String,
    pub date: Option<NaiveDate>,
    pub primary: [u8; PRIMARY_COUNT],
    pub secondary: [u8; SECONDARY_COUNT],
}

impl Draw {
    /// Les 12 numéros du tirage, principaux puis secondaires.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.primary.iter().chain(self.secondary.iter()).copied()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers().any(|n| n == number)
    }

    pub fn is_well_formed(&self) -> bool {
        validate_draw(&self.primary, &self.secondary).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pool {
    Primary,
    Secondary,
}

pub fn validate_draw(primary: &[u8; PRIMARY_COUNT], secondary: &[u8; SECONDARY_COUNT]) -> Result<()> {
    let all: Vec<u8> = primary.iter().chain(secondary.iter()).copied().collect();
    for &n in &all {
        if n < 1 || n as usize > MAX_NUM {
            bail!("Numéro {} hors limites (1-{})", n, MAX_NUM);
        }
    }
    for i in 0..all.len() {
        for j in (i + 1)..all.len() {
            if all[i] == all[j] {
                bail!("Numéro en double : {}", all[i]);
            }
        }
    }
    Ok(())
}

/// Tirages synthétiques valides, draws[0] = le plus récent.
/// Chaque tirage prend 12 numéros consécutifs (modulo 28) à partir d'une base tournante.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 4) * 7;
            let at = |k: usize| ((base + k) % MAX_NUM + 1) as u8;
            Draw {
                draw_id: format!("{:04}", n - i),
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .and_then(|d| d.checked_add_days(chrono::Days::new((n - i) as u64))),
                primary: [at(0), at(1), at(2), at(3), at(4), at(5), at(6)],
                secondary: [at(7), at(8), at(9), at(10), at(11)],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(primary: [u8; 7], secondary: [u8; 5]) -> Draw {
        Draw {
            draw_id: "0001".to_string(),
            date: None,
            primary,
            secondary,
        }
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[8, 9, 10, 11, 12]).is_ok());
        assert!(validate_draw(&[28, 27, 26, 25, 24, 23, 22], &[1, 2, 3, 4, 5]).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6, 7], &[8, 9, 10, 11, 12]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[8, 9, 10, 11, 29]).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_within_group() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6, 7], &[8, 9, 10, 11, 12]).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_across_groups() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[7, 9, 10, 11, 12]).is_err());
    }

    #[test]
    fn test_draw_numbers() {
        let d = draw([1, 2, 3, 4, 5, 6, 7], [8, 9, 10, 11, 12]);
        assert_eq!(d.numbers().collect::<Vec<_>>(), (1..=12).collect::<Vec<u8>>());
        assert!(d.contains(12));
        assert!(!d.contains(13));
    }

    #[test]
    fn test_make_test_draws_are_well_formed() {
        let draws = make_test_draws(40);
        assert_eq!(draws.len(), 40);
        assert!(draws.iter().all(|d| d.is_well_formed()));
        // le plus récent a la date la plus grande
        assert!(draws[0].date > draws[1].date);
    }
}
