use serde::Serialize;

use lesept_db::models::{Draw, PLAYER_PICK, PRIMARY_COUNT, SECONDARY_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoutRow {
    pub total_matched: u8,
    pub primary_matched: u8,
    pub secondary_matched: u8,
    /// Chance de gain : 1 sur `odds_denominator`.
    pub odds_denominator: f64,
    pub payout: f64,
}

const fn row(total: u8, primary: u8, secondary: u8, odds: f64, payout: f64) -> PayoutRow {
    PayoutRow {
        total_matched: total,
        primary_matched: primary,
        secondary_matched: secondary,
        odds_denominator: odds,
        payout,
    }
}

/// Barème des gains pour une mise de 2.00, trié par nombre total de bons numéros décroissant.
/// Cotes = C(28,7) / (C(7,p) * C(5,s) * C(16,7-t)).
pub const PAYOUT_TABLE: [PayoutRow; 20] = [
    row(7, 7, 0, 1_184_040.00, 1_000_000.0),
    row(7, 6, 1, 33_829.71, 20_000.0),
    row(7, 5, 2, 5_638.29, 3_000.0),
    row(7, 4, 3, 3_382.97, 2_000.0),
    row(7, 3, 4, 6_765.94, 4_000.0),
    row(7, 2, 5, 56_382.86, 30_000.0),
    row(6, 6, 0, 10_571.79, 5_000.0),
    row(6, 5, 1, 704.79, 400.0),
    row(6, 4, 2, 211.44, 120.0),
    row(6, 3, 3, 211.44, 120.0),
    row(6, 2, 4, 704.79, 400.0),
    row(6, 1, 5, 10_571.79, 5_000.0),
    row(5, 5, 0, 469.86, 250.0),
    row(5, 4, 1, 56.38, 30.0),
    row(5, 3, 2, 28.19, 15.0),
    row(5, 2, 3, 46.99, 25.0),
    row(5, 1, 4, 281.91, 150.0),
    row(5, 0, 5, 9_867.00, 5_000.0),
    row(4, 4, 0, 60.41, 30.0),
    row(4, 0, 4, 422.87, 200.0),
];

fn mean_payout<'a>(rows: impl Iterator<Item = &'a PayoutRow>) -> f64 {
    let (sum, n) = rows.fold((0.0, 0usize), |(sum, n), r| (sum + r.payout, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

pub fn average_payout() -> f64 {
    mean_payout(PAYOUT_TABLE.iter())
}

/// Gain moyen des rangs dominés par les numéros principaux (p > s).
pub fn average_primary_payout() -> f64 {
    mean_payout(PAYOUT_TABLE.iter().filter(|r| r.primary_matched > r.secondary_matched))
}

/// Gain moyen des rangs où les secondaires pèsent autant ou plus (s >= p).
pub fn average_secondary_payout() -> f64 {
    mean_payout(PAYOUT_TABLE.iter().filter(|r| r.secondary_matched >= r.primary_matched))
}

/// Gain moyen des rangs à 7 bons numéros atteignables avec `primary_available`
/// principaux et `secondary_available` secondaires. 0 si aucun rang compatible.
pub fn average_payout_for_split(primary_available: usize, secondary_available: usize) -> f64 {
    mean_payout(PAYOUT_TABLE.iter().filter(|r| {
        r.total_matched as usize == PLAYER_PICK
            && r.primary_matched as usize <= primary_available
            && r.secondary_matched as usize <= secondary_available
    }))
}

/// EV par approximation d'indépendance : chaque rang pèse
/// (p / PRIMARY_COUNT) * (s / SECONDARY_COUNT). Volontairement non combinatoire,
/// les EV ne servent qu'à comparer les stratégies entre elles.
pub fn independence_ev() -> f64 {
    PAYOUT_TABLE
        .iter()
        .map(|r| {
            let primary_fraction = r.primary_matched as f64 / PRIMARY_COUNT as f64;
            let secondary_fraction = r.secondary_matched as f64 / SECONDARY_COUNT as f64;
            r.payout * primary_fraction * secondary_fraction
        })
        .sum()
}

pub fn lookup(primary_matched: usize, secondary_matched: usize) -> Option<&'static PayoutRow> {
    PAYOUT_TABLE.iter().find(|r| {
        r.primary_matched as usize == primary_matched && r.secondary_matched as usize == secondary_matched
    })
}

/// Rang gagné par une grille sur un tirage donné, s'il y en a un.
pub fn prize_for(ticket: &[u8], draw: &Draw) -> Option<&'static PayoutRow> {
    let primary = ticket.iter().filter(|n| draw.primary.contains(n)).count();
    let secondary = ticket.iter().filter(|n| draw.secondary.contains(n)).count();
    lookup(primary, secondary)
}
