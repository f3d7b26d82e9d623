use lesept_db::models::{Draw, MAX_NUM};
use crate::analyzer::Analysis;
use super::FeatureRow;

/// Plafond du retard avant normalisation.
pub const GAP_CAP: usize = 100;

/// Features de chaque numéro 1..=28 à partir de l'historique (draws[0] = le plus récent).
pub fn extract_features(draws: &[Draw], analysis: &Analysis, recent_window: usize, long_window: usize) -> Vec<FeatureRow> {
    (1..=MAX_NUM as u8)
        .map(|number| FeatureRow {
            number,
            features: compute_features_for_number(number, draws, analysis, recent_window, long_window),
        })
        .collect()
}

fn compute_features_for_number(
    number: u8,
    draws: &[Draw],
    analysis: &Analysis,
    recent_window: usize,
    long_window: usize,
) -> Vec<f64> {
    // lag : présent dans le dernier tirage
    let lag = match draws.first() {
        Some(latest) if latest.contains(number) => 1.0,
        _ => 0.0,
    };

    let freq_recent = frequency_in_window(number, draws, recent_window);
    let freq_long = frequency_in_window(number, draws, long_window);

    // gap_norm : retard plafonné à 100 puis ramené dans [0, 1], jamais vu = plafond
    let gap = analysis.last_seen[(number - 1) as usize].unwrap_or(GAP_CAP);
    let gap_norm = gap.min(GAP_CAP) as f64 / GAP_CAP as f64;

    let primary_ratio = analysis.primary_ratio(number);

    vec![
        lag,           // 0
        freq_recent,   // 1
        freq_long,     // 2
        gap_norm,      // 3
        primary_ratio, // 4
    ]
}

/// Part des `window` derniers tirages contenant le numéro (0 sans historique).
pub fn frequency_in_window(number: u8, draws: &[Draw], window: usize) -> f64 {
    let w = window.min(draws.len());
    if w == 0 {
        return 0.0;
    }
    let count = draws[..w].iter().filter(|d| d.contains(number)).count();
    count as f64 / w as f64
}
