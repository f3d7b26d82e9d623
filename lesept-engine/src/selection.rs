use lesept_db::models::{MAX_NUM, PLAYER_PICK};

/// Numéros 1..=28 triés par compte décroissant, à égalité le plus petit d'abord.
pub fn rank_desc(counts: &[u32]) -> Vec<u8> {
    let mut numbers: Vec<u8> = (1..=MAX_NUM as u8).collect();
    numbers.sort_by(|&a, &b| counts[(b - 1) as usize].cmp(&counts[(a - 1) as usize]).then(a.cmp(&b)));
    numbers
}

/// Numéros 1..=28 triés par compte croissant (les jamais vus en tête), à égalité le plus petit d'abord.
pub fn rank_asc(counts: &[u32]) -> Vec<u8> {
    let mut numbers: Vec<u8> = (1..=MAX_NUM as u8).collect();
    numbers.sort_by(|&a, &b| counts[(a - 1) as usize].cmp(&counts[(b - 1) as usize]).then(a.cmp(&b)));
    numbers
}

/// Numéros triés par score décroissant, à égalité le plus petit d'abord.
/// Un score NaN est classé en dernier.
pub fn rank_scores_desc(scores: &[f64]) -> Vec<u8> {
    let key = |n: u8| {
        let s = scores[(n - 1) as usize];
        if s.is_nan() { f64::NEG_INFINITY } else { s }
    };
    let mut numbers: Vec<u8> = (1..=scores.len() as u8).collect();
    numbers.sort_by(|&a, &b| key(b).total_cmp(&key(a)).then(a.cmp(&b)));
    numbers
}

/// Sous-ensemble d'un classement retenu par un prédicat, ordre conservé.
pub fn filter_ranked(ranked: &[u8], keep: impl Fn(u8) -> bool) -> Vec<u8> {
    ranked.iter().copied().filter(|&n| keep(n)).collect()
}

/// Ne garde que les numéros de compte non nul, ordre conservé.
pub fn nonzero(ranked: &[u8], counts: &[u32]) -> Vec<u8> {
    ranked.iter().copied().filter(|&n| counts[(n - 1) as usize] > 0).collect()
}

fn push_unique(selected: &mut Vec<u8>, number: u8) {
    if !selected.contains(&number) {
        selected.push(number);
    }
}

/// Complète avec les plus petits numéros inutilisés, en ordre croissant.
pub fn pad(selected: &mut Vec<u8>) {
    for n in 1..=MAX_NUM as u8 {
        if selected.len() >= PLAYER_PICK {
            break;
        }
        push_unique(selected, n);
    }
}

/// Complète en suivant un classement donné (sans doublon).
pub fn fill_from(selected: &mut Vec<u8>, ranked: &[u8]) {
    for &n in ranked {
        if selected.len() >= PLAYER_PICK {
            break;
        }
        push_unique(selected, n);
    }
}

/// Prend le top `n_primary` de la première liste et le top `n_secondary` de la
/// seconde, sans doublon. Si les recouvrements laissent moins de 7 numéros, on
/// continue dans la liste principale puis dans la secondaire.
pub fn merge_split(primary_ranked: &[u8], secondary_ranked: &[u8], n_primary: usize, n_secondary: usize) -> Vec<u8> {
    let mut selected = Vec::with_capacity(PLAYER_PICK);
    for &n in primary_ranked.iter().take(n_primary) {
        push_unique(&mut selected, n);
    }
    for &n in secondary_ranked.iter().take(n_secondary) {
        push_unique(&mut selected, n);
    }

    let mut primary_rest = primary_ranked.iter().skip(n_primary);
    let mut secondary_rest = secondary_ranked.iter().skip(n_secondary);
    while selected.len() < PLAYER_PICK {
        let next = primary_rest
            .find(|n| !selected.contains(n))
            .or_else(|| secondary_rest.find(|n| !selected.contains(n)));
        match next {
            Some(&n) => selected.push(n),
            None => break,
        }
    }
    selected
}

/// Grille finale : complétée, tronquée à 7, triée pour l'affichage.
pub fn finalize(mut selected: Vec<u8>) -> [u8; PLAYER_PICK] {
    selected.retain(|&n| n >= 1 && n as usize <= MAX_NUM);
    let mut unique = Vec::with_capacity(PLAYER_PICK);
    fill_from(&mut unique, &selected);
    pad(&mut unique);

    let mut numbers = [0u8; PLAYER_PICK];
    numbers.copy_from_slice(&unique[..PLAYER_PICK]);
    numbers.sort();
    numbers
}

/// Vérifie qu'une grille contient 7 numéros distincts dans 1..=28.
pub fn is_valid_ticket(numbers: &[u8]) -> bool {
    numbers.len() == PLAYER_PICK
        && numbers.iter().all(|&n| n >= 1 && n as usize <= MAX_NUM)
        && (0..numbers.len()).all(|i| !numbers[i + 1..].contains(&numbers[i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_desc_tie_lower_number_first() {
        let mut counts = vec![0u32; MAX_NUM];
        counts[4] = 3;
        counts[9] = 3;
        counts[1] = 5;
        let ranked = rank_desc(&counts);
        assert_eq!(&ranked[..4], &[2, 5, 10, 1]);
    }

    #[test]
    fn test_rank_asc_unseen_first() {
        let mut counts = vec![1u32; MAX_NUM];
        counts[8] = 0;
        counts[20] = 0;
        let ranked = rank_asc(&counts);
        assert_eq!(&ranked[..3], &[9, 21, 1]);
    }

    #[test]
    fn test_pad_lowest_unused_ascending() {
        let mut selected = vec![3, 20];
        pad(&mut selected);
        assert_eq!(selected, vec![3, 20, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_merge_split_no_overlap() {
        let selected = merge_split(&[1, 2, 3, 4, 5], &[8, 9, 10, 11], 4, 3);
        assert_eq!(selected, vec![1, 2, 3, 4, 8, 9, 10]);
    }

    #[test]
    fn test_merge_split_overlap_falls_back_to_next_ranked() {
        // 3 et 4 sont dans les deux tops
        let selected = merge_split(&[1, 2, 3, 4, 5, 6], &[3, 4, 9, 10], 4, 3);
        assert_eq!(selected, vec![1, 2, 3, 4, 9, 5, 6]);
    }

    #[test]
    fn test_merge_split_short_lists() {
        let selected = merge_split(&[1], &[2], 4, 3);
        assert_eq!(selected, vec![1, 2]);
        assert_eq!(finalize(selected), [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_finalize_sorted_and_valid() {
        let numbers = finalize(vec![28, 14, 14, 3]);
        assert_eq!(numbers, [1, 2, 3, 4, 5, 14, 28]);
        assert!(is_valid_ticket(&numbers));
    }

    #[test]
    fn test_rank_scores_desc_handles_nan() {
        let mut scores = vec![0.0; MAX_NUM];
        scores[6] = 0.9;
        scores[2] = f64::NAN;
        let ranked = rank_scores_desc(&scores);
        assert_eq!(ranked[0], 7);
        assert_eq!(ranked.len(), MAX_NUM);
    }

    #[test]
    fn test_is_valid_ticket() {
        assert!(is_valid_ticket(&[1, 2, 3, 4, 5, 6, 7]));
        assert!(!is_valid_ticket(&[1, 2, 3, 4, 5, 6, 6]));
        assert!(!is_valid_ticket(&[0, 2, 3, 4, 5, 6, 7]));
        assert!(!is_valid_ticket(&[1, 2, 3]));
    }
}
