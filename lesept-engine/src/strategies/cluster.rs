use std::collections::HashMap;

use lesept_db::models::{Draw, MAX_NUM};
use super::frequency::MostFrequentStrategy;
use super::{format_numbers, Strategy, StrategyResult};
use crate::analyzer::Analysis;
use crate::payout;
use crate::selection::{fill_from, finalize, merge_split, rank_desc};

/// Détection de communautés façon Louvain, simplifiée.
///
/// Chaque numéro part seul dans sa communauté. À chaque passe (3 au plus), un
/// numéro rejoint, parmi les autres communautés, celle qui maximise
/// `liens(i, c) - degré(i) * degré_total(c) / 2m` si ce gain est strictement
/// positif. Arrêt anticipé dès qu'une passe ne déplace rien. Seules les
/// communautés de 4 à 9 numéros sont évaluées.
pub struct ClusterStrategy {
    stake: f64,
}

pub const MAX_PASSES: usize = 3;
pub const MIN_COMMUNITY_SIZE: usize = 4;
pub const MAX_COMMUNITY_SIZE: usize = 9;
const TARGET_COMMUNITY_SIZE: f64 = 8.0;
const SIZE_PENALTY: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct CommunityScore {
    /// Membres triés par numéro.
    pub members: Vec<u8>,
    /// Membres à penchant principal, par fréquence principale décroissante.
    pub primary: Vec<u8>,
    /// Membres à penchant secondaire, par fréquence secondaire décroissante.
    pub secondary: Vec<u8>,
    pub strength: f64,
    pub avg_payout: f64,
    pub ev: f64,
}

impl ClusterStrategy {
    pub fn new(stake: f64) -> Self {
        Self { stake }
    }
}

/// Co-occurrences divisées par le maximum global (tout à 0 si aucune).
pub fn normalized_weights(analysis: &Analysis) -> Vec<Vec<f64>> {
    let max = analysis.co_occurrence.iter().flatten().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![vec![0.0; MAX_NUM]; MAX_NUM];
    }
    analysis
        .co_occurrence
        .iter()
        .map(|row| row.iter().map(|&c| c as f64 / max as f64).collect())
        .collect()
}

/// Une passe de déplacements, dans l'ordre des numéros. Renvoie le nombre de déplacements.
///
/// Le gain vers une communauté `c` est `liens(i, c) - degré(i) * degré_total(c) / 2m`,
/// calculé sans `i`. Le numéro rejoint la communauté de meilleur gain strictement
/// positif parmi les autres communautés non vides (la première en cas d'égalité).
fn move_pass(weights: &[Vec<f64>], degree: &[f64], two_m: f64, community: &mut [usize]) -> usize {
    let n = weights.len();
    let mut moved = 0usize;

    for i in 0..n {
        let current = community[i];
        let mut links = vec![0.0f64; n];
        let mut totals = vec![0.0f64; n];
        let mut sizes = vec![0usize; n];
        for j in 0..n {
            if j == i {
                continue;
            }
            links[community[j]] += weights[i][j];
            totals[community[j]] += degree[j];
            sizes[community[j]] += 1;
        }

        let mut best: Option<(usize, f64)> = None;
        for c in 0..n {
            if c == current || sizes[c] == 0 {
                continue;
            }
            let g = links[c] - degree[i] * totals[c] / two_m;
            if g > 0.0 && best.map_or(true, |(_, best_g)| g > best_g) {
                best = Some((c, g));
            }
        }

        if let Some((c, _)) = best {
            community[i] = c;
            moved += 1;
        }
    }
    moved
}

/// Affectation finale et nombre de passes effectuées.
fn assign_communities(weights: &[Vec<f64>]) -> (Vec<usize>, usize) {
    let n = weights.len();
    let degree: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();
    let two_m: f64 = degree.iter().sum();
    let mut community: Vec<usize> = (0..n).collect();
    let mut passes = 0usize;

    if two_m > 0.0 {
        while passes < MAX_PASSES {
            let moved = move_pass(weights, &degree, two_m, &mut community);
            passes += 1;
            log::debug!("cluster : passe {} , {} déplacement(s)", passes, moved);
            if moved == 0 {
                break;
            }
        }
    }
    (community, passes)
}

/// Communautés (numéros triés), ordonnées par plus petit membre.
pub fn detect_communities(weights: &[Vec<f64>]) -> Vec<Vec<u8>> {
    let (community, _) = assign_communities(weights);
    let mut groups: Vec<Vec<u8>> = vec![Vec::new(); community.len()];
    for (i, &c) in community.iter().enumerate() {
        groups[c].push((i + 1) as u8);
    }
    let mut groups: Vec<Vec<u8>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    groups.sort_by_key(|g| g[0]);
    groups
}

/// Force, gain moyen compatible et EV d'une communauté.
pub fn score_community(members: &[u8], weights: &[Vec<f64>], analysis: &Analysis) -> CommunityScore {
    let freq = |n: u8, primary: bool| {
        let idx = (n - 1) as usize;
        if primary { analysis.primary_freq[idx] } else { analysis.secondary_freq[idx] }
    };

    let mut primary: Vec<u8> = members.iter().copied().filter(|&n| analysis.is_primary_leaning(n)).collect();
    let mut secondary: Vec<u8> = members.iter().copied().filter(|&n| !analysis.is_primary_leaning(n)).collect();
    primary.sort_by(|&a, &b| freq(b, true).cmp(&freq(a, true)).then(a.cmp(&b)));
    secondary.sort_by(|&a, &b| freq(b, false).cmp(&freq(a, false)).then(a.cmp(&b)));

    let mut pair_sum = 0.0f64;
    let mut pairs = 0usize;
    for (k, &a) in members.iter().enumerate() {
        for &b in &members[k + 1..] {
            pair_sum += weights[(a - 1) as usize][(b - 1) as usize];
            pairs += 1;
        }
    }
    let mean_weight = if pairs > 0 { pair_sum / pairs as f64 } else { 0.0 };
    let size_fit = (1.0 - SIZE_PENALTY * (members.len() as f64 - TARGET_COMMUNITY_SIZE).abs()).max(0.0);
    let strength = mean_weight * size_fit;

    let avg_payout = payout::average_payout_for_split(primary.len(), secondary.len());

    CommunityScore {
        members: members.to_vec(),
        primary,
        secondary,
        strength,
        avg_payout,
        ev: strength * avg_payout,
    }
}

/// Communautés retenues (taille 4..=9) avec leur score, dans l'ordre de détection.
pub fn scored_communities(analysis: &Analysis) -> Vec<CommunityScore> {
    let weights = normalized_weights(analysis);
    detect_communities(&weights)
        .into_iter()
        .filter(|c| (MIN_COMMUNITY_SIZE..=MAX_COMMUNITY_SIZE).contains(&c.len()))
        .map(|c| score_community(&c, &weights, analysis))
        .collect()
}

impl Strategy for ClusterStrategy {
    fn id(&self) -> &str {
        "cluster_ev"
    }

    fn label(&self) -> &str {
        "Clusters EV"
    }

    fn score(&self, _draws: &[Draw], analysis: &Analysis) -> StrategyResult {
        let communities = scored_communities(analysis);

        // à EV égale, la première communauté détectée l'emporte
        let best = communities
            .iter()
            .fold(None::<&CommunityScore>, |best, c| match best {
                Some(b) if b.ev >= c.ev => Some(b),
                _ => Some(c),
            });

        let Some(best) = best else {
            log::debug!("cluster : aucune communauté de {}-{} numéros, repli sur les plus fréquents",
                MIN_COMMUNITY_SIZE, MAX_COMMUNITY_SIZE);
            let numbers = MostFrequentStrategy::select(analysis);
            let description = format!(
                "Aucune communauté de {} à {} numéros, repli sur les plus fréquents : {}",
                MIN_COMMUNITY_SIZE,
                MAX_COMMUNITY_SIZE,
                format_numbers(&numbers)
            );
            return StrategyResult::ia(self, numbers, 0.0, self.stake, description);
        };

        let mut selected = merge_split(&best.primary, &best.secondary, 4, 3);
        // communauté trop courte : on complète par la fréquence globale
        fill_from(&mut selected, &rank_desc(&analysis.total_freq));
        let numbers = finalize(selected);

        let description = format!(
            "Communauté [{}] ({} retenue(s)), force {:.3} x gain moyen {:.0} : {}",
            format_numbers(&best.members),
            communities.len(),
            best.strength,
            best.avg_payout,
            format_numbers(&numbers)
        );
        StrategyResult::ia(self, numbers, best.ev, self.stake, description)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("max_passes".to_string(), MAX_PASSES as f64),
            ("min_size".to_string(), MIN_COMMUNITY_SIZE as f64),
            ("max_size".to_string(), MAX_COMMUNITY_SIZE as f64),
        ])
    }
}
