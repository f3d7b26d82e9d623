use lesept_db::models::{Draw, Pool, MAX_NUM};

/// Statistiques dérivées d'une séquence de tirages. Toutes les tables sont
/// indexées par `numéro - 1` et couvrent les 28 numéros, vus ou non.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub primary_freq: Vec<u32>,
    pub secondary_freq: Vec<u32>,
    pub total_freq: Vec<u32>,
    /// Plus petit index (0 = plus récent) où le numéro apparaît, None si jamais vu.
    pub last_seen: Vec<Option<usize>>,
    /// Apparitions conjointes dans un même tirage. Symétrique, diagonale nulle.
    pub co_occurrence: Vec<Vec<u32>>,
    pub draw_count: usize,
    pub skipped_draws: usize,
}

pub fn analyze(draws: &[Draw]) -> Analysis {
    let mut analysis = Analysis {
        primary_freq: vec![0; MAX_NUM],
        secondary_freq: vec![0; MAX_NUM],
        total_freq: vec![0; MAX_NUM],
        last_seen: vec![None; MAX_NUM],
        co_occurrence: vec![vec![0; MAX_NUM]; MAX_NUM],
        draw_count: 0,
        skipped_draws: 0,
    };

    for (t, draw) in draws.iter().enumerate() {
        if !draw.is_well_formed() {
            analysis.skipped_draws += 1;
            continue;
        }
        analysis.draw_count += 1;

        for &n in &draw.primary {
            analysis.primary_freq[(n - 1) as usize] += 1;
        }
        for &n in &draw.secondary {
            analysis.secondary_freq[(n - 1) as usize] += 1;
        }

        let numbers: Vec<usize> = draw.numbers().map(|n| (n - 1) as usize).collect();
        for (i, &a) in numbers.iter().enumerate() {
            analysis.total_freq[a] += 1;
            if analysis.last_seen[a].is_none() {
                analysis.last_seen[a] = Some(t);
            }
            for &b in &numbers[i + 1..] {
                analysis.co_occurrence[a][b] += 1;
                analysis.co_occurrence[b][a] += 1;
            }
        }
    }

    if analysis.skipped_draws > 0 {
        log::warn!("analyse : {} tirage(s) malformé(s) ignoré(s)", analysis.skipped_draws);
    }

    analysis
}

impl Analysis {
    pub fn freq(&self, pool: Pool) -> &[u32] {
        match pool {
            Pool::Primary => &self.primary_freq,
            Pool::Secondary => &self.secondary_freq,
        }
    }

    /// Nombre de tirages depuis la dernière apparition. Un numéro jamais vu
    /// reçoit le nombre total de tirages.
    pub fn gap(&self, number: u8) -> usize {
        self.last_seen[(number - 1) as usize].unwrap_or(self.draw_count)
    }

    /// Part des apparitions dans le groupe principal, 0.5 si jamais vu.
    pub fn primary_ratio(&self, number: u8) -> f64 {
        let idx = (number - 1) as usize;
        let total = self.total_freq[idx];
        if total == 0 {
            0.5
        } else {
            self.primary_freq[idx] as f64 / total as f64
        }
    }

    /// Vrai si le numéro sort plus souvent (ou autant) en principal qu'en secondaire.
    pub fn is_primary_leaning(&self, number: u8) -> bool {
        let idx = (number - 1) as usize;
        self.primary_freq[idx] >= self.secondary_freq[idx]
    }

    pub fn total_occurrences(&self) -> u64 {
        self.total_freq.iter().map(|&c| c as u64).sum()
    }
}
