use glam::DVec2;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, StandardNormal};

/// Samples shorter than this are drawn again instead of normalized
const MIN_SAMPLE_LENGTH: f64 = 1e-12;

/// Draw a uniformly distributed direction by normalizing a standard normal 2D sample
pub fn random_direction<R: Rng>(rng: &mut R) -> DVec2 {
    loop {
        let v = DVec2::new(
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
        );
        let len = v.length();
        if len > MIN_SAMPLE_LENGTH {
            return v / len;
        }
    }
}

/// Fixed-length sequence of unit direction vectors, read one per tick.
///
/// The genes are never resized after creation. The cursor only moves forward.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    genes: Vec<DVec2>,
    cursor: usize,
}

impl Genome {
    pub fn random<R: Rng>(length: usize, rng: &mut R) -> Self {
        Self {
            genes: (0..length).map(|_| random_direction(rng)).collect(),
            cursor: 0,
        }
    }

    /// Build a genome from explicit directions. Each one is normalized,
    /// zero vectors are replaced by a random direction.
    pub fn from_directions<R: Rng>(directions: &[DVec2], rng: &mut R) -> Self {
        let genes = directions
            .iter()
            .map(|d| {
                let len = d.length();
                if len > MIN_SAMPLE_LENGTH {
                    *d / len
                } else {
                    random_direction(rng)
                }
            })
            .collect();
        Self { genes, cursor: 0 }
    }

    /// Copy of the genes with the cursor rewound to the start
    pub fn replicate(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            cursor: 0,
        }
    }

    /// Replace each gene with a fresh random direction with the probability of `mutation`.
    /// Returns the number of genes replaced.
    pub fn mutate<R: Rng>(&mut self, mutation: Bernoulli, rng: &mut R) -> usize {
        let mut count = 0;
        for gene in &mut self.genes {
            if mutation.sample(rng) {
                *gene = random_direction(rng);
                count += 1;
            }
        }
        count
    }

    /// Next gene to apply, `None` once every gene has been read
    pub fn next_vector(&mut self) -> Option<DVec2> {
        let gene = self.genes.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(gene)
    }

    pub fn genes(&self) -> &[DVec2] {
        &self.genes
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.genes.len()
    }
}
