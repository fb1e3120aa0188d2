use anyhow::{Result, bail};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::agent::Agent;

/// Fitness-proportionate (roulette) parent selection over one cohort
pub struct Selector<'a> {
    agents: &'a [Agent],
    /// Running fitness sums, `cumulative[i]` covers agents `0..=i`
    cumulative: Vec<f64>,
    dist: Option<Uniform<f64>>,
}

impl<'a> Selector<'a> {
    pub fn new(agents: &'a [Agent]) -> Result<Self> {
        if agents.is_empty() {
            bail!("Cannot select from an empty cohort");
        }

        let mut cumulative = Vec::with_capacity(agents.len());
        let mut total_fitness = 0.0;
        for agent in agents {
            if agent.fitness < 0.0 {
                bail!("Roulette selection requires all fitness values to be non-negative");
            }
            total_fitness += agent.fitness;
            cumulative.push(total_fitness);
        }

        // a zero or overflowing total falls back to a uniform pick
        let dist = if total_fitness > 0.0 && total_fitness.is_finite() {
            Uniform::new(0.0, total_fitness).ok()
        } else {
            None
        };

        Ok(Self {
            agents,
            cumulative,
            dist,
        })
    }

    pub fn fitness_sum(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Draw a parent index
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        match &self.dist {
            Some(dist) => self.select_at(dist.sample(rng)),
            None => rng.random_range(0..self.agents.len()),
        }
    }

    /// Index of the first agent whose running fitness sum is strictly greater than `pick`
    pub fn select_at(&self, pick: f64) -> usize {
        let ix = self.cumulative.partition_point(|&c| c <= pick);
        ix.min(self.agents.len() - 1)
    }

    pub fn agent(&self, ix: usize) -> &'a Agent {
        &self.agents[ix]
    }
}
