use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::world::World;
use crate::bail_assert;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AgentConfig {
    pub max_velocity: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_velocity: 15.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GAConfig {
    pub population_size: usize,
    pub genome_length: usize,
    pub mutation_rate: f64,
    pub num_generations: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub fitness_threshold: Option<f64>,
    /// Flat fitness awarded to every dot that reaches the goal
    #[serde(default = "default_goal_bonus")]
    pub goal_fitness_bonus: f64,
    /// Numerator of the steps-to-goal term
    #[serde(default = "default_goal_scale")]
    pub goal_fitness_scale: f64,
}

fn default_goal_bonus() -> f64 {
    1.0 / 16.0
}

fn default_goal_scale() -> f64 {
    1000.0
}

impl Default for GAConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            genome_length: 400,
            mutation_rate: 0.01,
            num_generations: 100,
            seed: None,
            fitness_threshold: None,
            goal_fitness_bonus: default_goal_bonus(),
            goal_fitness_scale: default_goal_scale(),
        }
    }
}

/// Static configuration of a run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Blueprint {
    pub world: World,
    #[serde(default)]
    pub agent: AgentConfig,
    pub ga: GAConfig,
}

impl Blueprint {
    pub fn from_file(path: &Path) -> Result<Self> {
        let blueprint_s = fs::read_to_string(path)
            .with_context(|| format!("Failed to open blueprint file `{}`", path.display()))?;
        let blueprint: Blueprint = toml::from_str(&blueprint_s)
            .with_context(|| format!("Failed to parse blueprint file `{}`", path.display()))?;
        Ok(blueprint)
    }

    pub fn validate(&self) -> Result<()> {
        // World

        let world = &self.world;
        bail_assert!(
            world.width > 0.0 && world.height > 0.0,
            "world.width and world.height must be greater than 0"
        );
        bail_assert!(world.margin >= 0.0, "world.margin must be non-negative");
        bail_assert!(
            2.0 * world.margin < world.width.min(world.height),
            "world.margin leaves no room inside the world bounds"
        );
        bail_assert!(
            !world.near_edge(world.start),
            "world.start ({}, {}) must lie inside the world bounds and margin",
            world.start.x,
            world.start.y
        );
        bail_assert!(
            world.goal.radius > 0.0,
            "world.goal.radius must be greater than 0"
        );
        bail_assert!(
            world.bounds().contains(world.goal.position),
            "world.goal.position ({}, {}) must lie inside the world bounds",
            world.goal.position.x,
            world.goal.position.y
        );
        for (i, rect) in world.obstacles.iter().enumerate() {
            bail_assert!(
                rect.width >= 0.0 && rect.height >= 0.0,
                "world.obstacles[{}] must have a non-negative size",
                i
            );
        }

        // Agent

        bail_assert!(
            self.agent.max_velocity > 0.0,
            "agent.max_velocity must be greater than 0"
        );

        // GA

        bail_assert!(
            self.ga.population_size > 0,
            "ga.population_size must be at least 1"
        );
        bail_assert!(
            self.ga.genome_length > 0,
            "ga.genome_length must be at least 1"
        );
        bail_assert!(
            self.ga.mutation_rate >= 0.0 && self.ga.mutation_rate <= 1.0,
            "ga.mutation_rate must be between 0 and 1"
        );
        bail_assert!(
            self.ga.num_generations > 0,
            "ga.num_generations must be at least 1"
        );
        bail_assert!(
            self.ga.goal_fitness_bonus >= 0.0 && self.ga.goal_fitness_scale > 0.0,
            "ga.goal_fitness_bonus must be non-negative and ga.goal_fitness_scale positive"
        );
        if let Some(f) = self.ga.fitness_threshold {
            bail_assert!(f > 0.0, "ga.fitness_threshold must be greater than 0");
        }

        Ok(())
    }
}
