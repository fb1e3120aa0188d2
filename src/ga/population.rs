use anyhow::{Context, Result, bail};
use glam::DVec2;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::Bernoulli;
use serde::Serialize;
use tracing::{debug, trace};

use super::{
    agent::{Agent, DeathCause, GoalScoring, Status},
    genome::Genome,
    selector::Selector,
};
use crate::util::{PopEvaluation, blueprint::Blueprint, world::World};

/// Status transitions counted since the start of the current generation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    pub ticks: usize,
    /// Every death, budget kills included
    pub dead: usize,
    pub reached_goal: usize,
    pub out_of_budget: usize,
}

impl TickStats {
    fn record(&mut self, transition: Status) {
        match transition {
            Status::Active => {}
            Status::Dead(cause) => {
                self.dead += 1;
                if cause == DeathCause::OutOfBudget {
                    self.out_of_budget += 1;
                }
            }
            Status::ReachedGoal => self.reached_goal += 1,
        }
    }
}

/// What a renderer needs to draw one dot
#[derive(Clone, Copy, Debug, Serialize)]
pub struct AgentView {
    pub position: DVec2,
    pub status: Status,
    pub elite: bool,
}

/// Per-tick view of the whole cohort
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub generation: usize,
    pub stats: TickStats,
    pub agents: Vec<AgentView>,
}

/// Fixed-size cohort of dots plus everything needed to breed the next one
pub struct Population {
    agents: Vec<Agent>,
    generation: usize,
    fitness_sum: f64,
    min_step_budget: usize,
    stats: TickStats,
    world: World,
    max_velocity: f64,
    scoring: GoalScoring,
    mutation: Bernoulli,
    rng: StdRng,
}

impl Population {
    /// Random cohort drawn from the blueprint's seed, or from OS entropy if unseeded
    pub fn new(blueprint: &Blueprint) -> Result<Self> {
        let rng = match blueprint.ga.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(blueprint, rng)
    }

    pub fn with_rng(blueprint: &Blueprint, mut rng: StdRng) -> Result<Self> {
        let start = blueprint.world.start;
        let agents = (0..blueprint.ga.population_size)
            .map(|_| Agent::new(Genome::random(blueprint.ga.genome_length, &mut rng), start))
            .collect();
        Self::from_agents(blueprint, agents, rng)
    }

    /// Build a population around an existing cohort
    pub fn from_agents(blueprint: &Blueprint, agents: Vec<Agent>, rng: StdRng) -> Result<Self> {
        if agents.is_empty() {
            bail!("A population needs at least one agent");
        }
        let mutation = Bernoulli::new(blueprint.ga.mutation_rate).with_context(|| {
            format!("Invalid mutation rate {}", blueprint.ga.mutation_rate)
        })?;

        Ok(Self {
            agents,
            generation: 1,
            fitness_sum: 0.0,
            min_step_budget: blueprint.ga.genome_length,
            stats: TickStats::default(),
            world: blueprint.world.clone(),
            max_velocity: blueprint.agent.max_velocity,
            scoring: GoalScoring {
                bonus: blueprint.ga.goal_fitness_bonus,
                scale: blueprint.ga.goal_fitness_scale,
            },
            mutation,
            rng,
        })
    }

    /// Advance every dot by one tick. Active dots that have already read more
    /// genes than the step budget allows are killed instead of moved.
    pub fn step_generation(&mut self) {
        for agent in &mut self.agents {
            let transition = if agent.genome().cursor() > self.min_step_budget {
                agent.kill(DeathCause::OutOfBudget)
            } else {
                agent.step(&self.world, self.max_velocity)
            };
            if let Some(status) = transition {
                self.stats.record(status);
            }
        }
        self.stats.ticks += 1;
        trace!(
            "gen {} tick {}: {} reached goal, {} dead",
            self.generation, self.stats.ticks, self.stats.reached_goal, self.stats.dead
        );
    }

    pub fn all_terminal(&self) -> bool {
        self.agents.iter().all(|a| !a.is_active())
    }

    /// Score every dot and summarize the generation
    pub fn evaluate(&mut self) -> PopEvaluation {
        let goal = self.world.goal;
        let scoring = self.scoring;
        self.fitness_sum = self
            .agents
            .iter_mut()
            .map(|a| a.compute_fitness(&goal, scoring))
            .sum();

        let best_fitness = self.agents[self.best_index()].fitness;
        let reached_goal = self
            .agents
            .iter()
            .filter(|a| a.status() == Status::ReachedGoal)
            .count();

        PopEvaluation {
            generation: self.generation,
            best_fitness,
            avg_fitness: self.fitness_sum / self.agents.len() as f64,
            fitness_sum: self.fitness_sum,
            reached_goal,
            min_step_budget: self.min_step_budget,
        }
    }

    /// Index of the fittest dot, ties go to the lowest index
    pub fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, agent) in self.agents.iter().enumerate().skip(1) {
            if agent.fitness > self.agents[best].fitness {
                best = i;
            }
        }
        best
    }

    /// Roulette pick of a parent index from the current cohort
    pub fn select_parent(&mut self) -> Result<usize> {
        let selector = Selector::new(&self.agents)?;
        Ok(selector.select(&mut self.rng))
    }

    /// Replace the cohort with children of the current one. Slot 0 holds an
    /// unmutated copy of the best dot; the rest are drawn by roulette from
    /// the fitness evaluated on the old cohort.
    pub fn next_generation(&mut self) -> Result<()> {
        let best = self.best_index();
        let start = self.world.start;
        let elite = &self.agents[best];

        let mut children = Vec::with_capacity(self.agents.len());
        children.push(elite.reproduce_elite(start));

        if let Some(step) = elite.goal_step() {
            if step != self.min_step_budget {
                debug!(
                    "Step budget {} -> {} (elite {} reached goal)",
                    self.min_step_budget, step, best
                );
            }
            self.min_step_budget = step;
        }

        let selector = Selector::new(&self.agents)?;
        for _ in 1..self.agents.len() {
            let parent = selector.agent(selector.select(&mut self.rng));
            children.push(parent.reproduce(start));
        }

        self.agents = children;
        self.generation += 1;
        self.stats = TickStats::default();

        Ok(())
    }

    /// Mutate every dot except the elite in slot 0. Returns the number of genes replaced.
    pub fn mutate_cohort(&mut self) -> usize {
        let mut count = 0;
        for agent in self.agents.iter_mut().skip(1) {
            count += agent.genome_mut().mutate(self.mutation, &mut self.rng);
        }
        trace!("Mutated {} genes in generation {}", count, self.generation);
        count
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.generation,
            stats: self.stats,
            agents: self
                .agents
                .iter()
                .map(|a| AgentView {
                    position: a.position(),
                    status: a.status(),
                    elite: a.is_elite(),
                })
                .collect(),
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn update_agent_fitness(&mut self, ix: usize, fitness: f64) {
        self.agents[ix].fitness = fitness;
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn fitness_sum(&self) -> f64 {
        self.fitness_sum
    }

    pub fn min_step_budget(&self) -> usize {
        self.min_step_budget
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
