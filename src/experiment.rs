use anyhow::{Result, bail};
use tracing::{debug, info, trace};

use crate::{
    ga::{Population, Snapshot},
    util::{ExpHistory, PopEvaluation, blueprint::Blueprint},
};

/// Hooks for whatever is watching the run, e.g. a renderer
pub trait Observer {
    fn on_tick(&mut self, _snapshot: &Snapshot) {}
    fn on_generation(&mut self, _evaluation: &PopEvaluation) {}
}

/// Observer that does nothing
pub struct Headless;

impl Observer for Headless {}

/// Why an experiment stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishReason {
    Generations,
    Threshold,
}

/// Runs a population through its generations: tick until every dot has
/// stopped, then score, breed and mutate.
pub struct Experiment<O: Observer> {
    blueprint: Blueprint,
    population: Population,
    observer: O,
    history: ExpHistory,
}

impl<O: Observer> Experiment<O> {
    pub fn new(blueprint: Blueprint, observer: O) -> Result<Self> {
        blueprint.validate()?;
        let population = Population::new(&blueprint)?;
        Ok(Self::with_population(blueprint, population, observer))
    }

    pub fn with_population(blueprint: Blueprint, population: Population, observer: O) -> Self {
        let history = ExpHistory::with_capacity(blueprint.ga.num_generations);
        Self {
            blueprint,
            population,
            observer,
            history,
        }
    }

    pub fn run(&mut self) -> Result<FinishReason> {
        info!(
            "🧪 Evolving {} dots for {} generations",
            self.blueprint.ga.population_size, self.blueprint.ga.num_generations
        );

        for _ in 0..self.blueprint.ga.num_generations {
            let evaluation = self.run_generation()?;

            if let Some(f) = self.blueprint.ga.fitness_threshold
                && evaluation.best_fitness >= f
            {
                info!("Population reached fitness threshold. Ending experiment.");
                return Ok(FinishReason::Threshold);
            }

            self.evolve()?;
        }

        info!("🧪 Finished after {} generations", self.history.len());
        Ok(FinishReason::Generations)
    }

    /// Tick the current cohort to completion and score it
    pub fn run_generation(&mut self) -> Result<PopEvaluation> {
        // every tick reads one gene per active dot, so this is never reached by a sound population
        let max_ticks = self.blueprint.ga.genome_length + 2;

        while !self.population.all_terminal() {
            if self.population.stats().ticks >= max_ticks {
                bail!(
                    "Generation {} still has active dots after {} ticks",
                    self.population.generation(),
                    max_ticks
                );
            }
            self.population.step_generation();
            self.observer.on_tick(&self.population.snapshot());
        }

        let stats = self.population.stats();
        trace!("Evaluating population");
        let evaluation = self.population.evaluate();
        info!(
            "🧫 Generation {}: {} reached goal, {} dead ({} out of budget) in {} ticks, best fitness {:.6}, avg {:.6}",
            evaluation.generation,
            stats.reached_goal,
            stats.dead,
            stats.out_of_budget,
            stats.ticks,
            evaluation.best_fitness,
            evaluation.avg_fitness
        );

        self.history.push(&evaluation);
        self.observer.on_generation(&evaluation);
        Ok(evaluation)
    }

    /// Breed and mutate the next cohort from the scored one
    pub fn evolve(&mut self) -> Result<()> {
        self.population.next_generation()?;
        let mutated = self.population.mutate_cohort();
        debug!(
            "Bred generation {} ({} genes mutated, step budget {})",
            self.population.generation(),
            mutated,
            self.population.min_step_budget()
        );
        Ok(())
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn history(&self) -> &ExpHistory {
        &self.history
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}
