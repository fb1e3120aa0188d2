pub mod blueprint;
pub mod world;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

// structs

/// Fitness summary of a single generation, taken right after evaluation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopEvaluation {
    pub generation: usize,
    pub best_fitness: f64,
    pub avg_fitness: f64,
    pub fitness_sum: f64,
    pub reached_goal: usize,
    pub min_step_budget: usize,
}

/// Fitness history of a whole run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExpHistory {
    pub best_fitness_vec: Vec<f64>,
    pub avg_fitness_vec: Vec<f64>,
}

impl ExpHistory {
    pub fn with_capacity(num_generations: usize) -> Self {
        Self {
            best_fitness_vec: Vec::with_capacity(num_generations),
            avg_fitness_vec: Vec::with_capacity(num_generations),
        }
    }

    pub fn push(&mut self, evaluation: &PopEvaluation) {
        self.best_fitness_vec.push(evaluation.best_fitness);
        self.avg_fitness_vec.push(evaluation.avg_fitness);
    }

    pub fn len(&self) -> usize {
        self.best_fitness_vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness_vec.is_empty()
    }
}

// util functions

pub fn env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("${} not set", key))
}

/// Parse a log level name, `None` if it is not one
pub fn parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.to_uppercase().as_str() {
        "OFF" => Some(LevelFilter::OFF),
        "ERROR" => Some(LevelFilter::ERROR),
        "WARN" => Some(LevelFilter::WARN),
        "INFO" => Some(LevelFilter::INFO),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "TRACE" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

#[macro_export]
macro_rules! bail_assert {
    ($cond:expr) => {
        if !$cond {
            bail!("Assertion failed: {}", stringify!($cond));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            bail!($($arg)+);
        }
    };
}
