use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use super::genome::Genome;
use crate::util::world::{Goal, World};

/// Distances to the goal are floored to this before the inverse-square fitness
const MIN_GOAL_DISTANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OutOfBounds,
    /// Index into the world's obstacle list
    Obstacle(usize),
    /// Every gene was used up
    OutOfMoves,
    /// Killed by the population for exceeding the step budget
    OutOfBudget,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::OutOfBounds => write!(f, "out of bounds"),
            DeathCause::Obstacle(i) => write!(f, "hit obstacle {}", i),
            DeathCause::OutOfMoves => write!(f, "out of moves"),
            DeathCause::OutOfBudget => write!(f, "out of step budget"),
        }
    }
}

/// Lifecycle of a dot. `Dead` and `ReachedGoal` are absorbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumIs)]
pub enum Status {
    Active,
    Dead(DeathCause),
    ReachedGoal,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Dead(cause) => write!(f, "dead ({})", cause),
            Status::ReachedGoal => write!(f, "reached goal"),
        }
    }
}

/// Fitness constants for dots that reach the goal
#[derive(Clone, Copy, Debug)]
pub struct GoalScoring {
    pub bonus: f64,
    pub scale: f64,
}

impl Default for GoalScoring {
    fn default() -> Self {
        Self {
            bonus: 1.0 / 16.0,
            scale: 1000.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    genome: Genome,
    position: DVec2,
    velocity: DVec2,
    acceleration: DVec2,
    status: Status,
    elite: bool,
    /// Genome cursor at the tick the goal was reached
    goal_step: Option<usize>,
    pub fitness: f64,
}

impl Agent {
    pub fn new(genome: Genome, start: DVec2) -> Self {
        Self {
            genome,
            position: start,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            status: Status::Active,
            elite: false,
            goal_step: None,
            fitness: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Advance one tick. Returns the new status if this tick ended the dot's run.
    pub fn step(&mut self, world: &World, max_velocity: f64) -> Option<Status> {
        if self.status.is_terminal() {
            return None;
        }

        let Some(acceleration) = self.genome.next_vector() else {
            return self.terminate(Status::Dead(DeathCause::OutOfMoves));
        };
        self.acceleration = acceleration;

        self.velocity = (self.velocity + self.acceleration).clamp_length_max(max_velocity);
        self.position += self.velocity;

        if world.near_edge(self.position) {
            self.terminate(Status::Dead(DeathCause::OutOfBounds))
        } else if world.goal.contains(self.position) {
            self.goal_step = Some(self.genome.cursor());
            self.terminate(Status::ReachedGoal)
        } else if let Some(i) = world.obstacle_at(self.position) {
            self.terminate(Status::Dead(DeathCause::Obstacle(i)))
        } else {
            None
        }
    }

    /// Force an active dot to stop, e.g. when it runs over the step budget.
    /// Terminal dots are left untouched.
    pub fn kill(&mut self, cause: DeathCause) -> Option<Status> {
        if self.status.is_terminal() {
            return None;
        }
        self.terminate(Status::Dead(cause))
    }

    fn terminate(&mut self, status: Status) -> Option<Status> {
        self.status = status;
        Some(status)
    }

    pub fn compute_fitness(&mut self, goal: &Goal, scoring: GoalScoring) -> f64 {
        self.fitness = match self.goal_step {
            Some(step) if self.status == Status::ReachedGoal => {
                let step = step.max(1) as f64;
                scoring.bonus + scoring.scale / (step * step)
            }
            _ => {
                let distance = self.position.distance(goal.position).max(MIN_GOAL_DISTANCE);
                1.0 / (distance * distance)
            }
        };
        self.fitness
    }

    /// Fresh dot at `start` carrying an unmutated copy of this genome
    pub fn reproduce(&self, start: DVec2) -> Self {
        Self::new(self.genome.replicate(), start)
    }

    /// Like [Agent::reproduce], but the child is tagged as its generation's elite
    pub fn reproduce_elite(&self, start: DVec2) -> Self {
        Self {
            elite: true,
            ..self.reproduce(start)
        }
    }

    pub(crate) fn genome_mut(&mut self) -> &mut Genome {
        &mut self.genome
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_elite(&self) -> bool {
        self.elite
    }

    pub fn goal_step(&self) -> Option<usize> {
        self.goal_step
    }
}
