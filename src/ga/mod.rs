pub mod agent;
pub mod genome;
pub mod population;
pub mod selector;

pub use agent::{Agent, DeathCause, GoalScoring, Status};
pub use genome::Genome;
pub use population::{AgentView, Population, Snapshot, TickStats};
pub use selector::Selector;
