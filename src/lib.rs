pub mod experiment;
pub mod ga;
pub mod util;

pub use util::blueprint;
