/// Pattern generation orchestration and run outcomes
pub mod generator;

pub use generator::{PatternGenerator, PatternSummary, Termination, create_pattern};
