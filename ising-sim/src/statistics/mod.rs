pub mod results;
mod stats;

pub use results::{FieldSweepResult, TemperatureSweepResult};
pub use stats::{column_mean, column_variance, Statistics};
