pub mod energy;
pub mod grid;

pub use energy::{flip_energy, local_energy, total_energy, J};
pub use grid::SpinGrid;
