pub mod torus;

pub use torus::{Torus, SQUARE_OFFSETS};
