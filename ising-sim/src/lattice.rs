use rand::Rng;

use crate::error::{IsingError, Result};
use crate::geometry::Torus;
use crate::spins::{self, SpinGrid};

/// Square Ising lattice with periodic boundaries.
///
/// Owns its spin buffer, the toroidal neighbour table, and the thermodynamic
/// parameters the Metropolis sweep reads. One lattice belongs to exactly one
/// simulation run.
#[derive(Debug, Clone)]
pub struct Lattice {
    torus: Torus,
    state: SpinGrid,
    /// Temperature in units of `J / k`.
    pub temperature: f64,
    /// External field `h`.
    pub field: f64,
}

impl Lattice {
    /// Create an `size x size` lattice, copying `init_state` when supplied and
    /// drawing independent uniform ±1 spins otherwise.
    pub fn new<R: Rng>(
        size: usize,
        temperature: f64,
        field: f64,
        init_state: Option<&SpinGrid>,
        rng: &mut R,
    ) -> Result<Self> {
        match init_state {
            Some(state) => Self::from_state(size, temperature, field, state),
            None => Self::random(size, temperature, field, rng),
        }
    }

    /// Lattice with every spin independently +1 or -1 with probability 1/2.
    pub fn random<R: Rng>(size: usize, temperature: f64, field: f64, rng: &mut R) -> Result<Self> {
        if size == 0 {
            return Err(IsingError::InvalidDimension { size });
        }
        let mut state = SpinGrid::filled(size, size, 1);
        for s in state.as_mut_slice() {
            *s = if rng.gen::<f32>() < 0.5 { -1 } else { 1 };
        }
        Ok(Self {
            torus: Torus::new(size),
            state,
            temperature,
            field,
        })
    }

    /// Lattice starting from a copy of `init_state`.
    ///
    /// The shape must be `size x size`; spin values are taken as given.
    pub fn from_state(
        size: usize,
        temperature: f64,
        field: f64,
        init_state: &SpinGrid,
    ) -> Result<Self> {
        if size == 0 {
            return Err(IsingError::InvalidDimension { size });
        }
        if init_state.shape() != (size, size) {
            return Err(IsingError::InitialStateShape {
                expected: size * size,
                actual: init_state.rows * init_state.cols,
            });
        }
        Ok(Self {
            torus: Torus::new(size),
            state: init_state.clone(),
            temperature,
            field,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.torus.n
    }

    #[inline]
    pub fn n_sites(&self) -> usize {
        self.torus.n_sites
    }

    #[inline]
    pub fn state(&self) -> &SpinGrid {
        &self.state
    }

    /// Owned copy of the current configuration.
    pub fn snapshot(&self) -> SpinGrid {
        self.state.clone()
    }

    #[inline]
    pub fn spin(&self, i: usize, j: usize) -> i8 {
        self.state.get(i, j)
    }

    /// Reverse the spin at `(i, j)`.
    #[inline]
    pub fn flip(&mut self, i: usize, j: usize) {
        let s = self.state.get(i, j);
        self.state.set(i, j, -s);
    }

    /// Energy contribution of the spin at `(i, j)`, see [`spins::local_energy`].
    pub fn local_energy(&self, i: usize, j: usize) -> f64 {
        let site = self.torus.site(i, j);
        spins::local_energy(&self.torus, self.state.as_slice(), self.field, site)
    }

    /// Energy change if the spin at `(i, j)` were reversed.
    pub fn flip_energy(&self, i: usize, j: usize) -> f64 {
        let site = self.torus.site(i, j);
        spins::flip_energy(&self.torus, self.state.as_slice(), self.field, site)
    }

    pub fn total_energy(&self) -> f64 {
        spins::total_energy(&self.torus, self.state.as_slice(), self.field)
    }

    /// Mean spin.
    pub fn magnetization(&self) -> f64 {
        self.state.mean()
    }
}
