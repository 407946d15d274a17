/// Forward neighbour offsets of the square lattice: one step along rows, one along columns.
pub const SQUARE_OFFSETS: [[isize; 2]; 2] = [[1, 0], [0, 1]];

/// Periodic `n x n` square lattice with a precomputed neighbour table.
///
/// Sites are indexed in row-major order, `site = i * n + j`. Both edges wrap,
/// so `(i ± 1) mod n` and `(j ± 1) mod n` are always valid neighbours.
#[derive(Debug, Clone)]
pub struct Torus {
    /// Side length.
    pub n: usize,
    /// Total number of sites (`n * n`).
    pub n_sites: usize,
    /// Layout: `neighbors[(site * 2 + d) * 2 + dir]`, `dir = 0` forward along
    /// offset `d`, `dir = 1` backward.
    neighbors: Vec<u32>,
}

impl Torus {
    pub fn new(n: usize) -> Self {
        let n_sites = n * n;
        debug_assert!(n_sites <= u32::MAX as usize);
        let n_offsets = SQUARE_OFFSETS.len();
        let mut neighbors = vec![0u32; n_sites * n_offsets * 2];

        for site in 0..n_sites {
            let (i, j) = (site / n, site % n);
            for (d, off) in SQUARE_OFFSETS.iter().enumerate() {
                for (dir, sign) in [(0, 1isize), (1, -1isize)] {
                    let ni = (i as isize + sign * off[0]).rem_euclid(n as isize) as usize;
                    let nj = (j as isize + sign * off[1]).rem_euclid(n as isize) as usize;
                    neighbors[(site * n_offsets + d) * 2 + dir] = (ni * n + nj) as u32;
                }
            }
        }

        Self {
            n,
            n_sites,
            neighbors,
        }
    }

    #[inline]
    pub fn site(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.n && j < self.n);
        i * self.n + j
    }

    /// Neighbour of `site` along offset `d`; `forward = false` steps the other way.
    #[inline]
    pub fn neighbor(&self, site: usize, d: usize, forward: bool) -> usize {
        self.neighbors[(site * SQUARE_OFFSETS.len() + d) * 2 + (!forward as usize)] as usize
    }

    /// The four nearest neighbours of `site`: down, up, right, left.
    #[inline]
    pub fn neighbors4(&self, site: usize) -> [usize; 4] {
        [
            self.neighbor(site, 0, true),
            self.neighbor(site, 0, false),
            self.neighbor(site, 1, true),
            self.neighbor(site, 1, false),
        ]
    }
}
