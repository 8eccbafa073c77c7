// src/model/lattice.rs

use nalgebra::Vector3;

/// Every atom in the solver's output has exactly this many nearest neighbours.
pub const NEIGHBORS_PER_ATOM: usize = 3;

pub type Spin = Vector3<f64>;
pub type NeighborSet = [usize; NEIGHBORS_PER_ATOM];

/// A spin lattice as written by the Monte-Carlo solver.
///
/// Atom identity is positional: `positions[i]`, `neighbors[i]` and `spins[i]`
/// all describe atom `i`. Neighbour indices are already 0-based.
#[derive(Clone, Debug, Default)]
pub struct Lattice {
    pub n_atoms: usize,
    pub positions: Vec<Vector3<f64>>,
    pub neighbors: Vec<NeighborSet>,
    pub spins: Vec<Spin>,
    // Extent of the bounding box along each axis
    pub dimensions: Vector3<f64>,
    // Largest component of `dimensions`
    pub size: f64,
}

impl Lattice {
    pub fn new(positions: Vec<Vector3<f64>>, neighbors: Vec<NeighborSet>, spins: Vec<Spin>) -> Self {
        let (dimensions, size) = bounding_extent(&positions);
        Self {
            n_atoms: positions.len(),
            positions,
            neighbors,
            spins,
            dimensions,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n_atoms == 0
    }
}

/// Per-axis `max - min` of the positions, plus the largest of the three.
pub fn bounding_extent(positions: &[Vector3<f64>]) -> (Vector3<f64>, f64) {
    let Some(first) = positions.first() else {
        return (Vector3::zeros(), 0.0);
    };

    let (min, max) = positions
        .iter()
        .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));

    let dimensions = max - min;
    (dimensions, dimensions.max())
}
