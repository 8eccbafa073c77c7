//src/model/mod.rs
pub mod color;
pub mod lattice;
pub mod sublattice;

// Re-exports for cleaner imports
pub use color::Color;
pub use lattice::{Lattice, NeighborSet, Spin, NEIGHBORS_PER_ATOM};
