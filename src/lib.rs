//! Phase classification of spin-lattice configurations and phase-diagram sweeps.
//!
//! A sweep reads one neighbour-list structure file and, for every point of a
//! two-parameter grid, one spin file written by the Monte-Carlo solver. Each
//! configuration is classified against collinear, conical, random and
//! domain-wall order and painted with the colour of its phase.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod utils;

pub use error::{PhaseError, Result};
