// src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("Input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    MalformedRecord {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Lattice is not bipartite: atoms {atom} and {neighbor} both carry sublattice {label}")]
    NonBipartiteLattice {
        atom: usize,
        neighbor: usize,
        label: i8,
    },

    #[error("Degenerate spin array: {0}")]
    DegenerateSpinArray(String),

    #[error("Topology mismatch: context has {expected} atoms, lattice has {found}")]
    TopologyMismatch { expected: usize, found: usize },

    #[error("Parameter grid is empty")]
    EmptyGrid,

    #[error("Two grid points resolve to the same file: {}", path.display())]
    PathCollision { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PhaseError>;

impl PhaseError {
    /// Wraps an I/O failure on `path`, mapping `NotFound` to `MissingInputFile`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            PhaseError::MissingInputFile { path }
        } else {
            PhaseError::Io { path, source }
        }
    }

    pub fn malformed(path: &str, line: usize, reason: impl Into<String>) -> Self {
        PhaseError::MalformedRecord {
            path: path.to_string(),
            line,
            reason: reason.into(),
        }
    }

    /// Per-cell errors: the sweep marks the cell and moves on.
    /// Anything else invalidates the whole diagram.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PhaseError::MissingInputFile { .. }
                | PhaseError::DegenerateSpinArray(_)
                | PhaseError::TopologyMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_missing_file() {
        let err = PhaseError::from_io("spins/out_spin", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, PhaseError::MissingInputFile { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_structural_errors_are_fatal() {
        let err = PhaseError::malformed("structure", 3, "expected 7 fields, found 4");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "structure:3: expected 7 fields, found 4");

        let err = PhaseError::NonBipartiteLattice { atom: 2, neighbor: 0, label: 1 };
        assert!(!err.is_recoverable());
    }
}
