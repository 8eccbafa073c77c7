// src/model/sublattice.rs
//
// Two-colouring of the neighbour graph. Atom 0 seeds sublattice +1 and the
// labels propagate breadth-first; atoms not reachable from 0 stay at 0.

use crate::error::{PhaseError, Result};
use crate::model::lattice::NeighborSet;
use std::collections::VecDeque;

pub const UNASSIGNED: i8 = 0;

/// Breadth-first ±1 labelling starting from atom 0.
///
/// An atom takes the opposite sign of its first already-labelled neighbour
/// (in neighbour-array order). Unvisited, unlabelled neighbours are queued
/// in FIFO order. The result is only a consistent bipartition if the graph
/// actually is bipartite; see [`validate_bipartition`].
pub fn label(n_atoms: usize, neighbors: &[NeighborSet]) -> Vec<i8> {
    let mut labels = vec![UNASSIGNED; n_atoms];
    if n_atoms == 0 {
        return labels;
    }

    let mut queued = vec![false; n_atoms];
    let mut queue = VecDeque::new();

    labels[0] = 1;
    queued[0] = true;
    queue.push_back(0);

    while let Some(node) = queue.pop_front() {
        for &neighbor in &neighbors[node] {
            if labels[neighbor] != UNASSIGNED {
                if labels[node] == UNASSIGNED {
                    labels[node] = -labels[neighbor];
                }
            } else if !queued[neighbor] {
                queued[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    labels
}

/// Fails on the first pair of adjacent, labelled atoms sharing a sign
/// (an odd cycle reached by the traversal).
pub fn validate_bipartition(labels: &[i8], neighbors: &[NeighborSet]) -> Result<()> {
    for (atom, set) in neighbors.iter().enumerate() {
        let label = labels[atom];
        if label == UNASSIGNED {
            continue;
        }
        if let Some(&neighbor) = set.iter().find(|&&n| labels[n] == label) {
            return Err(PhaseError::NonBipartiteLattice { atom, neighbor, label });
        }
    }
    Ok(())
}

/// Label and validate in one step.
pub fn label_checked(n_atoms: usize, neighbors: &[NeighborSet]) -> Result<Vec<i8>> {
    let labels = label(n_atoms, neighbors);
    validate_bipartition(&labels, neighbors)?;

    let unassigned = labels.iter().filter(|&&l| l == UNASSIGNED).count();
    if unassigned > 0 {
        log::warn!("{} atoms are unreachable from atom 0 and carry no sublattice", unassigned);
    }
    Ok(labels)
}

/// Indices of the atoms on sublattice `which` (+1 or -1).
pub fn sublattice_indices(labels: &[i8], which: i8) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, &l)| l == which)
        .map(|(i, _)| i)
        .collect()
}
