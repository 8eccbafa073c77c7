// src/io/structure.rs
//
// Neighbour-list structure file written by the Monte-Carlo solver:
//
//   <tag> N ...                          header, field 1 is the atom count
//   <idx> x y z n1 n2 n3                 one record per atom, N records
//
// Neighbour indices are 1-based (Fortran) in the file and 0-based here.

use crate::error::{PhaseError, Result};
use crate::model::{NeighborSet, NEIGHBORS_PER_ATOM};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// Positions and neighbour lists, before any spins are attached.
#[derive(Clone, Debug)]
pub struct StructureData {
    pub positions: Vec<Vector3<f64>>,
    pub neighbors: Vec<NeighborSet>,
}

pub fn parse(path: &Path) -> Result<StructureData> {
    let file = File::open(path).map_err(|e| PhaseError::from_io(path, e))?;
    parse_reader(io::BufReader::new(file), &path.display().to_string())
}

pub fn parse_reader<R: BufRead>(reader: R, source: &str) -> Result<StructureData> {
    let mut lines = reader.lines();

    // 1. Header
    let header = lines
        .next()
        .ok_or_else(|| PhaseError::malformed(source, 1, "empty structure file"))?
        .map_err(|e| PhaseError::from_io(source, e))?;
    let n_atoms = parse_atom_count(&header, source)?;

    // 2. Atom records
    let mut positions = Vec::with_capacity(n_atoms);
    let mut neighbors = Vec::with_capacity(n_atoms);

    for i in 0..n_atoms {
        let line_no = i + 2;
        let line = lines
            .next()
            .ok_or_else(|| {
                PhaseError::malformed(
                    source,
                    line_no,
                    format!("expected {} atom records, file ends after {}", n_atoms, i),
                )
            })?
            .map_err(|e| PhaseError::from_io(source, e))?;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 + NEIGHBORS_PER_ATOM {
            return Err(PhaseError::malformed(
                source,
                line_no,
                format!("expected {} fields, found {}", 4 + NEIGHBORS_PER_ATOM, parts.len()),
            ));
        }

        let coord = |k: usize| -> Result<f64> {
            parts[k].parse::<f64>().map_err(|_| {
                PhaseError::malformed(source, line_no, format!("invalid coordinate '{}'", parts[k]))
            })
        };
        positions.push(Vector3::new(coord(1)?, coord(2)?, coord(3)?));

        let mut set = [0usize; NEIGHBORS_PER_ATOM];
        for (slot, raw) in set.iter_mut().zip(&parts[4..4 + NEIGHBORS_PER_ATOM]) {
            *slot = parse_neighbor(raw, n_atoms, source, line_no)?;
        }
        neighbors.push(set);
    }

    Ok(StructureData { positions, neighbors })
}

fn parse_atom_count(header: &str, source: &str) -> Result<usize> {
    let field = header
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| PhaseError::malformed(source, 1, "header has no atom count"))?;

    let n_atoms: usize = field
        .parse()
        .map_err(|_| PhaseError::malformed(source, 1, format!("invalid atom count '{}'", field)))?;

    if n_atoms == 0 {
        return Err(PhaseError::malformed(source, 1, "atom count must be positive"));
    }
    Ok(n_atoms)
}

/// 1-based index from the file -> 0-based index, range checked.
fn parse_neighbor(raw: &str, n_atoms: usize, source: &str, line_no: usize) -> Result<usize> {
    let one_based: i64 = raw.parse().map_err(|_| {
        PhaseError::malformed(source, line_no, format!("invalid neighbour index '{}'", raw))
    })?;

    if one_based < 1 || one_based as u64 > n_atoms as u64 {
        return Err(PhaseError::malformed(
            source,
            line_no,
            format!("neighbour index {} outside 1..={}", one_based, n_atoms),
        ));
    }
    Ok((one_based - 1) as usize)
}
