// src/physics/sweep.rs
//
// Phase-diagram sweep: one spin configuration per (var1, var2) grid point,
// all sharing a single lattice topology.

use crate::error::{PhaseError, Result};
use crate::io::{LatticeLoader, PathResolver};
use crate::model::{Color, Lattice, Spin};
use crate::physics::criteria::PhaseClassifier;
use crate::physics::rules::RuleTable;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Values taken by the two control parameters. Rows follow `first`,
/// columns follow `second`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterGrid {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl ParameterGrid {
    pub fn new(first: Vec<f64>, second: Vec<f64>) -> Self {
        Self { first, second }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.first.len(), self.second.len())
    }

    pub fn len(&self) -> usize {
        self.first.len() * self.second.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid points in row-major order: `(row, col, var1, var2)`.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.first.iter().enumerate().flat_map(move |(row, &v1)| {
            self.second
                .iter()
                .enumerate()
                .map(move |(col, &v2)| (row, col, v1, v2))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellFailure {
    pub row: usize,
    pub col: usize,
    pub var1: f64,
    pub var2: f64,
    pub path: PathBuf,
    pub reason: String,
}

/// The sweep's output: one colour per grid point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseDiagram {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    /// `colors[row][col]`, row = first variable, col = second variable
    pub colors: Vec<Vec<Color>>,
    #[serde(default)]
    pub failures: Vec<CellFailure>,
}

impl PhaseDiagram {
    pub fn shape(&self) -> (usize, usize) {
        (self.first.len(), self.second.len())
    }

    pub fn color(&self, row: usize, col: usize) -> Option<Color> {
        self.colors.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Cells whose right or lower neighbour has a different colour; these are
    /// where the renderer draws phase-boundary segments.
    pub fn boundaries(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (row, line) in self.colors.iter().enumerate() {
            for (col, color) in line.iter().enumerate() {
                let right = line.get(col + 1).is_some_and(|c| c != color);
                let below = self
                    .colors
                    .get(row + 1)
                    .and_then(|next| next.get(col))
                    .is_some_and(|c| c != color);
                if right || below {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Number of cells per colour, keyed by hex code.
    pub fn color_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for color in self.colors.iter().flatten() {
            *counts.entry(color.to_hex()).or_insert(0) += 1;
        }
        counts
    }
}

/// Walks a [`ParameterGrid`], loading and classifying every point.
pub struct PhaseSweep<'a, R: PathResolver, L: LatticeLoader> {
    resolver: &'a R,
    loader: L,
    progress: Option<ProgressBar>,
}

impl<'a, R: PathResolver, L: LatticeLoader> PhaseSweep<'a, R, L> {
    pub fn new(resolver: &'a R, loader: L) -> Self {
        Self {
            resolver,
            loader,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Colours every grid point with one of the built-in rule tables.
    pub fn build_with_rules(&self, grid: &ParameterGrid, table: RuleTable) -> Result<PhaseDiagram> {
        self.build(grid, |classifier, spins| table.classify(classifier, spins))
    }

    /// Colours every grid point with `classify`.
    ///
    /// The first grid point's lattice fixes the topology: its sublattices are
    /// labelled once and the resulting classifier is handed to every cell. If
    /// that first load fails the sweep fails. Later cells that are missing,
    /// degenerate or of a different size are recorded in `failures` and
    /// painted [`Color::ERROR`]; any other error aborts the sweep.
    pub fn build<F>(&self, grid: &ParameterGrid, classify: F) -> Result<PhaseDiagram>
    where
        F: Fn(&PhaseClassifier, &[Spin]) -> Color,
    {
        if grid.is_empty() {
            return Err(PhaseError::EmptyGrid);
        }

        let structure = self.resolver.structure_path();
        let paths = self.resolve_paths(grid)?;

        let first = self.loader.load(&structure, &paths[0])?;
        let classifier = PhaseClassifier::from_lattice(&first)?;
        log::info!(
            "Bound lattice context: {} atoms, extent {:.2}",
            classifier.n_atoms(),
            first.size
        );

        let (rows, cols) = grid.shape();
        let mut colors = vec![vec![Color::ERROR; cols]; rows];
        let mut failures = Vec::new();
        let mut first = Some(first);

        for ((row, col, var1, var2), path) in grid.points().zip(&paths) {
            log::debug!("var1: {} var2: {}", var1, var2);

            let lattice = match first.take() {
                Some(lattice) => Ok(lattice),
                None => self.loader.load(&structure, path),
            };

            match lattice.and_then(|l| classify_cell(&classifier, &l, &classify)) {
                Ok(color) => colors[row][col] = color,
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping ({}, {}): {}", var1, var2, e);
                    failures.push(CellFailure {
                        row,
                        col,
                        var1,
                        var2,
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }

            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
        if !failures.is_empty() {
            log::warn!("{} of {} grid points could not be classified", failures.len(), grid.len());
        }

        Ok(PhaseDiagram {
            first: grid.first.clone(),
            second: grid.second.clone(),
            colors,
            failures,
        })
    }

    /// Spin file for every point, row-major. Two points must never share a file.
    fn resolve_paths(&self, grid: &ParameterGrid) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::with_capacity(grid.len());
        let mut paths = Vec::with_capacity(grid.len());

        for (_, _, var1, var2) in grid.points() {
            let path = self.resolver.spin_path(var1, var2);
            if !seen.insert(path.clone()) {
                return Err(PhaseError::PathCollision { path });
            }
            paths.push(path);
        }
        Ok(paths)
    }
}

fn classify_cell<F>(classifier: &PhaseClassifier, lattice: &Lattice, classify: &F) -> Result<Color>
where
    F: Fn(&PhaseClassifier, &[Spin]) -> Color,
{
    if lattice.n_atoms != classifier.n_atoms() {
        return Err(PhaseError::TopologyMismatch {
            expected: classifier.n_atoms(),
            found: lattice.n_atoms,
        });
    }
    classifier.check_spins(&lattice.spins)?;
    Ok(classify(classifier, &lattice.spins))
}
