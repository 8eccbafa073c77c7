// src/io/mod.rs
pub mod paths;
pub mod spins;
pub mod structure;

use crate::error::{PhaseError, Result};
use crate::model::Lattice;
use crate::physics::sweep::PhaseDiagram;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub use paths::{PathManager, PathNames, PathResolver};

/// Reads a lattice from a structure file and a spin file.
///
/// The sweep goes through this trait so the file system can be swapped out.
pub trait LatticeLoader {
    fn load(&self, structure: &Path, spins: &Path) -> Result<Lattice>;
}

/// Loader backed by the solver's text files.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

impl LatticeLoader for FileLoader {
    fn load(&self, structure: &Path, spins: &Path) -> Result<Lattice> {
        load_lattice(structure, spins)
    }
}

pub fn load_lattice(structure_path: &Path, spin_path: &Path) -> Result<Lattice> {
    // Both files must exist before anything is parsed
    for path in [structure_path, spin_path] {
        if !path.exists() {
            return Err(PhaseError::MissingInputFile { path: path.to_path_buf() });
        }
    }

    let data = structure::parse(structure_path)?;
    let spins = spins::parse(spin_path, data.positions.len())?;

    Ok(Lattice::new(data.positions, data.neighbors, spins))
}

pub fn save_diagram(path: &Path, diagram: &PhaseDiagram) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PhaseError::from_io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PhaseError::from_io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, diagram)?;
    writer.flush().map_err(|e| PhaseError::from_io(path, e))?;
    Ok(())
}

pub fn load_diagram(path: &Path) -> Result<PhaseDiagram> {
    let file = File::open(path).map_err(|e| PhaseError::from_io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
