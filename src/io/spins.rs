// src/io/spins.rs
//
// Spin file: one `<idx> sx sy sz` record per atom, no header.

use crate::error::{PhaseError, Result};
use crate::model::Spin;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

pub fn parse(path: &Path, n_atoms: usize) -> Result<Vec<Spin>> {
    let file = File::open(path).map_err(|e| PhaseError::from_io(path, e))?;
    parse_reader(io::BufReader::new(file), n_atoms, &path.display().to_string())
}

/// Reads exactly `n_atoms` records; anything after them is ignored.
pub fn parse_reader<R: BufRead>(reader: R, n_atoms: usize, source: &str) -> Result<Vec<Spin>> {
    let mut spins = Vec::with_capacity(n_atoms);

    for (i, line) in reader.lines().take(n_atoms).enumerate() {
        let line = line.map_err(|e| PhaseError::from_io(source, e))?;
        let line_no = i + 1;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(PhaseError::malformed(
                source,
                line_no,
                format!("expected 4 fields, found {}", parts.len()),
            ));
        }

        let mut s = [0.0; 3];
        for (c, raw) in s.iter_mut().zip(&parts[1..4]) {
            *c = raw.parse().map_err(|_| {
                PhaseError::malformed(source, line_no, format!("invalid spin component '{}'", raw))
            })?;
        }
        spins.push(Spin::from(s));
    }

    if spins.len() < n_atoms {
        return Err(PhaseError::malformed(
            source,
            spins.len() + 1,
            format!("expected {} spin records, found {}", n_atoms, spins.len()),
        ));
    }

    Ok(spins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_spins() {
        let text = "1 0.0 0.0 1.0\n2 0.6 0.8 0.0\n";
        let spins = parse_reader(Cursor::new(text), 2, "spins").unwrap();
        assert_eq!(spins.len(), 2);
        assert!((spins[0].z - 1.0).abs() < 1e-12);
        assert!((spins[1].y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_scientific_notation() {
        let text = "1 1.0E-3 -2.5e-1 9.68e-01\n";
        let spins = parse_reader(Cursor::new(text), 1, "spins").unwrap();
        assert!((spins[0].x - 0.001).abs() < 1e-12);
        assert!((spins[0].y + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_missing_records() {
        let text = "1 0.0 0.0 1.0\n";
        let err = parse_reader(Cursor::new(text), 3, "spins").unwrap_err();
        assert!(matches!(err, PhaseError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_non_numeric_component() {
        let text = "1 0.0 nope 1.0\n";
        assert!(parse_reader(Cursor::new(text), 1, "spins").is_err());
    }
}
