// src/io/paths.rs
//
// File naming used by the solver's output tree:
//
//   <dir_prefix>[<folder>/]<file_prefix><var1_name><var1><var2_name><var2>[_spin]
//
// e.g. "spins/J5/min_files/out_DM1.200_K-0.500_spin".

use crate::error::{PhaseError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maps a sweep point to the files the sweep has to read.
pub trait PathResolver {
    /// Structure (neighbour list) file shared by every point of the sweep.
    fn structure_path(&self) -> PathBuf;

    /// Spin configuration for the point `(var1, var2)`.
    fn spin_path(&self, var1: f64, var2: f64) -> PathBuf;
}

fn default_spin_suffix() -> String {
    "_spin".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathNames {
    /// Common prefix of every directory, including the trailing separator
    pub dir_prefix: String,
    pub file_prefix: String,
    /// Tag in front of the first variable, e.g. "_DM"
    pub variable_1: String,
    /// Tag in front of the second variable, e.g. "_K"
    pub variable_2: String,
    /// Python-style number format, "{:.3f}" or "{}"
    pub format: String,
    pub structure: String,

    /// Initial-condition sub-directory; empty means directly under `dir_prefix`
    #[serde(default)]
    pub folder: String,

    #[serde(default = "default_spin_suffix")]
    pub spin_suffix: String,
}

impl Default for PathNames {
    fn default() -> Self {
        Self {
            dir_prefix: "spins/J5/min_files/".to_string(),
            file_prefix: "out".to_string(),
            variable_1: "_DM".to_string(),
            variable_2: "_K".to_string(),
            format: "{:.3f}".to_string(),
            structure: "structure_files/mc_vecinos_L16".to_string(),
            folder: String::new(),
            spin_suffix: default_spin_suffix(),
        }
    }
}

/// How a variable value is rendered inside a file name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VarFormat {
    /// Fixed number of decimals, "{:.Nf}"
    Fixed(usize),
    /// Shortest round-trip representation, "{}" (Python float repr)
    Shortest,
}

impl VarFormat {
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec == "{}" {
            return Ok(VarFormat::Shortest);
        }

        // "{:.N}" without the 'f' means N significant digits in Python; not supported
        let precision = spec
            .strip_prefix("{:.")
            .and_then(|s| s.strip_suffix("f}"))
            .and_then(|digits| digits.parse::<usize>().ok());

        match precision {
            Some(p) => Ok(VarFormat::Fixed(p)),
            None => Err(PhaseError::Config(format!(
                "unsupported number format '{}' (expected \"{{:.Nf}}\" or \"{{}}\")",
                spec
            ))),
        }
    }

    pub fn apply(&self, value: f64) -> String {
        match self {
            VarFormat::Fixed(p) => format!("{:.*}", p, value),
            VarFormat::Shortest => python_repr(value),
        }
    }
}

/// Python's `repr` of a float: shortest round-trip digits, positional for
/// decimal exponents in [-4, 16) and scientific ("1e-05", "1.5e+16") otherwise.
fn python_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Rust's "{:e}" yields the same shortest digits, e.g. "1.5e-5"
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let s = format!("{}", value);
        // Python always keeps a fractional part on floats ("1.0", not "1")
        if s.contains('.') {
            s
        } else {
            format!("{}.0", s)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[derive(Clone, Debug)]
pub struct PathManager {
    names: PathNames,
    var_format: VarFormat,
}

impl PathManager {
    pub fn new(names: PathNames) -> Result<Self> {
        let var_format = VarFormat::parse(&names.format)?;
        Ok(Self { names, var_format })
    }

    /// Full path (without spin suffix) for initial condition `folder` and the two variables.
    pub fn file_path(&self, folder: &str, var1: f64, var2: f64) -> String {
        let mut path = self.folder_path(folder);
        path.push_str(&self.names.file_prefix);
        path.push_str(&self.names.variable_1);
        path.push_str(&self.var_to_str(var1));
        path.push_str(&self.names.variable_2);
        path.push_str(&self.var_to_str(var2));
        path
    }

    pub fn folder_path(&self, folder: &str) -> String {
        if folder.is_empty() {
            self.names.dir_prefix.clone()
        } else {
            format!("{}{}/", self.names.dir_prefix, folder)
        }
    }

    /// Directory holding the minimum-energy configurations.
    pub fn min_path(&self) -> String {
        format!("{}min_files/", self.names.dir_prefix)
    }

    pub fn var_to_str(&self, value: f64) -> String {
        self.var_format.apply(value)
    }
}

impl PathResolver for PathManager {
    fn structure_path(&self) -> PathBuf {
        PathBuf::from(&self.names.structure)
    }

    fn spin_path(&self, var1: f64, var2: f64) -> PathBuf {
        let mut path = self.file_path(&self.names.folder, var1, var2);
        path.push_str(&self.names.spin_suffix);
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(format: &str) -> PathManager {
        PathManager::new(PathNames {
            dir_prefix: "x/".to_string(),
            file_prefix: "out".to_string(),
            variable_1: "_DM".to_string(),
            variable_2: "_K".to_string(),
            format: format.to_string(),
            structure: "structure_files/mc_vecinos_L16".to_string(),
            folder: String::new(),
            spin_suffix: "_spin".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_file_path() {
        let paths = manager("{:.3f}");
        assert_eq!(paths.file_path("", 1.2, -0.5), "x/out_DM1.200_K-0.500");
    }

    #[test]
    fn test_spin_path_and_folders() {
        let paths = manager("{:.3f}");
        assert_eq!(
            paths.spin_path(1.2, -0.5),
            PathBuf::from("x/out_DM1.200_K-0.500_spin")
        );
        assert_eq!(paths.file_path("ferro", 0.0, 2.0), "x/ferro/out_DM0.000_K2.000");
        assert_eq!(paths.folder_path("ferro"), "x/ferro/");
        assert_eq!(paths.min_path(), "x/min_files/");
    }

    #[test]
    fn test_var_formats() {
        assert_eq!(VarFormat::parse("{:.3f}").unwrap(), VarFormat::Fixed(3));
        assert_eq!(VarFormat::parse("{}").unwrap(), VarFormat::Shortest);
        assert!(VarFormat::parse("%.3f").is_err());
        // Python reads "{:.3}" as significant digits ("1.2"), not decimals
        assert!(VarFormat::parse("{:.3}").is_err());

        assert_eq!(VarFormat::Fixed(1).apply(-0.26), "-0.3");
        assert_eq!(VarFormat::Shortest.apply(2.0), "2.0");
        assert_eq!(VarFormat::Shortest.apply(0.1), "0.1");
        assert_eq!(VarFormat::Shortest.apply(-0.5), "-0.5");
        assert_eq!(VarFormat::Shortest.apply(0.0001), "0.0001");
        assert_eq!(VarFormat::Shortest.apply(1e-5), "1e-05");
        assert_eq!(VarFormat::Shortest.apply(-2.5e-7), "-2.5e-07");
        assert_eq!(VarFormat::Shortest.apply(1e16), "1e+16");
        assert_eq!(VarFormat::Shortest.apply(123456789012345.0), "123456789012345.0");
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut names = PathNames::default();
        names.format = "{:e}".to_string();
        assert!(matches!(PathManager::new(names), Err(PhaseError::Config(_))));
    }
}
