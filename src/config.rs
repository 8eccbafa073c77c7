// src/config.rs

use crate::error::{PhaseError, Result};
use crate::io::PathNames;
use crate::physics::rules::RuleTable;
use crate::physics::sweep::ParameterGrid;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

// --- Axes ---

/// Values of one control parameter.
///
/// A range steps over integers and divides afterwards (`k / divisor` for
/// `k in start..stop`), so grid points land on exactly representable
/// decimals and match the solver's file names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    Values(Vec<f64>),
    Range { start: i64, stop: i64, divisor: f64 },
}

impl AxisSpec {
    pub fn values(&self) -> Result<Vec<f64>> {
        match self {
            AxisSpec::Values(v) => Ok(v.clone()),
            AxisSpec::Range { start, stop, divisor } => {
                if *divisor == 0.0 || !divisor.is_finite() {
                    return Err(PhaseError::Config(format!("invalid axis divisor {}", divisor)));
                }
                Ok((*start..*stop).map(|k| k as f64 / divisor).collect())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    pub first: AxisSpec,
    pub second: AxisSpec,
}

impl Default for Variables {
    fn default() -> Self {
        Self {
            first: AxisSpec::Range { start: 0, stop: 101, divisor: 10.0 },
            second: AxisSpec::Range { start: -50, stop: 51, divisor: 5.0 },
        }
    }
}

// --- Main Config Struct ---

fn default_output() -> PathBuf {
    PathBuf::from("phase_diagram.json")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub paths: PathNames,

    #[serde(default)]
    pub variables: Variables,

    #[serde(default)]
    pub rules: RuleTable,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            paths: PathNames::default(),
            variables: Variables::default(),
            rules: RuleTable::default(),
            output: default_output(),
        }
    }
}

impl SweepConfig {
    /// Loads config from the standard OS location (e.g. ~/.config/spinphase/sweep.json)
    pub fn load() -> (Self, String) {
        let path = Self::get_path();
        if path.exists() {
            match Self::from_file(&path) {
                Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
                Err(e) => (Self::default(), format!("Error loading config: {}", e)),
            }
        } else {
            (
                Self::default(),
                "No config found. Using defaults.".to_string(),
            )
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PhaseError::from_io(path, e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PhaseError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Saves config to `path`, or to the standard OS location.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::get_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PhaseError::from_io(parent, e))?;
        }

        let file = File::create(&path).map_err(|e| PhaseError::from_io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| PhaseError::from_io(&path, e))?;
        Ok(path)
    }

    pub fn grid(&self) -> Result<ParameterGrid> {
        Ok(ParameterGrid::new(
            self.variables.first.values()?,
            self.variables.second.values()?,
        ))
    }

    pub fn get_path() -> PathBuf {
        if let Some(proj) = ProjectDirs::from("org", "spinphase", "spinphase") {
            proj.config_dir().join("sweep.json")
        } else {
            PathBuf::from("sweep.json")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_axis_uses_integer_steps() {
        let axis = AxisSpec::Range { start: -2, stop: 3, divisor: 5.0 };
        assert_eq!(axis.values().unwrap(), vec![-0.4, -0.2, 0.0, 0.2, 0.4]);

        let bad = AxisSpec::Range { start: 0, stop: 3, divisor: 0.0 };
        assert!(bad.values().is_err());
    }

    #[test]
    fn test_default_grid_matches_driver() {
        let grid = SweepConfig::default().grid().unwrap();
        assert_eq!(grid.shape(), (101, 101));
        assert_eq!(grid.first[100], 10.0);
        assert_eq!(grid.second[0], -10.0);
    }

    #[test]
    fn test_parse_minimal_json() {
        let json = r#"{
            "paths": {
                "dir_prefix": "spins/",
                "file_prefix": "out",
                "variable_1": "_DM",
                "variable_2": "_K",
                "format": "{:.3f}",
                "structure": "structure_files/mc_vecinos_L16"
            },
            "variables": {
                "first": [0.0, 0.5],
                "second": { "start": 0, "stop": 4, "divisor": 2.0 }
            },
            "rules": "ferro_and_align_with_domain_walls"
        }"#;
        let cfg: SweepConfig = serde_json::from_str(json).unwrap();

        assert_eq!(cfg.paths.spin_suffix, "_spin");
        assert_eq!(cfg.rules, RuleTable::FerroAndAlignWithDomainWalls);
        assert_eq!(cfg.output, PathBuf::from("phase_diagram.json"));

        let grid = cfg.grid().unwrap();
        assert_eq!(grid.first, vec![0.0, 0.5]);
        assert_eq!(grid.second, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("nested/sweep.json");

        let mut cfg = SweepConfig::default();
        cfg.rules = RuleTable::FerroAndAlignWithDomainWalls;
        let written = cfg.save(Some(&target)).unwrap();

        assert_eq!(written, target);
        let text = fs::read_to_string(&target).unwrap();
        assert!(text.trim_end().ends_with('}'));
        assert_eq!(SweepConfig::from_file(&target).unwrap(), cfg);
    }
}
