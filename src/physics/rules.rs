// src/physics/rules.rs
//
// Rule tables: ordered (condition -> phase) lists, first match wins.
// Reordering entries moves phase boundaries.

use crate::model::{Color, Spin};
use crate::physics::criteria::PhaseClassifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    // Intermediate regions
    LocalAntiferro,
    AxialDisordered,
    PlanarDisordered,
    LocalFerro,
    // Global collinear order
    FerroZ,
    AntiferroZ,
    FerroXy,
    AntiferroXy,
    // Domain walls
    FerroDomainWall,
    AntiferroDomainWall,
    // Spirals
    GlobalConical,
    LocalConical,
    Random,
    Unclassified,
}

impl Phase {
    pub fn color(&self) -> Color {
        match self {
            Phase::LocalAntiferro => Color::from_rgb8(113, 255, 240),   // cyan
            Phase::AxialDisordered => Color::from_rgb8(194, 255, 113),  // light green
            Phase::PlanarDisordered => Color::from_rgb8(177, 113, 255), // lavender
            Phase::LocalFerro => Color::from_rgb8(255, 113, 113),       // light red
            Phase::FerroZ => Color::from_rgb8(255, 231, 113),           // yellow
            Phase::AntiferroZ => Color::from_rgb8(113, 255, 133),       // green
            Phase::FerroXy => Color::from_rgb8(255, 113, 180),          // pink
            Phase::AntiferroXy => Color::from_rgb8(113, 193, 255),      // dark sky blue
            Phase::FerroDomainWall => Color::from_rgb8(255, 150, 113),
            Phase::AntiferroDomainWall => Color::from_rgb8(50, 194, 78),
            Phase::GlobalConical => Color::from_rgb8(177, 113, 255),
            Phase::LocalConical => Color::from_rgb8(255, 113, 113),
            Phase::Random => Color::BLACK,
            Phase::Unclassified => Color::WHITE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::LocalAntiferro => "local antiferro",
            Phase::AxialDisordered => "z-aligned, no local order",
            Phase::PlanarDisordered => "xy-aligned, no local order",
            Phase::LocalFerro => "local ferro",
            Phase::FerroZ => "ferro z",
            Phase::AntiferroZ => "antiferro z",
            Phase::FerroXy => "ferro xy",
            Phase::AntiferroXy => "antiferro xy",
            Phase::FerroDomainWall => "ferro z with domain walls",
            Phase::AntiferroDomainWall => "antiferro z with domain walls",
            Phase::GlobalConical => "globally conical",
            Phase::LocalConical => "locally conical",
            Phase::Random => "random",
            Phase::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every predicate outcome a rule table can look at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrderSignals {
    pub ferro_local: bool,
    pub antiferro_local: bool,
    pub z_aligned: bool,
    pub xy_aligned: bool,
    pub domain_wall: bool,
    pub ferro_z: bool,
    pub antiferro_z: bool,
    pub ferro_xy: bool,
    pub antiferro_xy: bool,
    pub random: bool,
    pub locally_conical: bool,
    pub globally_conical: bool,
}

impl OrderSignals {
    /// Evaluates every predicate. The conical fold is the expensive one and
    /// is skipped unless `with_conical` is set.
    pub fn evaluate(classifier: &PhaseClassifier, spins: &[Spin], with_conical: bool) -> Self {
        let (ferro_local, antiferro_local) = classifier.is_local_ferro_antiferro(spins);
        let (z_aligned, xy_aligned) = classifier.is_xyz_aligned(spins);
        let (locally_conical, globally_conical) = if with_conical {
            classifier.is_conical(spins)
        } else {
            (false, false)
        };

        Self {
            ferro_local,
            antiferro_local,
            z_aligned,
            xy_aligned,
            domain_wall: classifier.domain_wall_ferro_z_align(spins),
            ferro_z: classifier.is_ferro_z_aligned(spins),
            antiferro_z: classifier.is_antiferro_z_aligned(spins),
            ferro_xy: classifier.is_ferro_xy_aligned(spins),
            antiferro_xy: classifier.is_antiferro_xy_aligned(spins),
            random: classifier.is_random(spins),
            locally_conical,
            globally_conical,
        }
    }
}

pub struct Rule {
    pub phase: Phase,
    pub when: fn(&OrderSignals) -> bool,
}

pub const DOMAIN_WALL_RULES: &[Rule] = &[
    Rule {
        phase: Phase::LocalAntiferro,
        when: |s| s.antiferro_local && !s.z_aligned && !s.xy_aligned,
    },
    Rule {
        phase: Phase::AxialDisordered,
        when: |s| s.z_aligned && !s.ferro_local && !s.antiferro_local,
    },
    Rule {
        phase: Phase::PlanarDisordered,
        when: |s| s.xy_aligned && !s.ferro_local && !s.antiferro_local,
    },
    Rule {
        phase: Phase::LocalFerro,
        when: |s| s.ferro_local && !s.z_aligned && !s.xy_aligned,
    },
    Rule { phase: Phase::FerroZ, when: |s| s.ferro_z },
    Rule { phase: Phase::AntiferroZ, when: |s| s.antiferro_z },
    Rule { phase: Phase::FerroXy, when: |s| s.ferro_xy },
    Rule { phase: Phase::AntiferroXy, when: |s| s.antiferro_xy },
    Rule {
        phase: Phase::FerroDomainWall,
        when: |s| s.ferro_local && s.z_aligned && s.domain_wall,
    },
    Rule {
        phase: Phase::AntiferroDomainWall,
        when: |s| s.antiferro_local && s.z_aligned && s.domain_wall,
    },
    Rule { phase: Phase::Random, when: |s| s.random },
];

pub const SPIRAL_RULES: &[Rule] = &[
    Rule { phase: Phase::FerroZ, when: |s| s.ferro_z },
    Rule { phase: Phase::AntiferroZ, when: |s| s.antiferro_z },
    Rule { phase: Phase::FerroXy, when: |s| s.ferro_xy },
    Rule { phase: Phase::AntiferroXy, when: |s| s.antiferro_xy },
    Rule { phase: Phase::GlobalConical, when: |s| s.globally_conical },
    Rule { phase: Phase::LocalConical, when: |s| s.locally_conical },
];

/// First matching rule, or `Unclassified`.
pub fn first_match(rules: &[Rule], signals: &OrderSignals) -> Phase {
    rules
        .iter()
        .find(|rule| (rule.when)(signals))
        .map(|rule| rule.phase)
        .unwrap_or(Phase::Unclassified)
}

/// The two colour maps used for phase diagrams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTable {
    /// (Anti)ferro order along z / in xy, intermediate regions and domain walls
    FerroAndAlignWithDomainWalls,
    /// (Anti)ferro order plus conical spirals
    #[default]
    FerroSpiralSkyrmions,
}

impl RuleTable {
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            RuleTable::FerroAndAlignWithDomainWalls => DOMAIN_WALL_RULES,
            RuleTable::FerroSpiralSkyrmions => SPIRAL_RULES,
        }
    }

    pub fn signals(&self, classifier: &PhaseClassifier, spins: &[Spin]) -> OrderSignals {
        let with_conical = matches!(self, RuleTable::FerroSpiralSkyrmions);
        OrderSignals::evaluate(classifier, spins, with_conical)
    }

    pub fn phase(&self, classifier: &PhaseClassifier, spins: &[Spin]) -> Phase {
        first_match(self.rules(), &self.signals(classifier, spins))
    }

    pub fn classify(&self, classifier: &PhaseClassifier, spins: &[Spin]) -> Color {
        self.phase(classifier, spins).color()
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuleTable::FerroAndAlignWithDomainWalls => "ferro_and_align_with_domain_walls",
            RuleTable::FerroSpiralSkyrmions => "ferro_spiral_skyrmions",
        }
    }
}

impl FromStr for RuleTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ferro_and_align_with_domain_walls" | "domain_walls" => {
                Ok(RuleTable::FerroAndAlignWithDomainWalls)
            }
            "ferro_spiral_skyrmions" | "spiral" => Ok(RuleTable::FerroSpiralSkyrmions),
            other => Err(format!("unknown rule table '{}'", other)),
        }
    }
}

/// Neither map runs [`PhaseClassifier::check_spins`]; both panic on a spin
/// slice shorter than the bound atom count.
impl PhaseClassifier {
    /// Colour map distinguishing collinear order, intermediate regions and domain walls.
    pub fn data_ferro_and_align_with_domain_walls(&self, spins: &[Spin]) -> Color {
        RuleTable::FerroAndAlignWithDomainWalls.classify(self, spins)
    }

    /// Colour map distinguishing collinear order and conical spirals.
    pub fn data_ferro_spiral_skyrmions(&self, spins: &[Spin]) -> Color {
        RuleTable::FerroSpiralSkyrmions.classify(self, spins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sublattice;
    use crate::model::NeighborSet;
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    fn chain(n: usize) -> PhaseClassifier {
        let neighbors: Vec<NeighborSet> = (0..n)
            .map(|i| [(i + n - 1) % n, (i + 1) % n, (i + n - 1) % n])
            .collect();
        let positions = (0..n).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect();
        let labels = sublattice::label_checked(n, &neighbors).unwrap();
        PhaseClassifier::new(n, neighbors, labels, positions).unwrap()
    }

    #[test]
    fn test_first_match_respects_order() {
        // ferro_z and ferro_xy both set: the earlier rule wins
        let signals = OrderSignals {
            ferro_z: true,
            ferro_xy: true,
            ..Default::default()
        };
        assert_eq!(first_match(SPIRAL_RULES, &signals), Phase::FerroZ);
        assert_eq!(first_match(SPIRAL_RULES, &OrderSignals::default()), Phase::Unclassified);
    }

    #[test]
    fn test_intermediate_regions_shadow_global_order() {
        // Ferro z also satisfies the "z aligned, locally ferro" combination,
        // which is not an intermediate region, so it falls through to FerroZ.
        let signals = OrderSignals {
            ferro_local: true,
            z_aligned: true,
            ferro_z: true,
            ..Default::default()
        };
        assert_eq!(first_match(DOMAIN_WALL_RULES, &signals), Phase::FerroZ);

        let signals = OrderSignals {
            antiferro_local: true,
            antiferro_xy: true,
            ..Default::default()
        };
        assert_eq!(first_match(DOMAIN_WALL_RULES, &signals), Phase::LocalAntiferro);
    }

    #[test]
    fn test_domain_wall_before_random() {
        let signals = OrderSignals {
            ferro_local: true,
            z_aligned: true,
            domain_wall: true,
            random: true,
            ..Default::default()
        };
        assert_eq!(first_match(DOMAIN_WALL_RULES, &signals), Phase::FerroDomainWall);
    }

    #[test]
    fn test_table_sizes() {
        // plus the implicit Unclassified fallback
        assert_eq!(DOMAIN_WALL_RULES.len(), 11);
        assert_eq!(SPIRAL_RULES.len(), 6);
    }

    #[test]
    fn test_spiral_table_on_configurations() {
        let c = chain(12);

        let ferro: Vec<Spin> = vec![Vector3::z(); 12];
        assert_eq!(c.data_ferro_spiral_skyrmions(&ferro), Phase::FerroZ.color());

        let neel: Vec<Spin> = c.sublattice().iter().map(|&l| Vector3::z() * l as f64).collect();
        assert_eq!(c.data_ferro_spiral_skyrmions(&neel), Phase::AntiferroZ.color());

        let helix: Vec<Spin> = (0..12)
            .map(|i| {
                let phi = i as f64 * PI / 6.0;
                Vector3::new(0.0, phi.cos(), phi.sin())
            })
            .collect();
        assert_eq!(RuleTable::FerroSpiralSkyrmions.phase(&c, &helix), Phase::GlobalConical);

        // Same rotation on a cone with |S.x| = 0.2: only locally conical
        let r = (1.0_f64 - 0.04).sqrt();
        let cone: Vec<Spin> = (0..12)
            .map(|i| {
                let phi = i as f64 * PI / 6.0;
                Vector3::new(0.2, r * phi.cos(), r * phi.sin())
            })
            .collect();
        assert_eq!(RuleTable::FerroSpiralSkyrmions.phase(&c, &cone), Phase::LocalConical);
        assert_eq!(c.data_ferro_spiral_skyrmions(&cone), Phase::LocalConical.color());
    }

    #[test]
    fn test_domain_wall_table_on_configurations() {
        let c = chain(8);

        let ferro: Vec<Spin> = vec![Vector3::z(); 8];
        assert_eq!(c.data_ferro_and_align_with_domain_walls(&ferro), Phase::FerroZ.color());

        let uncorrelated: Vec<Spin> = (0..8)
            .map(|i| {
                let phi = i as f64 * PI / 2.0;
                Vector3::new(phi.cos(), phi.sin(), 0.0)
            })
            .collect();
        // In-plane but with no local order: the planar region comes first
        assert_eq!(
            RuleTable::FerroAndAlignWithDomainWalls.phase(&c, &uncorrelated),
            Phase::PlanarDisordered
        );
    }

    #[test]
    fn test_rule_table_names_round_trip() {
        for table in [RuleTable::FerroAndAlignWithDomainWalls, RuleTable::FerroSpiralSkyrmions] {
            assert_eq!(table.name().parse::<RuleTable>().unwrap(), table);
        }
        assert!("nope".parse::<RuleTable>().is_err());
    }
}
