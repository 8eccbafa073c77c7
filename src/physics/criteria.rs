// src/physics/criteria.rs
//
// Order-parameter predicates over a spin configuration. The thresholds are
// tuned against the solver's output and are part of the phase boundaries.

use crate::error::{PhaseError, Result};
use crate::model::sublattice;
use crate::model::{Lattice, NeighborSet, Spin};
use nalgebra::Vector3;

// --- Thresholds ---

const GLOBAL_ALIGNMENT: f64 = 0.99;
const PLANAR_MAX_MZ: f64 = 0.1;
const PLANAR_MIN_MAGNITUDE: f64 = 0.9;

const AXIAL_SPIN_Z: f64 = 0.95;
const AXIAL_FRACTION: f64 = 0.7;
const PLANAR_SPIN_Z: f64 = 0.05;
const PLANAR_FRACTION: f64 = 0.8;

const LOCAL_ALIGNMENT: f64 = 0.99;
const LOCAL_FRACTION: f64 = 0.65;

const DOMAIN_FLIP: f64 = -0.9;
const RANDOM_TOLERANCE: f64 = 0.01;

const MIN_CROSS: f64 = 0.01;
const CONICAL_PROJECTION: f64 = 0.1;

/// Outcome of the conical (spiral) order fold.
#[derive(Clone, Debug)]
pub struct ConicalOrder {
    /// Normalised accumulated rotation axis; zero when no pair rotates
    pub rotation_axis: Vector3<f64>,
    /// Sum of displacements between parallel neighbours (diagnostic)
    pub translation: Vector3<f64>,
    pub rotating_pairs: usize,
    /// Sum of |S · axis| over the atoms divided by `rotating_pairs`;
    /// infinite when no pair rotates
    pub mean_projection: f64,
    /// Max |S · axis| over the atoms; infinite when no pair rotates
    pub max_projection: f64,
    pub locally_conical: bool,
    pub globally_conical: bool,
}

/// Static per-topology context plus the predicates evaluated against it.
///
/// # Panics
///
/// Every predicate indexes `spins` by atom and panics when
/// `spins.len() < n_atoms`; run [`PhaseClassifier::check_spins`] first on
/// untrusted input.
#[derive(Clone, Debug)]
pub struct PhaseClassifier {
    n_atoms: usize,
    neighbors: Vec<NeighborSet>,
    sublattice: Vec<i8>,
    positions: Vec<Vector3<f64>>,
}

impl PhaseClassifier {
    /// Binds a context. Fails with `TopologyMismatch` unless every per-atom
    /// array has `n_atoms` entries and every neighbour index is below `n_atoms`.
    pub fn new(
        n_atoms: usize,
        neighbors: Vec<NeighborSet>,
        sublattice: Vec<i8>,
        positions: Vec<Vector3<f64>>,
    ) -> Result<Self> {
        for found in [neighbors.len(), sublattice.len(), positions.len()] {
            if found != n_atoms {
                return Err(PhaseError::TopologyMismatch { expected: n_atoms, found });
            }
        }
        if let Some(&found) = neighbors.iter().flatten().find(|&&j| j >= n_atoms) {
            return Err(PhaseError::TopologyMismatch { expected: n_atoms, found });
        }

        Ok(Self {
            n_atoms,
            neighbors,
            sublattice,
            positions,
        })
    }

    /// Labels the sublattices of `lattice` and binds the result.
    pub fn from_lattice(lattice: &Lattice) -> Result<Self> {
        if lattice.is_empty() {
            return Err(PhaseError::DegenerateSpinArray(
                "cannot bind a classifier to an empty lattice".to_string(),
            ));
        }
        let labels = sublattice::label_checked(lattice.n_atoms, &lattice.neighbors)?;
        Self::new(
            lattice.n_atoms,
            lattice.neighbors.clone(),
            labels,
            lattice.positions.clone(),
        )
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn sublattice(&self) -> &[i8] {
        &self.sublattice
    }

    /// Rejects spin arrays the predicates cannot meaningfully evaluate.
    pub fn check_spins(&self, spins: &[Spin]) -> Result<()> {
        if spins.is_empty() {
            return Err(PhaseError::DegenerateSpinArray("no spins".to_string()));
        }
        if spins.len() != self.n_atoms {
            return Err(PhaseError::TopologyMismatch {
                expected: self.n_atoms,
                found: spins.len(),
            });
        }
        if let Some(i) = spins.iter().position(|s| !s.iter().all(|c| c.is_finite())) {
            return Err(PhaseError::DegenerateSpinArray(format!(
                "spin {} has non-finite components",
                i
            )));
        }
        if spins.iter().all(|s| s.norm_squared() == 0.0) {
            return Err(PhaseError::DegenerateSpinArray("all spins are zero".to_string()));
        }
        Ok(())
    }

    fn len(&self) -> f64 {
        self.n_atoms as f64
    }

    fn staggered(&self, i: usize) -> f64 {
        self.sublattice[i] as f64
    }

    /// Mean dot product of spin `i` with its neighbours.
    fn neighbor_alignment(&self, spins: &[Spin], i: usize) -> f64 {
        let set = &self.neighbors[i];
        let sum: f64 = set.iter().map(|&j| spins[i].dot(&spins[j])).sum();
        sum / set.len() as f64
    }

    // --- Global order ---

    pub fn is_ferro_z_aligned(&self, spins: &[Spin]) -> bool {
        let mag_z: f64 = spins[..self.n_atoms].iter().map(|s| s.z).sum();
        mag_z.abs() / self.len() > GLOBAL_ALIGNMENT
    }

    pub fn is_antiferro_z_aligned(&self, spins: &[Spin]) -> bool {
        let mag_z: f64 = (0..self.n_atoms).map(|i| spins[i].z * self.staggered(i)).sum();
        mag_z.abs() / self.len() > GLOBAL_ALIGNMENT
    }

    pub fn is_ferro_xy_aligned(&self, spins: &[Spin]) -> bool {
        let total: Vector3<f64> = spins[..self.n_atoms].iter().sum();
        // mz is normalised before it enters the magnitude; mx, my are not
        let mz = total.z.abs() / self.len();
        let mag = (total.x.powi(2) + total.y.powi(2) + mz.powi(2)).sqrt() / self.len();

        mz < PLANAR_MAX_MZ && mag > PLANAR_MIN_MAGNITUDE
    }

    pub fn is_antiferro_xy_aligned(&self, spins: &[Spin]) -> bool {
        let total: Vector3<f64> = (0..self.n_atoms).map(|i| spins[i] * self.staggered(i)).sum();
        let mz = total.z / self.len();
        let mag = (total.x.powi(2) + total.y.powi(2) + mz.powi(2)).sqrt() / self.len();

        mz.abs() < PLANAR_MAX_MZ && mag > PLANAR_MIN_MAGNITUDE
    }

    // --- Local order ---

    /// `(z_aligned, xy_aligned)`; the two are not exclusive.
    pub fn is_xyz_aligned(&self, spins: &[Spin]) -> (bool, bool) {
        let spins = &spins[..self.n_atoms];
        let axial = spins.iter().filter(|s| s.z.abs() > AXIAL_SPIN_Z).count() as f64;
        let planar = spins.iter().filter(|s| s.z.abs() < PLANAR_SPIN_Z).count() as f64;

        (
            axial / self.len() > AXIAL_FRACTION,
            planar / self.len() > PLANAR_FRACTION,
        )
    }

    /// `(locally_ferro, locally_antiferro)`
    pub fn is_local_ferro_antiferro(&self, spins: &[Spin]) -> (bool, bool) {
        let mut ferro = 0usize;
        let mut antiferro = 0usize;

        for i in 0..self.n_atoms {
            let m = self.neighbor_alignment(spins, i);
            if m > LOCAL_ALIGNMENT {
                ferro += 1;
            } else if m < -LOCAL_ALIGNMENT {
                antiferro += 1;
            }
        }

        (
            ferro as f64 / self.len() > LOCAL_FRACTION,
            antiferro as f64 / self.len() > LOCAL_FRACTION,
        )
    }

    /// Scans sublattice +1 in index order and fires once both a spin along
    /// +z and a spin along -z have been seen. Depends on atom ordering.
    pub fn domain_wall_ferro_z_align(&self, spins: &[Spin]) -> bool {
        let up: Vector3<f64> = Vector3::z();
        let down: Vector3<f64> = -Vector3::z();
        let mut min_up = 1.0_f64;
        let mut min_down = 1.0_f64;

        for i in (0..self.n_atoms).filter(|&i| self.sublattice[i] == 1) {
            min_up = min_up.min(up.dot(&spins[i]));
            min_down = min_down.min(down.dot(&spins[i]));
            if min_up < DOMAIN_FLIP && min_down < DOMAIN_FLIP {
                return true;
            }
        }
        false
    }

    /// Sum over atoms of the mean neighbour alignment; near zero for
    /// uncorrelated spins.
    pub fn is_random(&self, spins: &[Spin]) -> bool {
        let value: f64 = (0..self.n_atoms)
            .map(|i| self.neighbor_alignment(spins, i))
            .sum();
        value.abs() < RANDOM_TOLERANCE
    }

    // --- Spirals ---

    /// Greedy fold over directed neighbour pairs (atom order, then
    /// neighbour order). Each cross product is flipped to agree with the
    /// running axis before it is added, so the result depends on the order.
    pub fn conical_order(&self, spins: &[Spin]) -> ConicalOrder {
        let mut rotation: Vector3<f64> = Vector3::zeros();
        let mut translation: Vector3<f64> = Vector3::zeros();
        let mut count = 0usize;

        for i in 0..self.n_atoms {
            for &j in &self.neighbors[i] {
                let mut cross = spins[i].cross(&spins[j]);
                // (i x j) and (j x i) have opposite signs
                if cross.dot(&rotation) < 0.0 {
                    cross = -cross;
                }

                if cross.norm() > MIN_CROSS {
                    rotation += cross;
                    count += 1;
                } else {
                    let mut r = self.positions[i] - self.positions[j];
                    if r.y < 0.0 {
                        r = -r;
                    }
                    translation += r;
                }
            }
        }

        let (rotation_axis, mean_projection, max_projection) = if count > 0 {
            let axis = rotation.normalize();
            let projections = spins[..self.n_atoms].iter().map(|s| s.dot(&axis).abs());
            let (sum, max) = projections.fold((0.0, 0.0_f64), |(sum, max), p| (sum + p, max.max(p)));
            (axis, sum / count as f64, max)
        } else {
            (Vector3::zeros(), f64::INFINITY, f64::INFINITY)
        };

        log::debug!(
            "conical: {} rotating pairs, mean projection {:.4}, max projection {:.4}",
            count,
            mean_projection,
            max_projection
        );

        ConicalOrder {
            rotation_axis,
            translation,
            rotating_pairs: count,
            mean_projection,
            max_projection,
            locally_conical: mean_projection < CONICAL_PROJECTION,
            globally_conical: max_projection < CONICAL_PROJECTION,
        }
    }

    /// `(locally_conical, globally_conical)`
    pub fn is_conical(&self, spins: &[Spin]) -> (bool, bool) {
        let order = self.conical_order(spins);
        (order.locally_conical, order.globally_conical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Open-ended periodic chain along x; third neighbour repeats the left one.
    fn chain(n: usize) -> PhaseClassifier {
        let neighbors: Vec<NeighborSet> = (0..n)
            .map(|i| [(i + n - 1) % n, (i + 1) % n, (i + n - 1) % n])
            .collect();
        let positions = (0..n).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect();
        let labels = sublattice::label_checked(n, &neighbors).unwrap();
        PhaseClassifier::new(n, neighbors, labels, positions).unwrap()
    }

    fn uniform(n: usize, s: Spin) -> Vec<Spin> {
        vec![s; n]
    }

    fn neel(c: &PhaseClassifier, s: Spin) -> Vec<Spin> {
        c.sublattice().iter().map(|&l| s * l as f64).collect()
    }

    #[test]
    fn test_ferro_z() {
        let c = chain(8);
        let spins = uniform(8, Vector3::z());
        assert!(c.is_ferro_z_aligned(&spins));
        assert!(!c.is_antiferro_z_aligned(&spins));
        assert!(!c.is_ferro_xy_aligned(&spins));
        assert_eq!(c.is_xyz_aligned(&spins), (true, false));
        assert_eq!(c.is_local_ferro_antiferro(&spins), (true, false));
    }

    #[test]
    fn test_neel_z() {
        let c = chain(8);
        let spins = neel(&c, Vector3::z());
        assert!(c.is_antiferro_z_aligned(&spins));
        assert!(!c.is_ferro_z_aligned(&spins));
        assert_eq!(c.is_local_ferro_antiferro(&spins), (false, true));
    }

    #[test]
    fn test_ferro_and_antiferro_in_plane() {
        let c = chain(8);
        let ferro = uniform(8, Vector3::new(0.6, 0.8, 0.0));
        assert!(c.is_ferro_xy_aligned(&ferro));
        assert!(!c.is_antiferro_xy_aligned(&ferro));
        assert_eq!(c.is_xyz_aligned(&ferro), (false, true));

        let anti = neel(&c, Vector3::x());
        assert!(c.is_antiferro_xy_aligned(&anti));
        assert!(!c.is_ferro_xy_aligned(&anti));
    }

    #[test]
    fn test_random_cancels() {
        // 90 degree steps leave neighbours exactly uncorrelated
        let c = chain(8);
        let spins: Vec<Spin> = (0..8)
            .map(|i| {
                let phi = i as f64 * PI / 2.0;
                Vector3::new(phi.cos(), phi.sin(), 0.0)
            })
            .collect();
        assert!(c.is_random(&spins));
        assert!(!c.is_random(&uniform(8, Vector3::z())));
    }

    #[test]
    fn test_domain_wall() {
        let c = chain(8);
        // Left half up, right half down
        let spins: Vec<Spin> = (0..8)
            .map(|i| if i < 4 { Vector3::z() } else { -Vector3::z() })
            .collect();
        assert!(c.domain_wall_ferro_z_align(&spins));
        assert!(!c.domain_wall_ferro_z_align(&uniform(8, Vector3::z())));
    }

    #[test]
    fn test_helix_is_globally_conical() {
        let c = chain(12);
        let spins: Vec<Spin> = (0..12)
            .map(|i| {
                let phi = i as f64 * PI / 6.0;
                Vector3::new(0.0, phi.cos(), phi.sin())
            })
            .collect();
        let order = c.conical_order(&spins);

        assert!(order.rotating_pairs > 0);
        assert!((order.rotation_axis.x.abs() - 1.0).abs() < 1e-9);
        assert!(order.globally_conical);
        assert!(order.locally_conical);
    }

    #[test]
    fn test_collinear_is_never_conical() {
        let c = chain(6);
        let order = c.conical_order(&uniform(6, Vector3::z()));
        assert_eq!(order.rotating_pairs, 0);
        assert!(order.mean_projection.is_infinite());
        assert_eq!(c.is_conical(&uniform(6, Vector3::z())), (false, false));
    }

    #[test]
    fn test_check_spins() {
        let c = chain(4);
        assert!(c.check_spins(&uniform(4, Vector3::z())).is_ok());
        assert!(matches!(c.check_spins(&[]), Err(PhaseError::DegenerateSpinArray(_))));
        assert!(matches!(
            c.check_spins(&uniform(3, Vector3::z())),
            Err(PhaseError::TopologyMismatch { expected: 4, found: 3 })
        ));

        let mut spins = uniform(4, Vector3::z());
        spins[2].x = f64::NAN;
        assert!(c.check_spins(&spins).is_err());
        assert!(c.check_spins(&uniform(4, Vector3::zeros())).is_err());
    }

    #[test]
    fn test_cone_mean_is_per_rotating_pair() {
        // Cone about x: every spin keeps |S.x| = 0.2 while its transverse part turns
        let c = chain(12);
        let r = (1.0_f64 - 0.04).sqrt();
        let spins: Vec<Spin> = (0..12)
            .map(|i| {
                let phi = i as f64 * PI / 6.0;
                Vector3::new(0.2, r * phi.cos(), r * phi.sin())
            })
            .collect();
        let order = c.conical_order(&spins);

        assert_eq!(order.rotating_pairs, 36);
        assert!((order.mean_projection - 0.2 * 12.0 / 36.0).abs() < 1e-6);
        assert!((order.max_projection - 0.2).abs() < 1e-6);
        assert_eq!(c.is_conical(&spins), (true, false));
    }

    #[test]
    fn test_new_rejects_inconsistent_arrays() {
        let neighbors: Vec<NeighborSet> = vec![[1, 1, 1], [0, 0, 0]];
        let positions = vec![Vector3::zeros(); 2];

        let err = PhaseClassifier::new(2, neighbors.clone(), vec![1], positions.clone()).unwrap_err();
        assert!(matches!(err, PhaseError::TopologyMismatch { expected: 2, found: 1 }));

        let err = PhaseClassifier::new(2, vec![[1, 2, 1], [0, 0, 0]], vec![1, -1], positions.clone())
            .unwrap_err();
        assert!(matches!(err, PhaseError::TopologyMismatch { expected: 2, found: 2 }));

        assert!(PhaseClassifier::new(2, neighbors, vec![1, -1], positions).is_ok());
    }

    #[test]
    #[should_panic]
    fn test_short_spin_slice_panics() {
        let c = chain(4);
        c.is_ferro_z_aligned(&uniform(3, Vector3::z()));
    }
}
