// src/utils/report.rs

use crate::model::sublattice::sublattice_indices;
use crate::model::{Lattice, Spin};
use crate::physics::criteria::PhaseClassifier;
use crate::physics::rules::{Phase, RuleTable};

/// Text summary of a loaded lattice, as printed by `spinphase classify`.
pub fn lattice_summary(lattice: &Lattice, sublattice: &[i8], filename: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    out.push_str(&format!("Atoms: {}\n", lattice.n_atoms));
    out.push_str(&format!(
        "Extent: {:.3} x {:.3} x {:.3} (size {:.3})\n",
        lattice.dimensions.x, lattice.dimensions.y, lattice.dimensions.z, lattice.size
    ));
    out.push_str(&format!(
        "Sublattices: {} (+1) / {} (-1)\n",
        sublattice_indices(sublattice, 1).len(),
        sublattice_indices(sublattice, -1).len()
    ));
    out.push_str("------------------------------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<4} {:<10} {:<10} {:<10} {:<9} {:<9} {:<9}\n",
        "Index", "Sub", "X", "Y", "Z", "Sx", "Sy", "Sz"
    ));
    out.push_str("------------------------------------------------------------------------\n");

    for i in 0..lattice.n_atoms.min(20) {
        let p = lattice.positions[i];
        let s = lattice.spins[i];
        out.push_str(&format!(
            "{:<8} {:<4} {:<10.4} {:<10.4} {:<10.4} {:<9.4} {:<9.4} {:<9.4}\n",
            i,
            sublattice.get(i).copied().unwrap_or(0),
            p.x,
            p.y,
            p.z,
            s.x,
            s.y,
            s.z
        ));
    }

    if lattice.n_atoms > 20 {
        out.push_str(&format!("... and {} more atoms.\n", lattice.n_atoms - 20));
    }

    out
}

/// Every predicate outcome and the phase chosen by `table`.
pub fn classification_report(classifier: &PhaseClassifier, spins: &[Spin], table: RuleTable) -> String {
    let signals = table.signals(classifier, spins);
    let conical = classifier.conical_order(spins);
    let phase: Phase = table.phase(classifier, spins);

    let flag = |b: bool| if b { "yes" } else { "no" };

    let mut out = String::new();
    out.push_str(&format!("Rule table: {}\n", table.name()));
    out.push_str(&format!("  ferro z:          {}\n", flag(signals.ferro_z)));
    out.push_str(&format!("  antiferro z:      {}\n", flag(signals.antiferro_z)));
    out.push_str(&format!("  ferro xy:         {}\n", flag(signals.ferro_xy)));
    out.push_str(&format!("  antiferro xy:     {}\n", flag(signals.antiferro_xy)));
    out.push_str(&format!("  z aligned:        {}\n", flag(signals.z_aligned)));
    out.push_str(&format!("  xy aligned:       {}\n", flag(signals.xy_aligned)));
    out.push_str(&format!("  local ferro:      {}\n", flag(signals.ferro_local)));
    out.push_str(&format!("  local antiferro:  {}\n", flag(signals.antiferro_local)));
    out.push_str(&format!("  domain wall:      {}\n", flag(signals.domain_wall)));
    out.push_str(&format!("  random:           {}\n", flag(signals.random)));
    out.push_str(&format!(
        "  conical:          local {}, global {} (mean |S.n| {:.4}, max {:.4}, {} rotating pairs)\n",
        flag(conical.locally_conical),
        flag(conical.globally_conical),
        conical.mean_projection,
        conical.max_projection,
        conical.rotating_pairs
    ));
    if conical.rotating_pairs > 0 {
        let n = conical.rotation_axis;
        out.push_str(&format!("  rotation axis:    ({:.4}, {:.4}, {:.4})\n", n.x, n.y, n.z));
    }
    out.push_str(&format!("Phase: {} {}\n", phase, phase.color().to_hex()));
    out
}
