// src/physics/mod.rs
pub mod criteria;
pub mod rules;
pub mod sweep;

pub use criteria::{ConicalOrder, PhaseClassifier};
pub use rules::{OrderSignals, Phase, RuleTable};
pub use sweep::{ParameterGrid, PhaseDiagram, PhaseSweep};
