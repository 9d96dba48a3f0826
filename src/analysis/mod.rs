//! Decompilation analysis: the expression IR and the per-unit simplification
//! driver.

pub mod ir;
pub mod units;

pub use units::{run_units, DecompilationUnit, UnitOutcome, UnitResult};
