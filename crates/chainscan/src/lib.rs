//! Data-parallel primitives built on a single-pass chained scan with decoupled lookback and
//! decoupled fallback.

pub use chainscan_runtime as runtime;
pub use chainscan_scan::*;

#[cfg(feature = "cpu")]
pub use chainscan_cpu as cpu;

#[cfg(feature = "sort")]
pub use chainscan_sort as sort;
