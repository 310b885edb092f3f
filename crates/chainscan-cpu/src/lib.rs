//! CPU backend for chainscan.
//!
//! Cubes of a dispatch run on a pool of scoped threads. Units inside a cube run one
//! barrier-delimited phase at a time on the thread that owns the cube.

#[macro_use]
extern crate derive_new;

#[cfg(test)]
mod tests {
    pub type TestRuntime = crate::CpuRuntime;

    chainscan_scan::testgen_scan!();
    chainscan_sort::testgen_sort!();
}

pub mod compute;
pub mod device;
pub mod runtime;

pub use device::CpuDevice;
pub use runtime::*;
