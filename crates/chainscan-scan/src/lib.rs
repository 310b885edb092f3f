//! Single-pass chained scan with decoupled lookback and decoupled fallback.
//!
//! One cube is dispatched per tile of the input. Each cube reduces its tile, posts the result
//! in a [carry chain](chain::CarryChain), then walks the chain backward to find the
//! combination of every preceding element. When a predecessor hasn't posted anything yet, the
//! cube recomputes that predecessor's reduction itself instead of waiting, so the scan
//! completes under any scheduling of the cubes, including one where later tiles run before
//! earlier ones.

#[macro_use]
extern crate derive_new;

pub mod chain;
pub mod instructions;
pub mod local;
pub mod lookback;
pub mod numeric;
pub mod tile;

mod atomic;
mod config;
mod error;
mod kernel;
mod launch;
mod mode;
mod monoid;

pub use atomic::*;
pub use config::ScanStrategy;
pub use error::*;
pub use launch::ScanReport;
pub use lookback::LookbackCounts;
pub use mode::*;
pub use monoid::*;

#[cfg(feature = "export_tests")]
pub mod test;

use chainscan_runtime::{Runtime, client::ComputeClient};

/// Entry point for chained scans.
///
/// `output` holds one element per input element for [Exclusive](ScanMode::Exclusive) and
/// [Inclusive](ScanMode::Inclusive) modes, and a single element for
/// [Reduce](ScanMode::Reduce).
pub fn scan<R: Runtime, M: Monoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    output: &mut [M::Value],
    mode: ScanMode,
    strategy: Option<ScanStrategy>,
) -> Result<ScanReport<M::Value>, ScanSetupError> {
    launch::launch_chained_scan(client, monoid, input, output, mode, None, strategy)
}

/// Same as [scan], with every result prefixed by `seed`.
pub fn scan_seeded<R: Runtime, M: Monoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    output: &mut [M::Value],
    mode: ScanMode,
    seed: ScanSeed<M::Value>,
    strategy: Option<ScanStrategy>,
) -> Result<ScanReport<M::Value>, ScanSetupError> {
    launch::launch_chained_scan(client, monoid, input, output, mode, Some(seed.value), strategy)
}

/// Combine every element of `input`, the identity when it's empty.
pub fn reduce<R: Runtime, M: Monoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    strategy: Option<ScanStrategy>,
) -> Result<M::Value, ScanSetupError> {
    let mut output = [monoid.identity()];
    scan(client, monoid, input, &mut output, ScanMode::Reduce, strategy)?;
    Ok(output[0])
}

/// Element `i` of the result combines elements `0..i` of `input`.
pub fn exclusive_scan<R: Runtime, M: Monoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    strategy: Option<ScanStrategy>,
) -> Result<Vec<M::Value>, ScanSetupError> {
    let mut output = vec![monoid.identity(); input.len()];
    scan(client, monoid, input, &mut output, ScanMode::Exclusive, strategy)?;
    Ok(output)
}

/// Element `i` of the result combines elements `0..=i` of `input`.
pub fn inclusive_scan<R: Runtime, M: Monoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    strategy: Option<ScanStrategy>,
) -> Result<Vec<M::Value>, ScanSetupError> {
    let mut output = vec![monoid.identity(); input.len()];
    scan(client, monoid, input, &mut output, ScanMode::Inclusive, strategy)?;
    Ok(output)
}
