//! Stable least-significant-digit radix sort in the onesweep style.
//!
//! A single histogram dispatch counts the digits of every pass. Each pass is then one dispatch
//! of the chained-scan engine where the carry is a 256-bucket [DigitCounts](digits::DigitCounts)
//! vector: cubes rank their keys within the tile, look back for the counts of the preceding
//! tiles and scatter the keys to their final position for that digit.

pub mod digits;
pub mod key;

mod config;
mod error;
mod histogram;
mod launch;
mod onesweep;

pub use config::SortStrategy;
pub use error::*;
pub use histogram::{PassHistograms, digit_histogram};
pub use key::RadixKey;
pub use launch::SortReport;

#[cfg(feature = "export_tests")]
pub mod test;

use chainscan_runtime::{Runtime, client::ComputeClient};

/// Sort `keys` in ascending order of their [radix word](RadixKey::to_radix).
pub fn radix_sort_keys<R: Runtime, K: RadixKey>(
    client: &ComputeClient<R>,
    keys: &mut [K],
    strategy: Option<SortStrategy>,
) -> Result<SortReport, SortSetupError> {
    let (report, _) = launch::launch_radix_sort(client, keys, false, strategy)?;
    Ok(report)
}

/// Sort `keys` and move every value along with its key. Values of equal keys keep their
/// relative order.
pub fn radix_sort_pairs<R: Runtime, K: RadixKey, V: Clone>(
    client: &ComputeClient<R>,
    keys: &mut [K],
    values: &mut [V],
    strategy: Option<SortStrategy>,
) -> Result<SortReport, SortSetupError> {
    if keys.len() != values.len() {
        return Err(SortSetupError::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }

    let (report, permutation) = launch::launch_radix_sort(client, keys, true, strategy)?;

    if let Some(permutation) = permutation {
        let sorted: Vec<V> = permutation
            .iter()
            .map(|source| values[*source as usize].clone())
            .collect();
        values.clone_from_slice(&sorted);
    }

    Ok(report)
}
