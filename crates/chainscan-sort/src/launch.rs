use core::sync::atomic::AtomicU32;

use chainscan_runtime::{Runtime, client::ComputeClient, config::dispatch::DispatchLogLevel};
use chainscan_scan::{
    LookbackCounts, chain::CarryChain, exclusive_scan, instructions::Sum, lookback::LookbackStats,
};

use crate::{
    RadixKey, SortSetupError, SortStrategy,
    config::{SortConfig, key_count, resolve_strategy},
    digits::{NUM_PASSES, RADIX},
    histogram::histogram_words,
    onesweep::OnesweepPassKernel,
};

/// Outcome of a radix sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortReport {
    /// Passes dispatched. A pass is skipped when every key has the same digit.
    pub passes_run: u32,
    /// Tiles of every pass.
    pub num_tiles: u32,
    /// Lookback counters summed over every pass.
    pub lookback: LookbackCounts,
}

/// Sort `keys` in place. With `track_indices`, also returns the position in the input of every
/// sorted key.
pub(crate) fn launch_radix_sort<R: Runtime, K: RadixKey>(
    client: &ComputeClient<R>,
    keys: &mut [K],
    track_indices: bool,
    strategy: Option<SortStrategy>,
) -> Result<(SortReport, Option<Vec<u32>>), SortSetupError> {
    let strategy = resolve_strategy(client, strategy)?;
    let len = key_count(keys.len())?;
    let config = SortConfig::generate(&strategy, len);

    let words: Vec<u32> = keys.iter().map(|key| key.to_radix()).collect();
    let histograms = histogram_words(client, &words, &config, &strategy)?;

    let mut words_in = into_atomics(words);
    let mut words_out = zeroed(len);
    let mut indices = if track_indices {
        Some((into_atomics((0..len).collect()), zeroed(len)))
    } else {
        None
    };

    let mut report = SortReport {
        passes_run: 0,
        num_tiles: config.num_tiles,
        lookback: LookbackCounts::default(),
    };

    for (pass, histogram) in histograms.iter().enumerate() {
        if histogram.iter().any(|count| *count == len) {
            log::trace!("Skipping pass {pass}: every key has the same digit");
            continue;
        }

        let digit_offsets: [u32; RADIX] = exclusive_scan(client, &Sum::<u32>::new(), histogram, None)?
            .try_into()
            .unwrap_or_else(|_| unreachable!("The scan of a histogram has one offset per bucket."));

        log::debug!(
            "Radix sort pass {pass}/{NUM_PASSES} of {len} keys: {} tiles of {} keys",
            config.num_tiles,
            strategy.tile_size,
        );

        let lookback = {
            let kernel = OnesweepPassKernel {
                words_in: &words_in,
                words_out: &words_out,
                indices: indices
                    .as_ref()
                    .map(|(indices_in, indices_out)| (indices_in.as_slice(), indices_out.as_slice())),
                pass,
                digit_offsets,
                assigner: config.assigner,
                chain: CarryChain::new(config.num_tiles as usize),
                keys_per_unit: strategy.keys_per_unit,
                use_planes: strategy.use_planes,
                spin_budget: strategy.spin_budget,
                stats: LookbackStats::default(),
            };

            client.launch(&kernel, config.cube_count.clone(), config.cube_dim)?;

            kernel.stats.snapshot()
        };

        client.log_dispatch(DispatchLogLevel::Full, || {
            format!(
                "[Onesweep] pass {pass} | tiles: {} | steps: {} | fallbacks: {} | spins: {}",
                config.num_tiles, lookback.steps, lookback.fallbacks, lookback.spins,
            )
        });

        report.passes_run += 1;
        report.lookback = report.lookback + lookback;

        core::mem::swap(&mut words_in, &mut words_out);
        if let Some((indices_in, indices_out)) = indices.as_mut() {
            core::mem::swap(indices_in, indices_out);
        }
    }

    for (key, word) in keys.iter_mut().zip(words_in) {
        *key = K::from_radix(word.into_inner());
    }

    let permutation = indices.map(|(indices_in, _)| {
        indices_in
            .into_iter()
            .map(AtomicU32::into_inner)
            .collect()
    });

    Ok((report, permutation))
}

fn into_atomics(values: Vec<u32>) -> Vec<AtomicU32> {
    values.into_iter().map(AtomicU32::new).collect()
}

fn zeroed(len: u32) -> Vec<AtomicU32> {
    (0..len).map(|_| AtomicU32::new(0)).collect()
}
