use core::sync::atomic::{AtomicU32, Ordering};

use chainscan_runtime::{
    Runtime,
    client::ComputeClient,
    cube::{CubeContext, SharedMemory},
    kernel::CubeKernel,
};
use chainscan_scan::tile::TileAssigner;

use crate::{
    RadixKey, SortSetupError, SortStrategy,
    config::{SortConfig, key_count, resolve_strategy},
    digits::{NUM_PASSES, RADIX, digit},
};

/// Bucket counts of every pass, indexed by `[pass][digit]`.
pub type PassHistograms = [[u32; RADIX]; NUM_PASSES];

/// Counts the digits of every pass at once. Each cube counts its tile in shared memory, then
/// flushes the non-empty buckets into the global histograms with atomic adds.
pub(crate) struct DigitHistogramKernel<'a> {
    pub words: &'a [u32],
    pub assigner: TileAssigner,
    pub keys_per_unit: u32,
    pub histograms: [[AtomicU32; RADIX]; NUM_PASSES],
}

impl<'a> DigitHistogramKernel<'a> {
    pub fn new(words: &'a [u32], assigner: TileAssigner, keys_per_unit: u32) -> Self {
        Self {
            words,
            assigner,
            keys_per_unit,
            histograms: core::array::from_fn(|_| core::array::from_fn(|_| AtomicU32::new(0))),
        }
    }

    pub fn into_histograms(self) -> PassHistograms {
        self.histograms
            .map(|pass| pass.map(|count| count.into_inner()))
    }
}

impl CubeKernel for DigitHistogramKernel<'_> {
    fn execute(&self, cube: &CubeContext) {
        let tile = self.assigner.tile(cube.cube_pos());
        let words = &self.words[tile.range()];
        let keys_per_unit = self.keys_per_unit as usize;
        let mut counts = SharedMemory::new((RADIX * NUM_PASSES) as u32, 0u32);

        cube.for_each_unit(|unit| {
            let start = usize::min(unit as usize * keys_per_unit, words.len());
            let end = usize::min(start + keys_per_unit, words.len());

            for word in &words[start..end] {
                for pass in 0..NUM_PASSES {
                    counts[pass * RADIX + digit(*word, pass)] += 1;
                }
            }
        });

        let num_units = cube.cube_dim() as usize;
        cube.for_each_unit(|unit| {
            for bucket in (unit as usize..RADIX * NUM_PASSES).step_by(num_units) {
                let count = counts[bucket];
                if count > 0 {
                    self.histograms[bucket / RADIX][bucket % RADIX]
                        .fetch_add(count, Ordering::Relaxed);
                }
            }
        });
    }
}

/// Count how many keys fall in every bucket of every pass.
pub fn digit_histogram<R: Runtime, K: RadixKey>(
    client: &ComputeClient<R>,
    keys: &[K],
    strategy: Option<SortStrategy>,
) -> Result<PassHistograms, SortSetupError> {
    let strategy = resolve_strategy(client, strategy)?;
    let len = key_count(keys.len())?;
    let words: Vec<u32> = keys.iter().map(|key| key.to_radix()).collect();

    histogram_words(client, &words, &SortConfig::generate(&strategy, len), &strategy)
}

pub(crate) fn histogram_words<R: Runtime>(
    client: &ComputeClient<R>,
    words: &[u32],
    config: &SortConfig,
    strategy: &SortStrategy,
) -> Result<PassHistograms, SortSetupError> {
    let kernel = DigitHistogramKernel::new(words, config.assigner, strategy.keys_per_unit);

    if config.num_tiles > 0 {
        client.launch(&kernel, config.cube_count.clone(), config.cube_dim)?;
    }

    Ok(kernel.into_histograms())
}
