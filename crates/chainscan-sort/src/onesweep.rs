use core::sync::atomic::{AtomicU32, Ordering};

use chainscan_runtime::{cube::CubeContext, kernel::CubeKernel};
use chainscan_scan::{
    Monoid,
    chain::CarryChain,
    local::LocalReducer,
    lookback::{LookbackStats, lookback},
    tile::{Tile, TileAssigner},
};

use crate::digits::{BucketSum, DigitCounts, RADIX, digit};

/// One stable counting-sort pass over a single digit.
///
/// Every cube counts the digits of its tile, posts the counts in the pass's carry chain, then
/// looks back to learn how many keys of each digit precede the tile. A stalled predecessor is
/// recounted by the cube itself. Keys are then scattered to
/// `digit_offsets[d] + preceding[d] + rank`, where the rank counts the keys of digit `d`
/// before it in the tile, which keeps equal digits in input order.
pub(crate) struct OnesweepPassKernel<'a> {
    pub words_in: &'a [AtomicU32],
    pub words_out: &'a [AtomicU32],
    pub indices: Option<(&'a [AtomicU32], &'a [AtomicU32])>,
    pub pass: usize,
    pub digit_offsets: [u32; RADIX],
    pub assigner: TileAssigner,
    pub chain: CarryChain<DigitCounts>,
    pub keys_per_unit: u32,
    pub use_planes: bool,
    pub spin_budget: u32,
    pub stats: LookbackStats,
}

impl OnesweepPassKernel<'_> {
    fn digit_at(&self, tile: &Tile, index: usize) -> usize {
        let word = self.words_in[tile.start + index].load(Ordering::Relaxed);
        digit(word, self.pass)
    }
}

impl CubeKernel for OnesweepPassKernel<'_> {
    fn execute(&self, cube: &CubeContext) {
        let tile = self.assigner.tile(cube.cube_pos());
        let reducer = LocalReducer::new(&BucketSum, self.keys_per_unit, self.use_planes);

        let (unit_prefixes, local) =
            reducer.unit_exclusive_scan_by(cube, tile.len(), |counts: DigitCounts, index| {
                counts.increment(self.digit_at(&tile, index))
            });

        let preceding = match tile.id {
            0 => BucketSum.identity(),
            id => {
                self.chain.publish_local(id, local);
                lookback(
                    &BucketSum,
                    &self.chain,
                    id,
                    None,
                    self.spin_budget,
                    &self.stats,
                    |predecessor| {
                        let stalled = self.assigner.tile(predecessor);
                        reducer.reduce_by(cube, stalled.len(), |counts: DigitCounts, index| {
                            counts.increment(self.digit_at(&stalled, index))
                        })
                    },
                )
            }
        };

        self.chain
            .publish_global(tile.id, BucketSum.combine(preceding, local));

        cube.for_each_unit(|unit| {
            let mut rank = unit_prefixes[unit as usize];

            for index in reducer.unit_range(unit, tile.len()) {
                let source = tile.start + index;
                let word = self.words_in[source].load(Ordering::Relaxed);
                let d = digit(word, self.pass);
                let dest = (self.digit_offsets[d] + preceding.0[d] + rank.0[d]) as usize;
                rank = rank.increment(d);

                self.words_out[dest].store(word, Ordering::Relaxed);
                if let Some((indices_in, indices_out)) = self.indices {
                    let original = indices_in[source].load(Ordering::Relaxed);
                    indices_out[dest].store(original, Ordering::Relaxed);
                }
            }
        });
    }
}
