use chainscan_runtime::{cube::CubeContext, kernel::CubeKernel, partition::TileSlices};

use crate::{
    Monoid, ScanMode,
    chain::CarryChain,
    local::LocalReducer,
    lookback::{LookbackStats, lookback},
    tile::TileAssigner,
};

/// One cube per tile: reduce the tile, post it, look back over the predecessors, post the
/// inclusive value, then write the tile's results.
pub(crate) struct ChainedScanKernel<'a, M: Monoid> {
    pub monoid: &'a M,
    pub input: &'a [M::Value],
    pub output: Option<TileSlices<'a, M::Value>>,
    pub mode: ScanMode,
    pub seed: Option<M::Value>,
    pub assigner: TileAssigner,
    pub chain: CarryChain<M::Value>,
    pub line_size: u32,
    pub use_planes: bool,
    pub spin_budget: u32,
    pub stats: LookbackStats,
}

impl<M: Monoid> CubeKernel for ChainedScanKernel<'_, M> {
    fn execute(&self, cube: &CubeContext) {
        let tile = self.assigner.tile(cube.cube_pos());
        let input = &self.input[tile.range()];
        let reducer = LocalReducer::new(self.monoid, self.line_size, self.use_planes);
        let combine_input = |acc, index: usize| self.monoid.combine(acc, input[index]);

        let (unit_prefixes, local) = if self.mode.is_scan() {
            let (prefixes, local) = reducer.unit_exclusive_scan_by(cube, input.len(), combine_input);
            (Some(prefixes), local)
        } else {
            (None, reducer.reduce_by(cube, input.len(), combine_input))
        };

        let prefix = match tile.id {
            0 => self.seed.unwrap_or_else(|| self.monoid.identity()),
            id => {
                self.chain.publish_local(id, local);
                lookback(
                    self.monoid,
                    &self.chain,
                    id,
                    self.seed,
                    self.spin_budget,
                    &self.stats,
                    |predecessor| {
                        let stalled = self.assigner.tile(predecessor);
                        reducer.reduce(cube, &self.input[stalled.range()])
                    },
                )
            }
        };

        self.chain
            .publish_global(tile.id, self.monoid.combine(prefix, local));

        if let (Some(unit_prefixes), Some(output)) = (unit_prefixes, &self.output) {
            if let Some(output) = output.take(tile.id as usize) {
                let inclusive = self.mode == ScanMode::Inclusive;
                reducer.write_scan(cube, input, output, &unit_prefixes, prefix, inclusive);
            }
        }
    }
}
