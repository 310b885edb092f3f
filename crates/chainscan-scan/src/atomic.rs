use chainscan_runtime::{
    Feature, Runtime, client::ComputeClient, cube::CubeContext, kernel::CubeKernel,
};

use crate::{
    AtomicMonoid, ScanSetupError,
    config::{ScanConfig, ScanStrategy},
    launch::resolve_strategy,
    local::LocalReducer,
    tile::TileAssigner,
};

struct AtomicReduceKernel<'a, M: AtomicMonoid> {
    monoid: &'a M,
    input: &'a [M::Value],
    assigner: TileAssigner,
    line_size: u32,
    use_planes: bool,
    output: M::Atomic,
}

impl<M: AtomicMonoid> CubeKernel for AtomicReduceKernel<'_, M> {
    fn execute(&self, cube: &CubeContext) {
        let tile = self.assigner.tile(cube.cube_pos());
        let reducer = LocalReducer::new(self.monoid, self.line_size, self.use_planes);
        let local = reducer.reduce(cube, &self.input[tile.range()]);

        self.monoid.atomic_combine(&self.output, local);
    }
}

/// Reduce `input` without a carry chain: every cube folds its tile's reduction into one atomic
/// cell.
///
/// Cubes combine in completion order, so the monoid must be commutative. For floats the result
/// may differ from run to run by rounding.
pub fn atomic_reduce<R: Runtime, M: AtomicMonoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    strategy: Option<ScanStrategy>,
) -> Result<M::Value, ScanSetupError> {
    if !client.properties().feature_enabled(Feature::AtomicRmw) {
        return Err(ScanSetupError::AtomicsUnavailable);
    }

    let strategy = resolve_strategy(client, strategy, input.len())?;
    let config = ScanConfig::generate(strategy, input.len())?;

    let kernel = AtomicReduceKernel {
        monoid,
        input,
        assigner: config.assigner,
        line_size: strategy.line_size,
        use_planes: strategy.use_planes,
        output: monoid.atomic_new(monoid.identity()),
    };

    if config.num_tiles > 0 {
        client.launch(&kernel, config.cube_count, config.cube_dim)?;
    }

    Ok(monoid.atomic_load(&kernel.output))
}
