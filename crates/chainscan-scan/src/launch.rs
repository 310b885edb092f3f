use chainscan_runtime::{
    Runtime,
    client::ComputeClient,
    config::{TypeNameFormatLevel, dispatch::DispatchLogLevel, type_name_format},
    partition::TileSlices,
};

use crate::{
    Monoid, ScanMode, ScanSetupError,
    chain::CarryChain,
    config::{ScanConfig, ScanStrategy},
    kernel::ChainedScanKernel,
    lookback::{LookbackCounts, LookbackStats},
};

/// Outcome of a chained scan dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanReport<V> {
    /// Combination of the seed and every input element.
    pub total: V,
    /// Number of tiles, equal to the number of cubes dispatched.
    pub num_tiles: u32,
    /// Lookback counters summed over every cube.
    pub lookback: LookbackCounts,
}

/// Validate the request, then run the chained scan in a single dispatch.
pub(crate) fn launch_chained_scan<R: Runtime, M: Monoid>(
    client: &ComputeClient<R>,
    monoid: &M,
    input: &[M::Value],
    output: &mut [M::Value],
    mode: ScanMode,
    seed: Option<M::Value>,
    strategy: Option<ScanStrategy>,
) -> Result<ScanReport<M::Value>, ScanSetupError> {
    let expected = mode.output_len(input.len());
    if output.len() != expected {
        return Err(ScanSetupError::OutputLength {
            expected,
            actual: output.len(),
        });
    }

    let strategy = resolve_strategy(client, strategy, input.len())?;
    let config = ScanConfig::generate(strategy, input.len())?;

    if config.num_tiles == 0 {
        let total = seed.unwrap_or_else(|| monoid.identity());
        if mode == ScanMode::Reduce {
            output[0] = total;
        }

        return Ok(ScanReport {
            total,
            num_tiles: 0,
            lookback: LookbackCounts::default(),
        });
    }

    log::debug!(
        "Chained scan of {} elements: {} tiles of {} elements, {} units per cube",
        input.len(),
        config.num_tiles,
        strategy.tile_size,
        config.cube_dim.num_elems(),
    );

    let (output, reduce_output) = match mode {
        ScanMode::Reduce => (None, Some(output)),
        _ => (Some(TileSlices::new(output, strategy.tile_size as usize)), None),
    };

    let kernel = ChainedScanKernel {
        monoid,
        input,
        output,
        mode,
        seed,
        assigner: config.assigner,
        chain: CarryChain::new(config.num_tiles as usize),
        line_size: strategy.line_size,
        use_planes: strategy.use_planes,
        spin_budget: strategy.spin_budget,
        stats: LookbackStats::default(),
    };

    client.launch(&kernel, config.cube_count.clone(), config.cube_dim)?;

    let last = config.num_tiles - 1;
    let total = kernel.chain.global_value(last).unwrap_or_else(|| {
        unreachable!("Every cube posts its inclusive value before the dispatch returns.")
    });
    let lookback = kernel.stats.snapshot();

    client.log_dispatch(DispatchLogLevel::Full, || {
        format!(
            "[Lookback] {} | tiles: {} | steps: {} | fallbacks: {} | spins: {}",
            type_name_format(core::any::type_name::<M>(), TypeNameFormatLevel::Balanced),
            config.num_tiles,
            lookback.steps,
            lookback.fallbacks,
            lookback.spins,
        )
    });

    if let Some(output) = reduce_output {
        output[0] = total;
    }

    Ok(ScanReport {
        total,
        num_tiles: config.num_tiles,
        lookback,
    })
}

pub(crate) fn resolve_strategy<R: Runtime>(
    client: &ComputeClient<R>,
    strategy: Option<ScanStrategy>,
    len: usize,
) -> Result<ScanStrategy, ScanSetupError> {
    strategy
        .unwrap_or_else(|| ScanStrategy::fallback_strategy(client, len))
        .validate(client, len)
}
