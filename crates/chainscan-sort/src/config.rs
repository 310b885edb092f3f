use chainscan_runtime::{
    Feature, Runtime,
    client::ComputeClient,
    cube::{CubeCount, CubeDim},
};
use chainscan_scan::tile::TileAssigner;
use serde::{Deserialize, Serialize};

use crate::SortSetupError;

const DEFAULT_UNITS_PER_CUBE: u32 = 256;
const DEFAULT_KEYS_PER_UNIT: u32 = 16;

/// How every pass of a radix sort is executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct SortStrategy {
    /// Keys per tile. Every cube sorts one tile with `tile_size / keys_per_unit` units.
    pub tile_size: u32,

    /// Consecutive keys ranked by a unit.
    pub keys_per_unit: u32,

    /// Combine the digit counts of units with plane collectives.
    pub use_planes: bool,

    /// Re-reads of an invalid predecessor slot before recounting it.
    pub spin_budget: u32,
}

impl SortStrategy {
    /// Create a strategy with the given geometry, using planes when available.
    pub fn new<R: Runtime>(client: &ComputeClient<R>, tile_size: u32, keys_per_unit: u32) -> Self {
        Self {
            tile_size,
            keys_per_unit,
            use_planes: planes_available(client),
            spin_budget: 0,
        }
    }

    /// The strategy used when none is given.
    pub fn fallback_strategy<R: Runtime>(client: &ComputeClient<R>) -> Self {
        let max_units = client.properties().hardware_properties().max_units_per_cube;
        let units = u32::min(DEFAULT_UNITS_PER_CUBE, max_units).max(1);

        Self::new(client, units * DEFAULT_KEYS_PER_UNIT, DEFAULT_KEYS_PER_UNIT)
    }

    /// Set the number of re-reads before recounting a stalled tile.
    pub fn with_spin_budget(mut self, spin_budget: u32) -> Self {
        self.spin_budget = spin_budget;
        self
    }

    /// Enable or disable plane instructions.
    pub fn with_planes(mut self, use_planes: bool) -> Self {
        self.use_planes = use_planes;
        self
    }

    /// Check the strategy against the client.
    pub fn validate<R: Runtime>(self, client: &ComputeClient<R>) -> Result<Self, SortSetupError> {
        if self.tile_size == 0
            || self.keys_per_unit == 0
            || self.tile_size % self.keys_per_unit != 0
        {
            return Err(SortSetupError::InvalidStrategy {
                tile_size: self.tile_size,
                keys_per_unit: self.keys_per_unit,
            });
        }

        let units = self.tile_size / self.keys_per_unit;
        let max = client.properties().hardware_properties().max_units_per_cube;
        if units > max {
            return Err(SortSetupError::TooManyUnits { units, max });
        }

        if self.use_planes && !planes_available(client) {
            return Err(SortSetupError::PlanesUnavailable);
        }

        Ok(self)
    }
}

fn planes_available<R: Runtime>(client: &ComputeClient<R>) -> bool {
    let properties = client.properties();
    let hw_props = properties.hardware_properties();

    properties.feature_enabled(Feature::Plane) && hw_props.plane_size_min == hw_props.plane_size_max
}

/// Dispatch geometry shared by the histogram and every pass.
#[derive(Debug, Clone)]
pub(crate) struct SortConfig {
    pub cube_count: CubeCount,
    pub cube_dim: CubeDim,
    pub assigner: TileAssigner,
    pub num_tiles: u32,
}

impl SortConfig {
    /// Tiles of `len` keys, where `len` already fits in 32 bits.
    pub(crate) fn generate(strategy: &SortStrategy, len: u32) -> Self {
        let assigner = TileAssigner::new(len as usize, strategy.tile_size as usize);
        let num_tiles = len.div_ceil(strategy.tile_size);

        Self {
            cube_count: CubeCount::new_1d(num_tiles),
            cube_dim: CubeDim::new_1d(strategy.tile_size / strategy.keys_per_unit),
            assigner,
            num_tiles,
        }
    }
}

pub(crate) fn resolve_strategy<R: Runtime>(
    client: &ComputeClient<R>,
    strategy: Option<SortStrategy>,
) -> Result<SortStrategy, SortSetupError> {
    strategy
        .unwrap_or_else(|| SortStrategy::fallback_strategy(client))
        .validate(client)
}

pub(crate) fn key_count(len: usize) -> Result<u32, SortSetupError> {
    u32::try_from(len).map_err(|_| SortSetupError::TooManyKeys { len })
}
