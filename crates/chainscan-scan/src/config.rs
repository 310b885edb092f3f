use chainscan_runtime::{
    Feature, Runtime,
    client::ComputeClient,
    cube::{CubeCount, CubeDim},
};
use serde::{Deserialize, Serialize};

use crate::{ScanSetupError, tile::TileAssigner};

// Units per cube picked when no strategy is given.
const DEFAULT_UNITS_PER_CUBE: u32 = 256;

/// How a chained scan is executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct ScanStrategy {
    /// Elements per tile, a power of two. Every cube processes one tile with
    /// `tile_size / line_size` units.
    pub tile_size: u32,

    /// Consecutive elements owned by a unit.
    pub line_size: u32,

    /// If true and the compute client supports plane instructions, units of a plane combine
    /// their partials with plane collectives instead of shared memory.
    pub use_planes: bool,

    /// Re-reads of an invalid predecessor slot before falling back on it. Zero falls back
    /// immediately. The budget is bounded, so a cube never waits on another cube indefinitely.
    pub spin_budget: u32,
}

impl ScanStrategy {
    /// Create a strategy with the given tile and line sizes, using planes when available.
    pub fn new<R: Runtime>(client: &ComputeClient<R>, tile_size: u32, line_size: u32) -> Self {
        Self {
            tile_size,
            line_size,
            use_planes: support_plane::<R>(client) && precise_plane_dim::<R>(client),
            spin_budget: 0,
        }
    }

    /// The strategy used when none is given: the largest supported line size dividing `len`.
    pub fn fallback_strategy<R: Runtime>(client: &ComputeClient<R>, len: usize) -> Self {
        let line_size = R::supported_line_sizes()
            .iter()
            .map(|size| *size as u32)
            .filter(|size| *size > 0 && len % *size as usize == 0)
            .max()
            .unwrap_or(1);

        let max_units = client.properties().hardware_properties().max_units_per_cube;
        // Largest power of two within the device limit.
        let units = u32::min(DEFAULT_UNITS_PER_CUBE, max_units.max(1));
        let units = 1u32 << units.ilog2();

        Self::new(client, units * line_size, line_size)
    }

    /// Set the number of re-reads before falling back.
    pub fn with_spin_budget(mut self, spin_budget: u32) -> Self {
        self.spin_budget = spin_budget;
        self
    }

    /// Enable or disable plane instructions.
    pub fn with_planes(mut self, use_planes: bool) -> Self {
        self.use_planes = use_planes;
        self
    }

    /// Check the strategy against the client and an input of `len` elements.
    pub fn validate<R: Runtime>(
        self,
        client: &ComputeClient<R>,
        len: usize,
    ) -> Result<Self, ScanSetupError> {
        let supported = R::supported_line_sizes();
        if !supported.iter().any(|size| *size as u32 == self.line_size) {
            return Err(ScanSetupError::UnsupportedLineSize {
                line_size: self.line_size,
                supported: supported.to_vec(),
            });
        }

        if !self.tile_size.is_power_of_two() || self.tile_size % self.line_size != 0 {
            return Err(ScanSetupError::InvalidTileSize {
                tile_size: self.tile_size,
                line_size: self.line_size,
            });
        }

        let units = self.tile_size / self.line_size;
        let max = client.properties().hardware_properties().max_units_per_cube;
        if units > max {
            return Err(ScanSetupError::TooManyUnits { units, max });
        }

        if len % self.line_size as usize != 0 {
            return Err(ScanSetupError::Misaligned {
                len,
                line_size: self.line_size,
            });
        }

        if self.use_planes {
            if !support_plane::<R>(client) {
                return Err(ScanSetupError::PlanesUnavailable);
            }
            if !precise_plane_dim::<R>(client) {
                return Err(ScanSetupError::ImprecisePlaneDim);
            }
        }

        Ok(self)
    }
}

fn support_plane<R: Runtime>(client: &ComputeClient<R>) -> bool {
    client.properties().feature_enabled(Feature::Plane)
}

fn precise_plane_dim<R: Runtime>(client: &ComputeClient<R>) -> bool {
    let hw_props = client.properties().hardware_properties();
    hw_props.plane_size_min == hw_props.plane_size_max
}

/// Dispatch geometry of a chained scan.
#[derive(Debug, Clone)]
pub(crate) struct ScanConfig {
    /// One cube per tile.
    pub cube_count: CubeCount,
    /// One unit per line of a tile.
    pub cube_dim: CubeDim,
    /// The tiles of the input.
    pub assigner: TileAssigner,
    /// Number of tiles.
    pub num_tiles: u32,
}

impl ScanConfig {
    /// Generate the geometry for an input of `len` elements.
    pub(crate) fn generate(strategy: ScanStrategy, len: usize) -> Result<Self, ScanSetupError> {
        let assigner = TileAssigner::new(len, strategy.tile_size as usize);
        let num_tiles = assigner.num_tiles();
        let num_tiles = u32::try_from(num_tiles)
            .map_err(|_| ScanSetupError::TooManyTiles { num_tiles })?;

        Ok(Self {
            cube_count: CubeCount::new_1d(num_tiles),
            cube_dim: CubeDim::new_1d(strategy.tile_size / strategy.line_size),
            assigner,
            num_tiles,
        })
    }
}
