use chainscan_runtime::server::LaunchError;
use chainscan_scan::ScanSetupError;
use thiserror::Error;

/// Errors returned before any dispatch when a sort can't be set up.
#[derive(Error, Clone, PartialEq, Eq)]
pub enum SortSetupError {
    /// The tile doesn't split into whole units.
    #[error(
        "Invalid sort strategy\nCaused by:\n  A tile of {tile_size} keys can't be split between units of {keys_per_unit} keys."
    )]
    InvalidStrategy {
        /// Requested tile size.
        tile_size: u32,
        /// Requested keys per unit.
        keys_per_unit: u32,
    },

    /// One tile needs more units than a cube can hold.
    #[error(
        "Tile too large\nCaused by:\n  A tile needs {units} units, the device supports at most {max} units per cube."
    )]
    TooManyUnits {
        /// Units needed by one tile.
        units: u32,
        /// Maximum units per cube.
        max: u32,
    },

    /// Plane instructions were requested but the device can't run them with a fixed width.
    #[error("Plane instructions are requested but not supported with a fixed plane size.")]
    PlanesUnavailable,

    /// Keys and values don't pair up.
    #[error("Length mismatch\nCaused by:\n  Got {keys} keys and {values} values.")]
    LengthMismatch {
        /// Number of keys.
        keys: usize,
        /// Number of values.
        values: usize,
    },

    /// Positions of the keys don't fit in 32 bits.
    #[error("Too many keys\nCaused by:\n  {len} keys can't be addressed with 32-bit positions.")]
    TooManyKeys {
        /// Number of keys.
        len: usize,
    },

    /// Computing the bucket offsets failed.
    #[error("Bucket offsets scan failed\nCaused by:\n  {0}")]
    Scan(#[from] ScanSetupError),

    /// The runtime refused the dispatch.
    #[error("Launch failed\nCaused by:\n  {0}")]
    Launch(#[from] LaunchError),
}

impl core::fmt::Debug for SortSetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}
