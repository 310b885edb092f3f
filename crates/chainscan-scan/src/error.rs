use chainscan_runtime::server::LaunchError;
use thiserror::Error;

/// Errors returned before any dispatch when a scan can't be set up.
#[derive(Error, Clone, PartialEq, Eq)]
pub enum ScanSetupError {
    /// The tile size isn't a power of two, or the tile doesn't split into whole lines.
    #[error(
        "Invalid tile size\nCaused by:\n  A tile of {tile_size} elements isn't a power of two split in lines of {line_size} elements."
    )]
    InvalidTileSize {
        /// Requested tile size.
        tile_size: u32,
        /// Requested line size.
        line_size: u32,
    },

    /// The runtime can't load lines of that size.
    #[error(
        "Unsupported line size\nCaused by:\n  The runtime supports line sizes {supported:?}, got {line_size}."
    )]
    UnsupportedLineSize {
        /// Requested line size.
        line_size: u32,
        /// Line sizes supported by the runtime.
        supported: Vec<u8>,
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

    /// The input length isn't a multiple of the line size.
    #[error(
        "Misaligned input\nCaused by:\n  The input has {len} elements, which isn't a multiple of the line size {line_size}."
    )]
    Misaligned {
        /// Number of input elements.
        len: usize,
        /// Requested line size.
        line_size: u32,
    },

    /// The output doesn't have the length required by the mode.
    #[error("Invalid output length\nCaused by:\n  Expected {expected} elements, got {actual}.")]
    OutputLength {
        /// Required length.
        expected: usize,
        /// Provided length.
        actual: usize,
    },

    /// The input needs more tiles than a dispatch can address.
    #[error("Too many tiles\nCaused by:\n  The input needs {num_tiles} tiles.")]
    TooManyTiles {
        /// Number of tiles needed.
        num_tiles: usize,
    },

    /// Plane instructions were requested but aren't supported.
    #[error("Plane instructions are requested but not supported by the device.")]
    PlanesUnavailable,

    /// Plane instructions were requested but the plane size isn't fixed on this device.
    #[error("Plane instructions are requested but the plane size of the device varies.")]
    ImprecisePlaneDim,

    /// Atomic read-modify-write was requested but isn't supported.
    #[error("Atomic reduction is requested but atomics aren't supported by the device.")]
    AtomicsUnavailable,

    /// The monoid identity doesn't behave as a neutral element.
    #[error(
        "Identity law violated\nCaused by:\n  Combining the identity with {sample} doesn't give {sample} back."
    )]
    IdentityLaw {
        /// Debug representation of the offending sample.
        sample: String,
    },

    /// The runtime refused the dispatch.
    #[error("Launch failed\nCaused by:\n  {0}")]
    Launch(#[from] LaunchError),
}

impl core::fmt::Debug for ScanSetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}
