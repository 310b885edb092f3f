use crate::{
    DeviceProperties,
    cube::{CubeCount, CubeDim},
    kernel::CubeKernel,
    logging::ServerLogger,
};
use thiserror::Error;

/// Kernel Launch Errors.
#[derive(Error, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// Too many resources were requested
    #[error("Too many resources were requested during launch\n{0}")]
    TooManyResources(#[from] ResourceLimitError),
}

/// Resource limit errors.
#[derive(Error, Clone, PartialEq, Eq)]
pub enum ResourceLimitError {
    /// Total units exceeds maximum
    #[error(
        "Total unit count exceeds maximum.\nRequested {requested} units, max units is {max}."
    )]
    Units {
        /// Requested value
        requested: u32,
        /// Maximum value
        max: u32,
    },
    /// `CubeCount` exceeds maximum
    #[error("Cube count exceeds maximum.\nRequested {requested} cubes, max is {max}.")]
    CubeCount {
        /// Requested value
        requested: u64,
        /// Maximum value
        max: u32,
    },
}

impl core::fmt::Debug for LaunchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

impl core::fmt::Debug for ResourceLimitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

/// The compute server is responsible for running kernels on a device.
///
/// Servers are shared between clients, so every method takes `&self`.
pub trait ComputeServer: Send + Sync + core::fmt::Debug + 'static {
    /// The properties of the device driven by this server.
    fn properties(&self) -> &DeviceProperties;

    /// The logger based on the global chainscan configuration.
    fn logger(&self) -> &spin::Mutex<ServerLogger>;

    /// Execute `kernel` once per cube of `count`, each cube with `dim` units.
    ///
    /// Returns once every cube has finished. The geometry is assumed to be validated against
    /// the device properties.
    fn execute(&self, kernel: &dyn CubeKernel, count: CubeCount, dim: CubeDim);
}
