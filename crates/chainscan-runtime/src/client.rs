use crate::{
    DeviceProperties, Runtime,
    config::{TypeNameFormatLevel, dispatch::DispatchLogLevel, type_name_format},
    cube::{CubeCount, CubeDim},
    kernel::CubeKernel,
    logging::ProfileLevel,
    server::{ComputeServer, LaunchError, ResourceLimitError},
};
use std::sync::Arc;

/// The ComputeClient is the entry point to launch kernels on a compute server.
#[derive(Debug)]
pub struct ComputeClient<R: Runtime> {
    server: Arc<R::Server>,
}

impl<R: Runtime> Clone for ComputeClient<R> {
    fn clone(&self) -> Self {
        Self {
            server: self.server.clone(),
        }
    }
}

impl<R: Runtime> ComputeClient<R> {
    /// Create a new client.
    pub fn new(server: R::Server) -> Self {
        Self {
            server: Arc::new(server),
        }
    }

    /// Get the features supported by the compute server.
    pub fn properties(&self) -> &DeviceProperties {
        self.server.properties()
    }

    /// The server driven by this client.
    pub fn server(&self) -> &R::Server {
        &self.server
    }

    /// Log the profiling summary accumulated so far, then reset it.
    pub fn profile_summary(&self) {
        self.server.logger().lock().profile_summary();
    }

    /// Log a message built by `message` when dispatch logging is enabled at `level` or above.
    ///
    /// The message is only built when it is going to be written.
    pub fn log_dispatch<F: FnOnce() -> String>(&self, level: DispatchLogLevel, message: F) {
        let mut logger = self.server.logger().lock();
        if logger.dispatch_level().is_some_and(|current| current >= level) {
            logger.log_dispatch(level, message());
        }
    }

    /// Launch `kernel` once per cube of `count` and wait for every cube to finish.
    pub fn launch(
        &self,
        kernel: &dyn CubeKernel,
        count: CubeCount,
        dim: CubeDim,
    ) -> Result<(), LaunchError> {
        self.validate(&count, &dim)?;

        let (profile_level, dispatch_level) = {
            let logger = self.server.logger().lock();
            (logger.profile_level(), logger.dispatch_level())
        };

        if dispatch_level.is_some() {
            let name = type_name_format(kernel.name(), TypeNameFormatLevel::Balanced);
            self.log_dispatch(DispatchLogLevel::Basic, || {
                format!(
                    "[Dispatch] {name} | cubes: {} | units: {}",
                    count.num_cubes(),
                    dim.num_elems()
                )
            });
        }

        match profile_level {
            None => {
                self.server.execute(kernel, count, dim);
            }
            Some(level) => {
                let name = match level {
                    ProfileLevel::Full => kernel.name().to_string(),
                    _ => type_name_format(kernel.name(), TypeNameFormatLevel::Balanced),
                };
                let start = web_time::Instant::now();
                self.server.execute(kernel, count, dim);
                let duration = start.elapsed();

                self.server
                    .logger()
                    .lock()
                    .register_profiled(name, duration);
            }
        }

        Ok(())
    }

    fn validate(&self, count: &CubeCount, dim: &CubeDim) -> Result<(), ResourceLimitError> {
        let hardware = self.properties().hardware_properties();

        if dim.num_elems() > hardware.max_units_per_cube {
            return Err(ResourceLimitError::Units {
                requested: dim.num_elems(),
                max: hardware.max_units_per_cube,
            });
        }

        if count.num_cubes() > hardware.max_cube_count as u64 {
            return Err(ResourceLimitError::CubeCount {
                requested: count.num_cubes(),
                max: hardware.max_cube_count,
            });
        }

        Ok(())
    }
}
