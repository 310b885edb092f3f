use chainscan_runtime::{
    DeviceProperties,
    cube::{CubeCount, CubeDim},
    kernel::CubeKernel,
    logging::ServerLogger,
    server::ComputeServer,
};

use super::scheduler::Scheduler;

/// Runs kernels on the host threads.
#[derive(new, Debug)]
pub struct CpuServer {
    properties: DeviceProperties,
    scheduler: Scheduler,
    logger: spin::Mutex<ServerLogger>,
}

impl CpuServer {
    /// The scheduler handing cubes to worker threads.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

impl ComputeServer for CpuServer {
    fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    fn logger(&self) -> &spin::Mutex<ServerLogger> {
        &self.logger
    }

    fn execute(&self, kernel: &dyn CubeKernel, count: CubeCount, dim: CubeDim) {
        self.scheduler.dispatch_execute(kernel, count, dim);
    }
}
