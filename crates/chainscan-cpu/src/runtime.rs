use std::sync::OnceLock;

use chainscan_runtime::{
    DeviceProperties, Feature, HardwareProperties, Runtime,
    client::ComputeClient,
    config::{GlobalConfig, dispatch::CubeSchedule},
    logging::ServerLogger,
};

use crate::{
    compute::{scheduler::Scheduler, server::CpuServer},
    device::CpuDevice,
};

/// Options used to create a CPU client.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// The maximum number of cubes running at the same time.
    pub max_workers: usize,
    /// The plane width given to every cube.
    pub plane_dim: u32,
    /// The order in which cubes are started.
    pub schedule: CubeSchedule,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self::from_config(&GlobalConfig::get())
    }
}

impl RuntimeOptions {
    /// Read the options from the dispatch section of the configuration.
    pub fn from_config(config: &GlobalConfig) -> Self {
        let max_workers = config.dispatch.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1)
        });

        Self {
            max_workers,
            plane_dim: config.dispatch.plane_dim,
            schedule: config.dispatch.schedule.clone(),
        }
    }

    /// Run cubes one at a time in the given order.
    pub fn sequential(schedule: CubeSchedule) -> Self {
        Self {
            max_workers: 1,
            plane_dim: GlobalConfig::get().dispatch.plane_dim,
            schedule,
        }
    }
}

/// The CPU runtime.
#[derive(Debug)]
pub struct CpuRuntime;

static RUNTIME: OnceLock<ComputeClient<CpuRuntime>> = OnceLock::new();

impl CpuRuntime {
    /// Create a client that doesn't share its server with [client](Runtime::client).
    pub fn client_with_options(options: RuntimeOptions) -> ComputeClient<Self> {
        create_client(options)
    }
}

fn create_client(options: RuntimeOptions) -> ComputeClient<CpuRuntime> {
    let plane_dim = options.plane_dim.max(1);
    let hardware = HardwareProperties {
        plane_size_min: plane_dim,
        plane_size_max: plane_dim,
        max_units_per_cube: 1024,
        max_cube_count: u32::MAX,
    };
    let properties = DeviceProperties::new(&[Feature::Plane, Feature::AtomicRmw], hardware);

    log::debug!(
        "Creating CPU client with {} workers, plane dim {plane_dim}, schedule {:?}",
        options.max_workers,
        options.schedule
    );

    let scheduler = Scheduler::new(options.max_workers, plane_dim, options.schedule);
    let server = CpuServer::new(
        properties,
        scheduler,
        spin::Mutex::new(ServerLogger::default()),
    );

    ComputeClient::new(server)
}

impl Runtime for CpuRuntime {
    type Server = CpuServer;
    type Device = CpuDevice;

    fn client(_device: &Self::Device) -> ComputeClient<Self> {
        RUNTIME
            .get_or_init(|| create_client(RuntimeOptions::default()))
            .clone()
    }

    fn name(_client: &ComputeClient<Self>) -> &'static str {
        "cpu"
    }
}
