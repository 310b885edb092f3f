use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use chainscan_runtime::{
    DeviceProperties, Feature, HardwareProperties, Runtime,
    client::ComputeClient,
    config::GlobalConfig,
    cube::{CubeContext, CubeCount, CubeDim, SharedMemory},
    kernel::CubeKernel,
    logging::ServerLogger,
    partition::TileSlices,
    server::ComputeServer,
};

/// Runs every cube on the calling thread, last cube first.
#[derive(Debug)]
pub struct DummyServer {
    properties: DeviceProperties,
    logger: spin::Mutex<ServerLogger>,
}

impl ComputeServer for DummyServer {
    fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    fn logger(&self) -> &spin::Mutex<ServerLogger> {
        &self.logger
    }

    fn execute(&self, kernel: &dyn CubeKernel, count: CubeCount, dim: CubeDim) {
        let num_cubes = count.num_cubes() as u32;
        for cube_pos in (0..num_cubes).rev() {
            kernel.execute(&CubeContext::new(cube_pos, num_cubes, dim, 4));
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct DummyDevice;

#[derive(Debug)]
pub struct DummyRuntime;

impl Runtime for DummyRuntime {
    type Server = DummyServer;
    type Device = DummyDevice;

    fn client(_device: &Self::Device) -> ComputeClient<Self> {
        let properties = DeviceProperties::new(
            &[Feature::Plane],
            HardwareProperties {
                plane_size_min: 4,
                plane_size_max: 4,
                max_units_per_cube: 64,
                max_cube_count: 16,
            },
        );

        ComputeClient::new(DummyServer {
            properties,
            logger: spin::Mutex::new(ServerLogger::from_config(Arc::new(GlobalConfig::default()))),
        })
    }

    fn name(_client: &ComputeClient<Self>) -> &'static str {
        "dummy"
    }
}

pub fn test_client(device: &DummyDevice) -> ComputeClient<DummyRuntime> {
    DummyRuntime::client(device)
}

/// Each cube writes the sum of its unit positions plus its cube position in its own tile.
pub struct DummyTileSum<'a> {
    pub output: TileSlices<'a, u32>,
    pub visited: AtomicU32,
}

impl CubeKernel for DummyTileSum<'_> {
    fn execute(&self, cube: &CubeContext) {
        self.visited.fetch_add(1, Ordering::Relaxed);

        let mut shared = SharedMemory::new(cube.cube_dim(), 0u32);
        cube.for_each_unit(|unit| shared[unit as usize] = unit);

        if let Some(tile) = self.output.take(cube.cube_pos() as usize) {
            tile[0] = shared.iter().sum::<u32>() + cube.cube_pos();
        }
    }
}
