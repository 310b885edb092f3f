use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Optional capabilities of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Plane (subgroup) collective instructions.
    Plane,
    /// Atomic read-modify-write on global memory.
    AtomicRmw,
}

/// Hardware limits of a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareProperties {
    /// The minimum size of a plane on this device.
    pub plane_size_min: u32,
    /// The maximum size of a plane on this device.
    pub plane_size_max: u32,
    /// The maximum number of units in a cube.
    pub max_units_per_cube: u32,
    /// The maximum number of cubes in a single dispatch.
    pub max_cube_count: u32,
}

/// Properties of what the device can do, like what [features](Feature) are
/// supported by it and what its hardware limits are.
#[derive(Debug, Clone)]
pub struct DeviceProperties {
    set: HashSet<Feature>,
    hardware: HardwareProperties,
}

impl DeviceProperties {
    /// Create a new feature set with the given features and hardware properties.
    pub fn new(features: &[Feature], hardware: HardwareProperties) -> Self {
        let mut set = HashSet::new();
        for feature in features {
            set.insert(*feature);
        }

        DeviceProperties { set, hardware }
    }

    /// Check if the provided [feature](Feature) is supported by the runtime.
    pub fn feature_enabled(&self, feature: Feature) -> bool {
        self.set.contains(&feature)
    }

    /// Register a [feature](Feature) supported by the compute server.
    ///
    /// This should only be used by a runtime when initializing a device.
    pub fn register_feature(&mut self, feature: Feature) -> bool {
        self.set.insert(feature)
    }

    /// The hardware properties of this client.
    pub fn hardware_properties(&self) -> &HardwareProperties {
        &self.hardware
    }
}
