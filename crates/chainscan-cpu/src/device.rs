/// The host processor. There is a single CPU device.
#[derive(Default, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CpuDevice;
