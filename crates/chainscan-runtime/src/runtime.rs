use crate::{client::ComputeClient, server::ComputeServer};

/// Runtime for the chainscan primitives.
pub trait Runtime: Sized + Send + Sync + 'static + core::fmt::Debug {
    /// The compute server used to run kernels.
    type Server: ComputeServer;
    /// The device used to retrieve the compute client.
    type Device: Default + Clone + core::fmt::Debug + Send + Sync;

    /// Retrieve the compute client from the runtime device.
    fn client(device: &Self::Device) -> ComputeClient<Self>;

    /// The runtime name on the given client.
    fn name(client: &ComputeClient<Self>) -> &'static str;

    /// Supported line sizes for vectorized loads, largest first.
    fn supported_line_sizes() -> &'static [u8] {
        &[4, 2, 1]
    }
}
