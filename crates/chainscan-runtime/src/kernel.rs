use crate::cube::CubeContext;

/// A kernel that can be dispatched over a grid of cubes.
///
/// Every cube of a dispatch calls [execute](CubeKernel::execute) exactly once, on any thread
/// and in any order. Kernels therefore share state only through `Sync` structures.
pub trait CubeKernel: Sync {
    /// Name of the kernel for debugging.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Execute the work of a single cube.
    fn execute(&self, cube: &CubeContext);
}
