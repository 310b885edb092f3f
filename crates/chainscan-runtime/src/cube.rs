use core::ops::{Deref, DerefMut, Range};
use serde::{Deserialize, Serialize};

/// The number of units (threads) in one cube (workgroup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct CubeDim {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl CubeDim {
    /// Create a new cube dim with the given number of units on each axis.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Create a new cube dim with `x` units.
    pub const fn new_1d(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    /// Create a new cube dim with a single unit.
    pub const fn new_single() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }

    /// Total number of units in a cube.
    pub const fn num_elems(&self) -> u32 {
        self.x * self.y * self.z
    }
}

impl Default for CubeDim {
    fn default() -> Self {
        Self::new_single()
    }
}

/// The number of cubes launched by a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeCount {
    /// Dispatch a known count of x, y, z cubes.
    Static(u32, u32, u32),
}

impl CubeCount {
    /// Create a new static cube count with the given x = y = z = 1.
    pub fn new_single() -> Self {
        CubeCount::Static(1, 1, 1)
    }

    /// Create a new static cube count with the given x, and y = z = 1.
    pub fn new_1d(x: u32) -> Self {
        CubeCount::Static(x, 1, 1)
    }

    /// Total number of cubes.
    pub fn num_cubes(&self) -> u64 {
        match self {
            CubeCount::Static(x, y, z) => *x as u64 * *y as u64 * *z as u64,
        }
    }
}

/// What a single cube sees while it executes a kernel.
///
/// Units of a cube progress together: [for_each_unit](CubeContext::for_each_unit) runs one
/// phase of the kernel for every unit and only returns once all of them are done, which is the
/// behavior of a workgroup barrier. Nothing here lets a cube wait on another cube.
#[derive(new, Debug, Clone, Copy)]
pub struct CubeContext {
    cube_pos: u32,
    cube_count: u32,
    cube_dim: CubeDim,
    plane_dim: u32,
}

impl CubeContext {
    /// Position of this cube in the dispatch.
    pub fn cube_pos(&self) -> u32 {
        self.cube_pos
    }

    /// Number of cubes in the dispatch.
    pub fn cube_count(&self) -> u32 {
        self.cube_count
    }

    /// Number of units in this cube.
    pub fn cube_dim(&self) -> u32 {
        self.cube_dim.num_elems()
    }

    /// Number of units in a plane (subgroup).
    pub fn plane_dim(&self) -> u32 {
        self.plane_dim
    }

    /// Number of planes in this cube, the last one possibly partial.
    pub fn plane_count(&self) -> u32 {
        self.cube_dim().div_ceil(self.plane_dim)
    }

    /// Unit positions belonging to the given plane.
    pub fn plane_units(&self, plane: u32) -> Range<u32> {
        let start = plane * self.plane_dim;
        let end = u32::min(start + self.plane_dim, self.cube_dim());
        start..end
    }

    /// Run one phase for every unit of the cube, then synchronize.
    pub fn for_each_unit<F: FnMut(u32)>(&self, mut func: F) {
        for unit_pos in 0..self.cube_dim() {
            func(unit_pos);
        }
    }

    /// Run one phase for every plane of the cube, then synchronize.
    ///
    /// The closure receives the plane id and the units of the plane.
    pub fn for_each_plane<F: FnMut(u32, Range<u32>)>(&self, mut func: F) {
        for plane in 0..self.plane_count() {
            func(plane, self.plane_units(plane));
        }
    }
}

/// Memory visible to every unit of a cube, and only to that cube.
#[derive(Debug, Clone)]
pub struct SharedMemory<T> {
    data: Vec<T>,
}

impl<T: Copy> SharedMemory<T> {
    /// Allocate `size` slots, all initialized to `value`.
    pub fn new(size: u32, value: T) -> Self {
        Self {
            data: vec![value; size as usize],
        }
    }

    /// Reset every slot to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Deref for SharedMemory<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for SharedMemory<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_ranges_cover_partial_planes() {
        let cube = CubeContext::new(0, 1, CubeDim::new_1d(70), 32);

        assert_eq!(cube.plane_count(), 3);
        assert_eq!(cube.plane_units(0), 0..32);
        assert_eq!(cube.plane_units(2), 64..70);
    }

    #[test]
    fn units_run_in_order() {
        let cube = CubeContext::new(0, 1, CubeDim::new_1d(8), 4);
        let mut seen = Vec::new();
        cube.for_each_unit(|unit| seen.push(unit));

        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }
}
