use core::ops::Range;

use chainscan_runtime::cube::{CubeContext, SharedMemory};

use crate::Monoid;

/// Reduces and scans a tile with the units of a single cube.
///
/// Unit `u` owns the `line_size` consecutive elements starting at `u * line_size` and folds
/// them in order. Per-unit partials are then combined either with plane collectives
/// (`use_planes`) or with a barrier and shared-memory tree. Both paths combine the same values
/// in the same index order, so they agree for every associative operator.
#[derive(new, Debug)]
pub struct LocalReducer<'a, M: Monoid> {
    monoid: &'a M,
    line_size: u32,
    use_planes: bool,
}

impl<'a, M: Monoid> LocalReducer<'a, M> {
    /// The monoid driving the reduction.
    pub fn monoid(&self) -> &'a M {
        self.monoid
    }

    /// Elements owned by a unit in a tile of `len` elements. Empty past the end of the tile.
    pub fn unit_range(&self, unit: u32, len: usize) -> Range<usize> {
        let line_size = self.line_size as usize;
        let start = usize::min(unit as usize * line_size, len);
        let end = usize::min(start + line_size, len);
        start..end
    }

    /// Fold every unit's elements, where `fold(acc, index)` adds the element at `index` of the
    /// tile to `acc`.
    ///
    /// Units past the end of the tile hold the identity.
    pub fn unit_partials_by<F>(&self, cube: &CubeContext, len: usize, fold: F) -> SharedMemory<M::Value>
    where
        F: Fn(M::Value, usize) -> M::Value,
    {
        let identity = self.monoid.identity();
        let mut partials = SharedMemory::new(cube.cube_dim(), identity);

        cube.for_each_unit(|unit| {
            partials[unit as usize] = self
                .unit_range(unit, len)
                .fold(identity, |acc, index| fold(acc, index));
        });

        partials
    }

    /// Reduce a tile of `len` elements defined by `fold`.
    pub fn reduce_by<F>(&self, cube: &CubeContext, len: usize, fold: F) -> M::Value
    where
        F: Fn(M::Value, usize) -> M::Value,
    {
        let partials = self.unit_partials_by(cube, len, fold);

        if self.planes_enabled(cube) {
            self.plane_reduce(cube, partials)
        } else {
            self.tree_reduce(cube, partials)
        }
    }

    /// Reduce a tile of values.
    pub fn reduce(&self, cube: &CubeContext, values: &[M::Value]) -> M::Value {
        self.reduce_by(cube, values.len(), |acc, index| {
            self.monoid.combine(acc, values[index])
        })
    }

    /// Exclusive prefix of every unit's partial within the tile, and the tile's reduction.
    pub fn unit_exclusive_scan_by<F>(
        &self,
        cube: &CubeContext,
        len: usize,
        fold: F,
    ) -> (SharedMemory<M::Value>, M::Value)
    where
        F: Fn(M::Value, usize) -> M::Value,
    {
        let partials = self.unit_partials_by(cube, len, fold);

        if self.planes_enabled(cube) {
            self.plane_exclusive_scan(cube, partials)
        } else {
            self.hillis_steele_exclusive_scan(cube, partials)
        }
    }

    /// Scan a tile of values into `output`, every result being prefixed by `seed`.
    ///
    /// Returns the reduction of the tile alone.
    pub fn scan(
        &self,
        cube: &CubeContext,
        input: &[M::Value],
        output: &mut [M::Value],
        seed: M::Value,
        inclusive: bool,
    ) -> M::Value {
        let (prefixes, total) = self.unit_exclusive_scan_by(cube, input.len(), |acc, index| {
            self.monoid.combine(acc, input[index])
        });
        self.write_scan(cube, input, output, &prefixes, seed, inclusive);

        total
    }

    /// Write the scan of a tile given the exclusive prefix of every unit, as returned by
    /// [unit_exclusive_scan_by](Self::unit_exclusive_scan_by).
    pub fn write_scan(
        &self,
        cube: &CubeContext,
        input: &[M::Value],
        output: &mut [M::Value],
        unit_prefixes: &[M::Value],
        seed: M::Value,
        inclusive: bool,
    ) {
        cube.for_each_unit(|unit| {
            let mut acc = self.monoid.combine(seed, unit_prefixes[unit as usize]);

            for index in self.unit_range(unit, input.len()) {
                let next = self.monoid.combine(acc, input[index]);
                output[index] = if inclusive { next } else { acc };
                acc = next;
            }
        });
    }

    fn planes_enabled(&self, cube: &CubeContext) -> bool {
        self.use_planes && cube.plane_dim() > 1
    }

    // Barrier-separated pairwise tree: at every level, unit `u` absorbs its right neighbor.
    fn tree_reduce(&self, cube: &CubeContext, mut shared: SharedMemory<M::Value>) -> M::Value {
        let num_units = cube.cube_dim() as usize;
        let mut stride = 1;

        while stride < num_units {
            cube.for_each_unit(|unit| {
                let unit = unit as usize;
                if unit % (2 * stride) == 0 && unit + stride < num_units {
                    shared[unit] = self.monoid.combine(shared[unit], shared[unit + stride]);
                }
            });
            stride *= 2;
        }

        shared[0]
    }

    // Inclusive Hillis-Steele scan over units with two buffers, shifted to exclusive.
    fn hillis_steele_exclusive_scan(
        &self,
        cube: &CubeContext,
        partials: SharedMemory<M::Value>,
    ) -> (SharedMemory<M::Value>, M::Value) {
        let num_units = cube.cube_dim() as usize;
        let identity = self.monoid.identity();
        let mut src = partials;
        let mut dst = SharedMemory::new(cube.cube_dim(), identity);
        let mut offset = 1;

        while offset < num_units {
            cube.for_each_unit(|unit| {
                let unit = unit as usize;
                dst[unit] = if unit >= offset {
                    self.monoid.combine(src[unit - offset], src[unit])
                } else {
                    src[unit]
                };
            });
            core::mem::swap(&mut src, &mut dst);
            offset *= 2;
        }

        let total = src[num_units - 1];
        cube.for_each_unit(|unit| {
            let unit = unit as usize;
            dst[unit] = match unit {
                0 => identity,
                _ => src[unit - 1],
            };
        });

        (dst, total)
    }

    fn plane_reduce(&self, cube: &CubeContext, partials: SharedMemory<M::Value>) -> M::Value {
        let mut totals = SharedMemory::new(cube.plane_count(), self.monoid.identity());

        cube.for_each_plane(|plane, units| {
            let mut lanes = partials[units.start as usize..units.end as usize].to_vec();
            self.plane_inclusive_scan(&mut lanes);
            totals[plane as usize] = lanes[lanes.len() - 1];
        });

        let plane_dim = cube.plane_dim() as usize;
        let mut totals = totals.to_vec();
        while totals.len() > 1 {
            totals = totals
                .chunks(plane_dim)
                .map(|chunk| {
                    let mut lanes = chunk.to_vec();
                    self.plane_inclusive_scan(&mut lanes);
                    lanes[lanes.len() - 1]
                })
                .collect();
        }

        totals[0]
    }

    fn plane_exclusive_scan(
        &self,
        cube: &CubeContext,
        partials: SharedMemory<M::Value>,
    ) -> (SharedMemory<M::Value>, M::Value) {
        let identity = self.monoid.identity();
        let mut inclusive = partials;
        let mut totals = SharedMemory::new(cube.plane_count(), identity);

        cube.for_each_plane(|plane, units| {
            let lanes = &mut inclusive[units.start as usize..units.end as usize];
            self.plane_inclusive_scan(lanes);
            totals[plane as usize] = lanes[lanes.len() - 1];
        });

        let (plane_prefixes, total) =
            self.exclusive_scan_totals(&totals, cube.plane_dim() as usize);

        let plane_dim = cube.plane_dim();
        let mut exclusive = SharedMemory::new(cube.cube_dim(), identity);
        cube.for_each_unit(|unit| {
            let lane_prefix = match unit % plane_dim {
                0 => identity,
                _ => inclusive[unit as usize - 1],
            };
            exclusive[unit as usize] = self
                .monoid
                .combine(plane_prefixes[(unit / plane_dim) as usize], lane_prefix);
        });

        (exclusive, total)
    }

    // Exclusive scan of plane totals, one plane of totals at a time.
    fn exclusive_scan_totals(&self, totals: &[M::Value], plane_dim: usize) -> (Vec<M::Value>, M::Value) {
        let identity = self.monoid.identity();

        let mut inclusive = totals.to_vec();
        for lanes in inclusive.chunks_mut(plane_dim) {
            self.plane_inclusive_scan(lanes);
        }

        let chunk_totals: Vec<M::Value> = inclusive
            .chunks(plane_dim)
            .map(|lanes| lanes[lanes.len() - 1])
            .collect();

        let (chunk_prefixes, total) = match chunk_totals.len() {
            1 => (vec![identity], chunk_totals[0]),
            _ => self.exclusive_scan_totals(&chunk_totals, plane_dim),
        };

        let exclusive = (0..totals.len())
            .map(|index| {
                let lane_prefix = match index % plane_dim {
                    0 => identity,
                    _ => inclusive[index - 1],
                };
                self.monoid
                    .combine(chunk_prefixes[index / plane_dim], lane_prefix)
            })
            .collect();

        (exclusive, total)
    }

    // Kogge-Stone inclusive scan across the lanes of one plane. Every step reads the values of
    // the previous step, like lanes shuffling in lockstep.
    fn plane_inclusive_scan(&self, lanes: &mut [M::Value]) {
        let mut offset = 1;

        while offset < lanes.len() {
            let previous = lanes.to_vec();
            for lane in offset..lanes.len() {
                lanes[lane] = self.monoid.combine(previous[lane - offset], previous[lane]);
            }
            offset *= 2;
        }
    }
}
