use std::sync::atomic::{AtomicUsize, Ordering};

use chainscan_runtime::{
    config::dispatch::CubeSchedule,
    cube::{CubeContext, CubeCount, CubeDim},
    kernel::CubeKernel,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Hands the cubes of a dispatch to a fixed number of worker threads.
///
/// Workers pull the next cube from a shared cursor over the order given by the
/// [schedule](CubeSchedule). A worker runs its cube to completion before pulling another one,
/// so with a single worker a cube never overlaps with any other cube.
#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    plane_dim: u32,
    schedule: CubeSchedule,
}

impl Scheduler {
    /// Create a scheduler running at most `workers` cubes at the same time.
    pub fn new(workers: usize, plane_dim: u32, schedule: CubeSchedule) -> Self {
        Self {
            workers: workers.max(1),
            plane_dim: plane_dim.max(1),
            schedule,
        }
    }

    /// The number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The plane width given to every cube.
    pub fn plane_dim(&self) -> u32 {
        self.plane_dim
    }

    /// The order in which the cubes of a dispatch of `num_cubes` are started.
    pub fn cube_order(&self, num_cubes: u32) -> Vec<u32> {
        match &self.schedule {
            CubeSchedule::Ascending => (0..num_cubes).collect(),
            CubeSchedule::Descending => (0..num_cubes).rev().collect(),
            CubeSchedule::Shuffled { seed } => {
                let mut order: Vec<u32> = (0..num_cubes).collect();
                order.shuffle(&mut StdRng::seed_from_u64(*seed));
                order
            }
            CubeSchedule::Custom(first) => {
                let mut started = vec![false; num_cubes as usize];
                let mut order = Vec::with_capacity(num_cubes as usize);

                for &pos in first.iter().filter(|pos| **pos < num_cubes) {
                    if !started[pos as usize] {
                        started[pos as usize] = true;
                        order.push(pos);
                    }
                }
                order.extend((0..num_cubes).filter(|pos| !started[*pos as usize]));
                order
            }
        }
    }

    /// Execute every cube of the dispatch and return once all of them are done.
    pub fn dispatch_execute(&self, kernel: &dyn CubeKernel, count: CubeCount, dim: CubeDim) {
        let num_cubes = count.num_cubes() as u32;
        if num_cubes == 0 {
            return;
        }

        let order = self.cube_order(num_cubes);
        let cursor = AtomicUsize::new(0);
        let num_workers = usize::min(self.workers, order.len());

        let work = |worker_id: usize| {
            log::trace!("Worker {worker_id} started on {}", kernel.name());
            let mut executed = 0usize;

            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(&cube_pos) = order.get(index) else {
                    break;
                };

                kernel.execute(&CubeContext::new(cube_pos, num_cubes, dim, self.plane_dim));
                executed += 1;
            }

            log::trace!("Worker {worker_id} stopped after {executed} cubes");
        };

        if num_workers == 1 {
            work(0);
            return;
        }

        std::thread::scope(|scope| {
            for worker_id in 0..num_workers {
                let work = &work;
                scope.spawn(move || work(worker_id));
            }
        });
    }
}
