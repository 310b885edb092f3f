#![allow(dead_code)]

use chainscan_cpu::{CpuRuntime, RuntimeOptions};
use chainscan_runtime::{client::ComputeClient, config::dispatch::CubeSchedule};
use chainscan_scan::Monoid;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Composition of affine maps, associative but not commutative.
#[derive(Debug, Clone, Copy)]
pub struct Affine;

impl Monoid for Affine {
    type Value = (i64, i64);

    fn identity(&self) -> (i64, i64) {
        (1, 0)
    }

    fn combine(&self, lhs: (i64, i64), rhs: (i64, i64)) -> (i64, i64) {
        (
            lhs.0.wrapping_mul(rhs.0),
            rhs.0.wrapping_mul(lhs.1).wrapping_add(rhs.1),
        )
    }
}

pub fn affine_values(len: usize, seed: u64) -> Vec<(i64, i64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| (rng.random_range(-3..=3), rng.random_range(-100..100)))
        .collect()
}

pub fn sequential_scan<M: Monoid>(monoid: &M, data: &[M::Value], inclusive: bool) -> Vec<M::Value> {
    let mut acc = monoid.identity();
    data.iter()
        .map(|value| {
            let exclusive = acc;
            acc = monoid.combine(acc, *value);
            if inclusive { acc } else { exclusive }
        })
        .collect()
}

pub fn client(workers: usize, schedule: CubeSchedule) -> ComputeClient<CpuRuntime> {
    CpuRuntime::client_with_options(RuntimeOptions {
        max_workers: workers,
        plane_dim: 8,
        schedule,
    })
}
