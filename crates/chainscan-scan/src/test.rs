#![allow(missing_docs)]

use chainscan_runtime::{Runtime, client::ComputeClient};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, distr::Uniform, rngs::StdRng};

use crate::{Monoid, ScanMode, ScanSeed, ScanStrategy, numeric::ScanNumeric, scan, scan_seeded};

// All random values generated for tests are integers in 1..20, so float sums of up to a few
// hundred thousand values stay exact and every built-in operator is exactly associative.

// This macro generates all the tests.
#[macro_export]
macro_rules! testgen_scan {
    () => {
        mod test_scan {
            use super::*;

            $crate::testgen_scan!(@group: [ty=[u32, i32, u64, i64], sizes=[0, 1, 10, 100, 256, 1_000, 4097, 100_000]]: [Sum, Prod, Min, Max]);
            $crate::testgen_scan!(@group: [ty=[u32, u64], sizes=[0, 1, 257, 10_000]]: [BitOr, BitXor]);
            $crate::testgen_scan!(@group: [ty=[f32, f64], sizes=[0, 1, 100, 4097, 100_000]]: [Sum, Min, Max]);

            #[test]
            fn scenario_sum_tile_of_two() {
                let client = $crate::test::test_client::<TestRuntime>();
                $crate::test::scenario_sum_tile_of_two::<TestRuntime>(&client);
            }

            #[test]
            fn scenario_max_single_tile() {
                let client = $crate::test::test_client::<TestRuntime>();
                $crate::test::scenario_max_single_tile::<TestRuntime>(&client);
            }

            #[test]
            fn non_commutative_monoid() {
                let client = $crate::test::test_client::<TestRuntime>();
                for len in [1, 31, 64, 1_000, 20_000] {
                    $crate::test::test_non_commutative::<TestRuntime>(&client, len);
                }
            }

            #[test]
            fn splitting_law() {
                let client = $crate::test::test_client::<TestRuntime>();
                for (len, split) in [(100, 0), (100, 37), (4096, 1024), (10_001, 9_999)] {
                    $crate::test::test_splitting_law::<TestRuntime>(&client, len, split);
                }
            }
        }
    };

    (@group: [ty=[$($ty:ident),*], sizes=$sizes:expr]: $instrs:tt) => {
        $(
            $crate::testgen_scan!(@ty: $ty, $sizes, $instrs);
        )*
    };

    (@ty: $ty:ident, $sizes:expr, [$($instr:ident),*]) => {
        $(
            ::paste::paste! {
                #[test]
                fn [<test_ $instr:lower _ $ty>]() {
                    let client = $crate::test::test_client::<TestRuntime>();
                    let monoid = $crate::instructions::$instr::<$ty>::new();

                    for len in $sizes {
                        for mode in [
                            $crate::ScanMode::Exclusive,
                            $crate::ScanMode::Inclusive,
                            $crate::ScanMode::Reduce,
                        ] {
                            for use_planes in [false, true] {
                                let test = $crate::test::TestCase {
                                    len,
                                    mode,
                                    tile_size: 64,
                                    use_planes,
                                };
                                test.test_scan::<TestRuntime, $ty, _>(&client, &monoid);
                            }
                        }
                    }
                }
            }
        )*
    };
}

pub fn test_client<R: Runtime>() -> ComputeClient<R> {
    R::client(&Default::default())
}

pub fn random_values<N: ScanNumeric>(len: usize, seed: u64) -> Vec<N> {
    let distribution = Uniform::<i64>::new(1, 20).unwrap();
    StdRng::seed_from_u64(seed)
        .sample_iter(distribution)
        .take(len)
        .map(N::from_int)
        .collect()
}

/// Sequential left-to-right scan, the ground truth of every test.
pub fn reference_scan<M: Monoid>(monoid: &M, data: &[M::Value], inclusive: bool) -> Vec<M::Value> {
    data.iter()
        .scan(monoid.identity(), |acc, value| {
            let exclusive = *acc;
            *acc = monoid.combine(*acc, *value);
            Some(if inclusive { *acc } else { exclusive })
        })
        .collect()
}

pub fn reference_reduce<M: Monoid>(monoid: &M, data: &[M::Value]) -> M::Value {
    data.iter()
        .fold(monoid.identity(), |acc, value| monoid.combine(acc, *value))
}

#[derive(Debug)]
pub struct TestCase {
    pub len: usize,
    pub mode: ScanMode,
    pub tile_size: u32,
    pub use_planes: bool,
}

impl TestCase {
    pub fn test_scan<R: Runtime, N: ScanNumeric, M: Monoid<Value = N>>(
        &self,
        client: &ComputeClient<R>,
        monoid: &M,
    ) {
        let data = random_values::<N>(self.len, 1234);
        let strategy = ScanStrategy::new(client, self.tile_size, 1).with_planes(self.use_planes);

        let mut output = vec![monoid.identity(); self.mode.output_len(self.len)];
        let report = scan(client, monoid, &data, &mut output, self.mode, Some(strategy))
            .unwrap_or_else(|err| panic!("{self:?} failed: {err}"));

        let total = reference_reduce(monoid, &data);
        assert_eq!(report.total, total, "{self:?}");

        match self.mode {
            ScanMode::Reduce => assert_eq!(output, vec![total], "{self:?}"),
            ScanMode::Exclusive => {
                assert_eq!(output, reference_scan(monoid, &data, false), "{self:?}")
            }
            ScanMode::Inclusive => {
                assert_eq!(output, reference_scan(monoid, &data, true), "{self:?}")
            }
        }
    }
}

pub fn scenario_sum_tile_of_two<R: Runtime>(client: &ComputeClient<R>) {
    let monoid = crate::instructions::Sum::<u32>::new();
    let data: Vec<u32> = (1..=8).collect();
    let strategy = Some(ScanStrategy::new(client, 2, 1));

    let exclusive = crate::exclusive_scan(client, &monoid, &data, strategy).unwrap();
    let inclusive = crate::inclusive_scan(client, &monoid, &data, strategy).unwrap();
    let reduced = crate::reduce(client, &monoid, &data, strategy).unwrap();

    assert_eq!(exclusive, vec![0, 1, 3, 6, 10, 15, 21, 28]);
    assert_eq!(inclusive, vec![1, 3, 6, 10, 15, 21, 28, 36]);
    assert_eq!(reduced, 36);
}

pub fn scenario_max_single_tile<R: Runtime>(client: &ComputeClient<R>) {
    let monoid = crate::instructions::Max::<i32>::new();
    let data = [3, -1, 7, 2];
    let strategy = Some(ScanStrategy::new(client, 4, 1));

    let exclusive = crate::exclusive_scan(client, &monoid, &data, strategy).unwrap();
    let inclusive = crate::inclusive_scan(client, &monoid, &data, strategy).unwrap();
    let mut reduced = [0];
    let report = scan(client, &monoid, &data, &mut reduced, ScanMode::Reduce, strategy).unwrap();

    assert_eq!(exclusive, vec![i32::MIN, 3, 3, 7]);
    assert_eq!(inclusive, vec![3, 3, 7, 7]);
    assert_eq!(reduced, [7]);
    assert_eq!(report.num_tiles, 1);
    assert_eq!(report.lookback.steps, 0);
}

/// Composition of affine maps `x -> a * x + b` with wrapping arithmetic. Associative, not
/// commutative.
#[derive(Debug, Clone, Copy, Default)]
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

pub fn test_non_commutative<R: Runtime>(client: &ComputeClient<R>, len: usize) {
    let data = affine_values(len, 42);

    for use_planes in [false, true] {
        let strategy = ScanStrategy::new(client, 32, 1).with_planes(use_planes);
        let output = crate::inclusive_scan(client, &Affine, &data, Some(strategy)).unwrap();

        assert_eq!(output, reference_scan(&Affine, &data, true), "len {len}");
    }
}

pub fn test_splitting_law<R: Runtime>(client: &ComputeClient<R>, len: usize, split: usize) {
    let monoid = Affine;
    let data = affine_values(len, 7);
    let strategy = Some(ScanStrategy::new(client, 16, 1));

    let mut whole = vec![monoid.identity(); len];
    scan(client, &monoid, &data, &mut whole, ScanMode::Exclusive, strategy).unwrap();

    let (left, right) = data.split_at(split);
    let mut first = vec![monoid.identity(); left.len()];
    let mut second = vec![monoid.identity(); right.len()];
    let head = scan(client, &monoid, left, &mut first, ScanMode::Exclusive, strategy).unwrap();
    let tail = scan_seeded(
        client,
        &monoid,
        right,
        &mut second,
        ScanMode::Exclusive,
        ScanSeed::new(head.total),
        strategy,
    )
    .unwrap();

    first.extend(second);
    assert_eq!(first, whole);
    assert_eq!(tail.total, reference_reduce(&monoid, &data));
}
