#![allow(missing_docs)]

use chainscan_runtime::{Runtime, client::ComputeClient};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    RadixKey, SortStrategy,
    digits::{NUM_PASSES, RADIX, digit},
    digit_histogram, radix_sort_keys, radix_sort_pairs,
};

#[macro_export]
macro_rules! testgen_sort {
    () => {
        mod test_sort {
            use super::*;

            $crate::testgen_sort!(@keys: [u32, i32, f32], [0, 1, 100, 4097, 30_000]);

            #[test]
            fn sort_pairs_is_stable() {
                let client = $crate::test::test_client::<TestRuntime>();
                for len in [1, 255, 3000] {
                    $crate::test::test_sort_pairs_stable::<TestRuntime>(&client, len);
                }
            }

            #[test]
            fn digit_histogram_counts_every_key() {
                let client = $crate::test::test_client::<TestRuntime>();
                for len in [0, 77, 5000] {
                    $crate::test::test_digit_histogram::<TestRuntime>(&client, len);
                }
            }
        }
    };

    (@keys: [$($ty:ident),*], $sizes:expr) => {
        $(
            ::paste::paste! {
                #[test]
                fn [<test_sort_keys_ $ty>]() {
                    let client = $crate::test::test_client::<TestRuntime>();

                    for len in $sizes {
                        for use_planes in [false, true] {
                            $crate::test::test_sort_keys::<TestRuntime, $ty>(&client, len, use_planes);
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

/// Keys drawn from every radix word, so floats include infinities and NaNs.
pub fn random_keys<K: RadixKey>(len: usize, seed: u64) -> Vec<K> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| K::from_radix(rng.random())).collect()
}

fn radix_words<K: RadixKey>(keys: &[K]) -> Vec<u32> {
    keys.iter().map(|key| key.to_radix()).collect()
}

pub fn test_sort_keys<R: Runtime, K: RadixKey>(client: &ComputeClient<R>, len: usize, use_planes: bool) {
    let mut keys = random_keys::<K>(len, 1234);
    let mut expected = radix_words(&keys);
    expected.sort_unstable();

    let strategy = SortStrategy::new(client, 256, 4).with_planes(use_planes);
    let report = radix_sort_keys(client, &mut keys, Some(strategy)).unwrap();

    assert_eq!(radix_words(&keys), expected, "len {len}, planes {use_planes}");
    assert_eq!(report.num_tiles as usize, len.div_ceil(256));
}

pub fn test_sort_pairs_stable<R: Runtime>(client: &ComputeClient<R>, len: usize) {
    // Few distinct keys so that most keys have equal twins.
    let mut rng = StdRng::seed_from_u64(99);
    let mut keys: Vec<u32> = (0..len).map(|_| rng.random_range(0..16u32) << 20).collect();
    let mut values: Vec<u32> = (0..len as u32).collect();

    let mut expected: Vec<(u32, u32)> = keys.iter().copied().zip(values.iter().copied()).collect();
    expected.sort_by_key(|(key, _)| *key);

    let strategy = SortStrategy::new(client, 64, 2);
    radix_sort_pairs(client, &mut keys, &mut values, Some(strategy)).unwrap();

    let actual: Vec<(u32, u32)> = keys.into_iter().zip(values).collect();
    assert_eq!(actual, expected, "len {len}");
}

pub fn test_digit_histogram<R: Runtime>(client: &ComputeClient<R>, len: usize) {
    let keys = random_keys::<u32>(len, 5);
    let strategy = SortStrategy::new(client, 128, 8);

    let histograms = digit_histogram(client, &keys, Some(strategy)).unwrap();

    let mut expected = [[0u32; RADIX]; NUM_PASSES];
    for key in &keys {
        for (pass, counts) in expected.iter_mut().enumerate() {
            counts[digit(*key, pass)] += 1;
        }
    }

    for pass in 0..NUM_PASSES {
        assert_eq!(histograms[pass].to_vec(), expected[pass].to_vec(), "pass {pass}");
    }
}
