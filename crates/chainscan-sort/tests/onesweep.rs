use chainscan_cpu::{CpuRuntime, RuntimeOptions};
use chainscan_runtime::{client::ComputeClient, config::dispatch::CubeSchedule};
use chainscan_sort::{
    RadixKey, SortSetupError, SortStrategy, digit_histogram, radix_sort_keys, radix_sort_pairs,
};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn client(workers: usize, schedule: CubeSchedule) -> ComputeClient<CpuRuntime> {
    CpuRuntime::client_with_options(RuntimeOptions {
        max_workers: workers,
        plane_dim: 8,
        schedule,
    })
}

fn random_words(len: usize, seed: u64, max: u32) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(0..=max)).collect()
}

fn sorted<K: RadixKey>(keys: &[K]) -> Vec<u32> {
    let mut words: Vec<u32> = keys.iter().map(|key| key.to_radix()).collect();
    words.sort_unstable();
    words
}

#[test_log::test]
fn descending_on_one_worker_recounts_every_predecessor() {
    // 32 tiles, each one starting before all of its predecessors.
    let client = client(1, CubeSchedule::Descending);
    let mut keys = random_words(2048, 11, u32::MAX);
    let expected = sorted(&keys);
    let strategy = SortStrategy::new(&client, 64, 2);

    let report = radix_sort_keys(&client, &mut keys, Some(strategy)).unwrap();

    assert_eq!(keys, expected);
    assert_eq!(report.num_tiles, 32);
    assert_eq!(report.lookback.fallbacks, report.passes_run as u64 * 32 * 31 / 2);
}

#[test_log::test]
fn pairs_match_under_every_schedule() {
    let keys = random_words(5000, 3, 1000);
    let values: Vec<usize> = (0..keys.len()).collect();

    let mut expected: Vec<(u32, usize)> = keys.iter().copied().zip(values.iter().copied()).collect();
    expected.sort_by_key(|(key, _)| *key);

    let schedules = [
        (1, CubeSchedule::Ascending),
        (3, CubeSchedule::Descending),
        (8, CubeSchedule::Shuffled { seed: 5 }),
        (2, CubeSchedule::Custom(vec![40, 7, 0])),
    ];

    for (workers, schedule) in schedules {
        let client = client(workers, schedule.clone());
        let strategy = SortStrategy::new(&client, 128, 4).with_spin_budget(2);
        let (mut keys, mut values) = (keys.clone(), values.clone());

        radix_sort_pairs(&client, &mut keys, &mut values, Some(strategy)).unwrap();

        let actual: Vec<(u32, usize)> = keys.into_iter().zip(values).collect();
        assert_eq!(actual, expected, "{workers} workers, {schedule:?}");
    }
}

#[test_log::test]
fn passes_with_a_single_digit_are_skipped() {
    let client = client(4, CubeSchedule::Ascending);
    let strategy = Some(SortStrategy::new(&client, 256, 8));

    let mut small = random_words(1000, 8, 255);
    let expected = sorted(&small);
    let report = radix_sort_keys(&client, &mut small, strategy).unwrap();
    assert_eq!(small, expected);
    assert_eq!(report.passes_run, 1);

    let mut constant = vec![0xdead_beef_u32; 700];
    let report = radix_sort_keys(&client, &mut constant, strategy).unwrap();
    assert_eq!(constant, vec![0xdead_beef_u32; 700]);
    assert_eq!(report.passes_run, 0);
}

#[test_log::test]
fn signed_and_float_keys() {
    let client = client(2, CubeSchedule::Descending);
    let strategy = Some(SortStrategy::new(&client, 4, 1));

    let mut ints = [5, i32::MIN, -1, 0, i32::MAX, -300, 7];
    radix_sort_keys(&client, &mut ints, strategy).unwrap();
    assert_eq!(ints, [i32::MIN, -300, -1, 0, 5, 7, i32::MAX]);

    let mut floats = [3.5f32, -0.0, -7.25, f32::INFINITY, 0.0, f32::NEG_INFINITY, 1e-3];
    radix_sort_keys(&client, &mut floats, strategy).unwrap();
    let bits: Vec<u32> = floats.iter().map(|float| float.to_bits()).collect();
    let expected: Vec<u32> = [f32::NEG_INFINITY, -7.25, -0.0, 0.0, 1e-3, 3.5, f32::INFINITY]
        .iter()
        .map(|float| float.to_bits())
        .collect();
    assert_eq!(bits, expected);
}

#[test_log::test]
fn empty_input_is_a_no_op() {
    let client = client(2, CubeSchedule::Ascending);
    let mut keys: Vec<u32> = Vec::new();
    let mut values: Vec<u8> = Vec::new();

    let report = radix_sort_pairs(&client, &mut keys, &mut values, None).unwrap();

    assert_eq!(report.passes_run, 0);
    assert_eq!(report.num_tiles, 0);
    assert_eq!(digit_histogram(&client, &keys, None).unwrap(), [[0; 256]; 4]);
}

#[test]
fn invalid_setups_are_rejected() {
    let client = client(1, CubeSchedule::Ascending);
    let mut keys = vec![3u32, 1, 2];

    let strategy = SortStrategy::new(&client, 100, 3);
    assert_eq!(
        radix_sort_keys(&client, &mut keys, Some(strategy)),
        Err(SortSetupError::InvalidStrategy {
            tile_size: 100,
            keys_per_unit: 3,
        })
    );

    let strategy = SortStrategy::new(&client, 64, 0);
    assert!(matches!(
        radix_sort_keys(&client, &mut keys, Some(strategy)),
        Err(SortSetupError::InvalidStrategy { .. })
    ));

    let strategy = SortStrategy::new(&client, 2048, 1);
    assert_eq!(
        radix_sort_keys(&client, &mut keys, Some(strategy)),
        Err(SortSetupError::TooManyUnits {
            units: 2048,
            max: 1024,
        })
    );

    let mut values = vec![0u8; 2];
    assert_eq!(
        radix_sort_pairs(&client, &mut keys, &mut values, None),
        Err(SortSetupError::LengthMismatch { keys: 3, values: 2 })
    );
    assert_eq!(keys, vec![3, 1, 2]);
}
