use chainscan_runtime::config::{GlobalConfig, dispatch::CubeSchedule};
use serial_test::serial;

fn with_env<F: FnOnce()>(vars: &[(&str, &str)], func: F) {
    for (key, value) in vars {
        // SAFETY: every test touching the environment is serialized.
        unsafe { std::env::set_var(key, value) };
    }
    func();
    for (key, _) in vars {
        // SAFETY: every test touching the environment is serialized.
        unsafe { std::env::remove_var(key) };
    }
}

#[test_log::test]
#[serial]
fn env_overrides_dispatch_options() {
    with_env(
        &[("CHAINSCAN_WORKERS", "3"), ("CHAINSCAN_SCHEDULE", "shuffled:9")],
        || {
            let config = GlobalConfig::default().override_from_env();

            assert_eq!(config.dispatch.max_workers, Some(3));
            assert_eq!(config.dispatch.schedule, CubeSchedule::Shuffled { seed: 9 });
        },
    );
}

#[test_log::test]
#[serial]
fn invalid_env_values_are_ignored() {
    with_env(
        &[("CHAINSCAN_WORKERS", "0"), ("CHAINSCAN_SCHEDULE", "sideways")],
        || {
            let config = GlobalConfig::default().override_from_env();

            assert_eq!(config.dispatch.max_workers, None);
            assert_eq!(config.dispatch.schedule, CubeSchedule::Ascending);
        },
    );
}
