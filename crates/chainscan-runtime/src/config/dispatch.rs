use super::logger::{LogLevel, LoggerConfig};

/// Configuration for how dispatches are executed and logged.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DispatchConfig {
    /// Logger configuration for dispatch logs.
    #[serde(default)]
    pub logger: LoggerConfig<DispatchLogLevel>,
    /// The maximum number of cubes running at the same time.
    ///
    /// Defaults to the available parallelism of the host when not set.
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// The plane width assumed by backends without hardware planes.
    #[serde(default = "default_plane_dim")]
    pub plane_dim: u32,
    /// The order in which cubes are started.
    #[serde(default)]
    pub schedule: CubeSchedule,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            logger: Default::default(),
            max_workers: None,
            plane_dim: default_plane_dim(),
            schedule: Default::default(),
        }
    }
}

fn default_plane_dim() -> u32 {
    32
}

/// Log levels for dispatches in chainscan.
#[derive(
    Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum DispatchLogLevel {
    /// Dispatch logging is disabled.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,

    /// Each dispatch is logged with its geometry.
    #[serde(rename = "basic")]
    Basic,

    /// Each dispatch is logged with its geometry and lookback counters.
    #[serde(rename = "full")]
    Full,
}

impl LogLevel for DispatchLogLevel {}

/// The order in which the cubes of a dispatch are handed to workers.
///
/// Hardware gives no ordering guarantee between cubes, so every schedule must produce the same
/// result. `Descending` with a single worker starts every cube before any of its predecessors.
#[derive(Default, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CubeSchedule {
    /// Cubes start in increasing position.
    #[default]
    #[serde(rename = "ascending")]
    Ascending,
    /// Cubes start in decreasing position.
    #[serde(rename = "descending")]
    Descending,
    /// Cubes start in a random order drawn from `seed`.
    #[serde(rename = "shuffled")]
    Shuffled {
        /// Seed of the permutation.
        seed: u64,
    },
    /// Cubes listed first start first, the remaining ones follow in increasing position.
    #[serde(rename = "custom")]
    Custom(Vec<u32>),
}

impl CubeSchedule {
    /// Parse the compact form used by the `CHAINSCAN_SCHEDULE` environment variable:
    /// `ascending`, `descending` or `shuffled:<seed>`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ascending" => Some(Self::Ascending),
            "descending" => Some(Self::Descending),
            other => {
                let seed = other.strip_prefix("shuffled:")?;
                seed.parse().ok().map(|seed| Self::Shuffled { seed })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_schedule() {
        assert_eq!(CubeSchedule::parse("descending"), Some(CubeSchedule::Descending));
        assert_eq!(
            CubeSchedule::parse("shuffled:42"),
            Some(CubeSchedule::Shuffled { seed: 42 })
        );
        assert_eq!(CubeSchedule::parse("shuffled:x"), None);
        assert_eq!(CubeSchedule::parse("random"), None);
    }
}
