use super::{
    dispatch::{CubeSchedule, DispatchConfig, DispatchLogLevel},
    profiling::{ProfilingConfig, ProfilingLogLevel},
};
use std::sync::Arc;

/// Static mutex holding the global configuration, initialized as `None`.
static CHAINSCAN_GLOBAL_CONFIG: spin::Mutex<Option<Arc<GlobalConfig>>> = spin::Mutex::new(None);

/// Represents the global configuration for chainscan, combining dispatch and profiling settings.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalConfig {
    /// Configuration for how dispatches run and are logged.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Configuration for profiling chainscan operations.
    #[serde(default)]
    pub profiling: ProfilingConfig,
}

impl GlobalConfig {
    /// Retrieves the current global configuration, loading it from the current directory if not set.
    ///
    /// If no configuration is set, it attempts to load one from `chainscan.toml` or
    /// `ChainScan.toml` in the current directory or its parents. If no file is found, a default
    /// configuration is used. Environment variables are applied on top in both cases.
    ///
    /// # Notes
    ///
    /// Calling this function is somewhat expensive, because of a global static lock. Read the
    /// values you need once, when a client or server is created.
    pub fn get() -> Arc<Self> {
        let mut state = CHAINSCAN_GLOBAL_CONFIG.lock();

        if let Some(config) = state.as_ref() {
            return config.clone();
        }

        let config = Arc::new(Self::from_current_dir().override_from_env());
        *state = Some(config.clone());
        config
    }

    /// Save the current configuration to the provided file path.
    pub fn save_default<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<()> {
        let config = Self::get();
        let content = toml::to_string_pretty(config.as_ref())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(path, content)
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    ///
    /// # Warning
    /// This method must be called at the start of the program, before any calls to `get`.
    pub fn set(config: Self) {
        let mut state = CHAINSCAN_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Overrides configuration fields based on environment variables.
    pub fn override_from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("CHAINSCAN_DEBUG_LOG") {
            self.dispatch.logger.level = DispatchLogLevel::Full;
            self.profiling.logger.level = ProfilingLogLevel::Medium;

            match val.as_str() {
                "stdout" => {
                    self.dispatch.logger.stdout = true;
                    self.profiling.logger.stdout = true;
                }
                "stderr" => {
                    self.dispatch.logger.stderr = true;
                    self.profiling.logger.stderr = true;
                }
                "1" | "true" => {
                    let file_path = "/tmp/chainscan.log";
                    self.dispatch.logger.file = Some(file_path.into());
                    self.profiling.logger.file = Some(file_path.into());
                }
                "0" | "false" => {
                    self.dispatch.logger.level = DispatchLogLevel::Disabled;
                    self.profiling.logger.level = ProfilingLogLevel::Disabled;
                }
                file_path => {
                    self.dispatch.logger.file = Some(file_path.into());
                    self.profiling.logger.file = Some(file_path.into());
                }
            }
        };

        if let Ok(val) = std::env::var("CHAINSCAN_DEBUG_OPTION") {
            match val.as_str() {
                "debug" => {
                    self.dispatch.logger.level = DispatchLogLevel::Full;
                    self.profiling.logger.level = ProfilingLogLevel::Medium;
                }
                "profile" => {
                    self.profiling.logger.level = ProfilingLogLevel::Basic;
                }
                "profile-full" => {
                    self.profiling.logger.level = ProfilingLogLevel::Full;
                }
                _ => {}
            }
        };

        if let Ok(val) = std::env::var("CHAINSCAN_WORKERS") {
            match val.parse::<usize>() {
                Ok(workers) if workers > 0 => self.dispatch.max_workers = Some(workers),
                _ => log::warn!("Ignoring invalid CHAINSCAN_WORKERS value {val:?}"),
            }
        }

        if let Ok(val) = std::env::var("CHAINSCAN_SCHEDULE") {
            match CubeSchedule::parse(&val) {
                Some(schedule) => self.dispatch.schedule = schedule,
                None => log::warn!("Ignoring invalid CHAINSCAN_SCHEDULE value {val:?}"),
            }
        }

        self
    }

    // Loads configuration from `chainscan.toml` or `ChainScan.toml` in the current directory or
    // its parents.
    //
    // Traverses up the directory tree until a valid configuration file is found or the root is
    // reached. Returns a default configuration if no file is found.
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            if let Ok(content) = Self::from_file_path(dir.join("chainscan.toml")) {
                return content;
            }

            if let Ok(content) = Self::from_file_path(dir.join("ChainScan.toml")) {
                return content;
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    // Loads configuration from a specified file path.
    fn from_file_path<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match toml::from_str(&content) {
            Ok(val) => val,
            Err(err) => panic!("The file provided doesn't have the right format => {err:?}"),
        };

        Ok(config)
    }
}

/// How much of a kernel type name is kept in logs.
#[derive(Clone, Copy, Debug)]
pub enum TypeNameFormatLevel {
    /// The name as given by `type_name`.
    Full,
    /// Only the type itself, without module path or generics.
    Short,
    /// The type and every generic argument, each without its module path.
    Balanced,
}

/// Format a type name given by `core::any::type_name`.
pub fn type_name_format(name: &str, level: TypeNameFormatLevel) -> String {
    match level {
        TypeNameFormatLevel::Full => name.to_string(),
        TypeNameFormatLevel::Short => {
            without_path(name.split('<').next().unwrap_or(name)).to_string()
        }
        TypeNameFormatLevel::Balanced => name
            .split(['<', '>', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(without_path)
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

fn without_path(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}
