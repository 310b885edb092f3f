use core::fmt::Display;
use core::time::Duration;
use std::sync::Arc;

use crate::config::{
    GlobalConfig, Logger, dispatch::DispatchLogLevel, profiling::ProfilingLogLevel,
};

use super::{ProfileLevel, Profiled};

/// Server logger.
#[derive(Debug, Default)]
pub struct ServerLogger {
    kind: DebugLoggerKind,
    profiled: Profiled,
}

/// The various logging options available.
#[derive(Debug)]
enum ServerLoggerOptions {
    /// Log each dispatch.
    DispatchOnly(DispatchLogLevel),
    /// Profile each dispatch.
    ProfileOnly(ProfileLevel),
    /// Enable all options.
    All(DispatchLogLevel, ProfileLevel),
}

/// Debugging logger.
#[derive(Debug)]
enum DebugLoggerKind {
    /// Activated logger.
    Activated(Logger, ServerLoggerOptions),
    /// Don't log information.
    None,
}

impl Default for DebugLoggerKind {
    fn default() -> Self {
        Self::new(GlobalConfig::get())
    }
}

impl ServerLogger {
    /// Create a server logger from an explicit configuration instead of the global one.
    pub fn from_config(config: Arc<GlobalConfig>) -> Self {
        Self {
            kind: DebugLoggerKind::new(config),
            profiled: Profiled::default(),
        }
    }

    /// Returns the profile level, none if profiling is deactivated.
    pub fn profile_level(&self) -> Option<ProfileLevel> {
        match &self.kind {
            DebugLoggerKind::Activated(_, options) => match options {
                ServerLoggerOptions::ProfileOnly(level) => Some(*level),
                ServerLoggerOptions::All(_, level) => Some(*level),
                ServerLoggerOptions::DispatchOnly(_) => None,
            },
            DebugLoggerKind::None => None,
        }
    }

    /// Returns the dispatch level, none if dispatch logging is deactivated.
    pub fn dispatch_level(&self) -> Option<DispatchLogLevel> {
        match &self.kind {
            DebugLoggerKind::Activated(_, options) => match options {
                ServerLoggerOptions::DispatchOnly(level) => Some(*level),
                ServerLoggerOptions::All(level, _) => Some(*level),
                ServerLoggerOptions::ProfileOnly(_) => None,
            },
            DebugLoggerKind::None => None,
        }
    }

    /// Register a profiled dispatch.
    pub fn register_profiled<Name>(&mut self, name: Name, duration: Duration)
    where
        Name: Display,
    {
        let name = name.to_string();
        self.profiled.update(&name, duration);

        match self.profile_level().unwrap_or(ProfileLevel::Basic) {
            ProfileLevel::Basic => {}
            _ => {
                if let DebugLoggerKind::Activated(logger, _) = &mut self.kind {
                    logger.log_profiling(&format!("| {duration:<10?} | {name}"));
                }
            }
        }
    }

    /// Log the argument when dispatch logging is activated at `level` or above.
    pub fn log_dispatch<I>(&mut self, level: DispatchLogLevel, arg: I) -> I
    where
        I: Display,
    {
        let enabled = self
            .dispatch_level()
            .map(|current| current >= level)
            .unwrap_or(false);

        if enabled {
            if let DebugLoggerKind::Activated(logger, _) = &mut self.kind {
                logger.log_dispatch(&arg);
            }
        }

        arg
    }

    /// Show the profiling summary if activated and reset its state.
    pub fn profile_summary(&mut self) {
        if self.profile_level().is_some() {
            let profiled = core::mem::take(&mut self.profiled);

            if let DebugLoggerKind::Activated(logger, _) = &mut self.kind {
                if !profiled.is_empty() {
                    logger.log_profiling(&profiled);
                }
            }
        }
    }

    /// Durations accumulated since the last summary.
    pub fn profiled(&self) -> &Profiled {
        &self.profiled
    }
}

impl DebugLoggerKind {
    fn new(config: Arc<GlobalConfig>) -> Self {
        let logger = Logger::from_config(config);

        let profile = match logger.log_level_profiling() {
            ProfilingLogLevel::Disabled => None,
            ProfilingLogLevel::Basic => Some(ProfileLevel::Basic),
            ProfilingLogLevel::Medium => Some(ProfileLevel::Medium),
            ProfilingLogLevel::Full => Some(ProfileLevel::Full),
        };
        let dispatch = match logger.log_level_dispatch() {
            DispatchLogLevel::Disabled => None,
            level => Some(level),
        };

        let option = match (dispatch, profile) {
            (None, None) => return Self::None,
            (Some(dispatch), None) => ServerLoggerOptions::DispatchOnly(dispatch),
            (None, Some(profile)) => ServerLoggerOptions::ProfileOnly(profile),
            (Some(dispatch), Some(profile)) => ServerLoggerOptions::All(dispatch, profile),
        };

        Self::Activated(logger, option)
    }
}
