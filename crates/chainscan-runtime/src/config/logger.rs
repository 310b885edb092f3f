use super::GlobalConfig;
use crate::config::{dispatch::DispatchLogLevel, profiling::ProfilingLogLevel};
use core::fmt::Display;
use hashbrown::HashMap;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
    sync::Arc,
};

/// Where the messages of one logging channel go, and how verbose they are.
///
/// Every enabled sink receives every message, so a channel can write to a file and to standard
/// error at the same time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct LoggerConfig<L: LogLevel> {
    /// Write messages to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Keep the existing content of `file`. Defaults to true.
    ///
    /// When both channels write to the same file, the first one to open it decides.
    #[serde(default = "append_default")]
    pub append: bool,

    /// Write messages to standard output.
    #[serde(default)]
    pub stdout: bool,

    /// Write messages to standard error.
    #[serde(default)]
    pub stderr: bool,

    /// Forward messages to the `log` facade at this level.
    #[serde(default)]
    pub log: Option<LogCrateLevel>,

    /// Verbosity of the channel.
    #[serde(default)]
    pub level: L,
}

impl<L: LogLevel> Default for LoggerConfig<L> {
    fn default() -> Self {
        Self {
            file: None,
            append: append_default(),
            stdout: false,
            stderr: false,
            log: None,
            level: L::default(),
        }
    }
}

impl<L: LogLevel> LoggerConfig<L> {
    // Every sink this channel writes to.
    fn sinks(&self) -> Vec<SinkId> {
        let mut sinks = Vec::new();

        if let Some(file) = &self.file {
            sinks.push(SinkId::File(file.clone()));
        }
        if self.stdout {
            sinks.push(SinkId::Stdout);
        }
        if self.stderr {
            sinks.push(SinkId::Stderr);
        }
        if let Some(level) = self.log {
            sinks.push(SinkId::LogCrate(level));
        }

        sinks
    }
}

/// Level used when forwarding messages to the `log` facade.
#[derive(
    Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, Hash, PartialEq, Eq,
)]
pub enum LogCrateLevel {
    /// `log::info!`.
    #[default]
    #[serde(rename = "info")]
    Info,

    /// `log::debug!`.
    #[serde(rename = "debug")]
    Debug,

    /// `log::trace!`.
    #[serde(rename = "trace")]
    Trace,
}

fn append_default() -> bool {
    true
}

/// Verbosity levels usable in a [LoggerConfig].
pub trait LogLevel:
    serde::de::DeserializeOwned + serde::Serialize + Clone + Copy + core::fmt::Debug + Default
{
}

/// Writes dispatch and profiling messages to the sinks configured for each channel.
///
/// A sink shared by both channels, like the same file, is opened once.
#[derive(Debug)]
pub struct Logger {
    sinks: Vec<Sink>,
    dispatch: Vec<usize>,
    profiling: Vec<usize>,

    /// The configuration the sinks were opened from.
    pub config: Arc<GlobalConfig>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Open the sinks of the global configuration.
    ///
    /// Opening files makes this expensive, so create one logger per server.
    pub fn new() -> Self {
        Self::from_config(GlobalConfig::get())
    }

    /// Open the sinks of an explicit configuration.
    pub fn from_config(config: Arc<GlobalConfig>) -> Self {
        let mut registry = SinkRegistry::default();

        let dispatch = match config.dispatch.logger.level {
            DispatchLogLevel::Disabled => Vec::new(),
            _ => registry.open(&config.dispatch.logger),
        };
        let profiling = match config.profiling.logger.level {
            ProfilingLogLevel::Disabled => Vec::new(),
            _ => registry.open(&config.profiling.logger),
        };

        Self {
            sinks: registry.sinks,
            dispatch,
            profiling,
            config,
        }
    }

    /// Write a message to every dispatch sink.
    pub fn log_dispatch<S: Display>(&mut self, msg: &S) {
        Self::write(&mut self.sinks, &self.dispatch, msg);
    }

    /// Write a message to every profiling sink.
    pub fn log_profiling<S: Display>(&mut self, msg: &S) {
        Self::write(&mut self.sinks, &self.profiling, msg);
    }

    /// The configured dispatch level.
    pub fn log_level_dispatch(&self) -> DispatchLogLevel {
        self.config.dispatch.logger.level
    }

    /// The configured profiling level.
    pub fn log_level_profiling(&self) -> ProfilingLogLevel {
        self.config.profiling.logger.level
    }

    fn write<S: Display>(sinks: &mut [Sink], channel: &[usize], msg: &S) {
        match channel {
            [] => {}
            [index] => sinks[*index].write(msg),
            indices => {
                // Format once for all sinks.
                let msg = msg.to_string();
                for index in indices {
                    sinks[*index].write(&msg);
                }
            }
        }
    }
}

#[derive(Hash, PartialEq, Eq, Clone, Debug)]
enum SinkId {
    File(PathBuf),
    Stdout,
    Stderr,
    LogCrate(LogCrateLevel),
}

// Opened sinks, deduplicated by id.
#[derive(Default)]
struct SinkRegistry {
    sinks: Vec<Sink>,
    opened: HashMap<SinkId, usize>,
}

impl SinkRegistry {
    // Open the sinks of a channel that aren't open yet, and return the index of every sink of
    // the channel. A file that can't be opened is skipped.
    fn open<L: LogLevel>(&mut self, config: &LoggerConfig<L>) -> Vec<usize> {
        config
            .sinks()
            .into_iter()
            .filter_map(|id| {
                if let Some(index) = self.opened.get(&id) {
                    return Some(*index);
                }

                let sink = match &id {
                    SinkId::File(path) => Sink::File(FileSink::open(path, config.append)?),
                    SinkId::Stdout => Sink::Stdout,
                    SinkId::Stderr => Sink::Stderr,
                    SinkId::LogCrate(level) => Sink::Log(*level),
                };

                let index = self.sinks.len();
                self.sinks.push(sink);
                self.opened.insert(id, index);
                Some(index)
            })
            .collect()
    }
}

#[derive(Debug)]
enum Sink {
    File(FileSink),
    Stdout,
    Stderr,
    Log(LogCrateLevel),
}

impl Sink {
    fn write<S: Display>(&mut self, msg: &S) {
        match self {
            Sink::File(file) => file.write(msg),
            Sink::Stdout => println!("{msg}"),
            Sink::Stderr => eprintln!("{msg}"),
            Sink::Log(LogCrateLevel::Info) => log::info!("{msg}"),
            Sink::Log(LogCrateLevel::Debug) => log::debug!("{msg}"),
            Sink::Log(LogCrateLevel::Trace) => log::trace!("{msg}"),
        }
    }
}

#[derive(Debug)]
struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    fn open(path: &PathBuf, append: bool) -> Option<Self> {
        let file = OpenOptions::new()
            .write(true)
            .append(append)
            .truncate(!append)
            .create(true)
            .open(path);

        match file {
            Ok(file) => Some(Self {
                writer: BufWriter::new(file),
            }),
            Err(err) => {
                log::warn!("Can't open log file {path:?}: {err}");
                None
            }
        }
    }

    // Flushed after every message so nothing is lost on abort.
    fn write<S: Display>(&mut self, msg: &S) {
        let result = writeln!(self.writer, "{msg}").and_then(|_| self.writer.flush());

        if let Err(err) = result {
            log::warn!("Failed to write to the log file: {err}");
        }
    }
}
