#![warn(missing_docs)]

//! Chainscan runtime crate: the dispatch model every backend implements, plus the global
//! configuration and logging shared by the primitives built on top of it.

#[macro_use]
extern crate derive_new;

/// Compute client module.
pub mod client;
/// Configuration module.
pub mod config;
/// Workgroup execution context.
pub mod cube;
/// Kernel definition module.
pub mod kernel;
/// Logging utilities.
pub mod logging;
/// Disjoint output partitions.
pub mod partition;
/// Compute server module.
pub mod server;

mod properties;
mod runtime;

pub use properties::*;
pub use runtime::*;
