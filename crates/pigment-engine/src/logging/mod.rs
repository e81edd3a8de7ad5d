//! Logger setup for binaries embedding the engine.
//!
//! The engine itself only talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
