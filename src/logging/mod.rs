//! Logging for SaveBackup
//!
//! Two independent channels, info and error, each gated by its own setting
//! and routed to its own append-only file. Console output is unconditional.
//!
//! # Example
//!
//! ```rust,ignore
//! use save_backup::logging::Logger;
//!
//! let logger = Logger::from_config(config.get());
//! logger.log_info("Saving file /home/u/.SaveBackup/home/u/a-2024-01-05.txt");
//! ```

mod logger;

pub use logger::{diagnostic_trace, Channel, ChannelPolicy, Logger};
