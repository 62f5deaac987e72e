//! # DEX Configuration
//!
//! Runtime parameters of the DEX executor and the logging bootstrap shared by
//! every binary that embeds it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dex_config::{init_logging, DexConfig};
//!
//! let config = DexConfig::load(Some("config/dex.toml".as_ref())).unwrap();
//! init_logging(&config.logging);
//! ```

pub mod dex_config;
pub mod logging;

pub use dex_config::{load_config, DexConfig};
pub use logging::{init_logging, LoggingConfig};
