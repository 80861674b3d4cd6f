//! # Block Bridge Configuration
//!
//! This crate provides configuration parsing for a Block Bridge host.
//!
//! All settings are defined in one `blockbridge.toml` file. Every section
//! is optional and falls back to its defaults.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockbridge_config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("blockbridge.toml"))?;
//!
//! println!("Controller: {}", config.controller.describe());
//! println!("Storage port: {:?}", config.port_for("storage"));
//! ```
//!
//! ## Configuration Sections
//!
//! - `[controller]` - Controller program, arguments, frame limit, dry-run mode
//! - `[host]` - Simulated block production (start height, genesis time, interval)
//! - `[transcript]` - Controller call recording
//! - `[logging]` - Logging settings (level, format)
//! - `[[ports]]` - Named port bindings

mod config;
mod error;

pub use config::*;
pub use error::*;
