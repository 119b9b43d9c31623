// Blusb controller configuration tool - shared library
// Config file handling used by the CLI

pub mod config;

pub use config::{Config, DeviceConfig, MonitorSettings};
