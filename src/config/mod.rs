//! Configuration module for idlreport.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, IdlSettings, LoggingSettings, ReportSettings, Settings, SettingsError,
};
