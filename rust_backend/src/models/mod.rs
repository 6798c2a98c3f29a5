//! Preferences and their configuration file.

pub mod config;
pub mod prefs;


pub use config::{ModalConfig, CONFIG_ENV_VAR};
pub use prefs::{
    ActiveDomain, BgClass, BgClasses, BgPrefs, ChartPrefs, ExtentPolicy, TimePrefs,
};
