//! Parsers for device data exports.
//!
//! # Parsers
//!
//! - [`json_parser`]: Parse JSON arrays of CBG and SMBG records
//!
//! # Example
//!
//! ```no_run
//! use modal_day::core::GlucoseUnits;
//! use modal_day::parsing::json_parser::parse_readings_json;
//! use std::path::Path;
//!
//! let data = parse_readings_json(Path::new("device_data.json"), GlucoseUnits::MgDl, chrono_tz::Tz::UTC)
//!     .expect("Failed to parse device data");
//! println!("{} readings", data.len());
//! ```

pub mod json_parser;

#[cfg(test)]
mod json_parser_tests;

pub use json_parser::{parse_readings_json, parse_readings_json_str, IngestedData};
