//! # Modal Day
//!
//! Aggregation engine behind the modal-day ("trends") glucose chart.
//!
//! Weeks of continuous (CBG) and finger-stick (SMBG) readings are folded onto
//! a single 24-hour clock: readings are filtered by date window and day of
//! week, grouped into fixed-width time-of-day bins, reduced to order
//! statistics and mapped onto chart pixels.
//!
//! ## Features
//!
//! - **Ingestion**: Parse device exports from JSON, converting glucose units
//! - **Filtering**: Independent date-range and day-of-week predicates over both streams
//! - **Binning**: Time-of-day bins with min, max, median and quantile summaries
//! - **Scales**: Domain to pixel mapping, background bands and slice geometry
//! - **Configuration**: Statically typed preferences loaded from TOML
//!
//! ## Architecture
//!
//! - [`core`]: Domain types (readings, day predicates, date windows)
//! - [`time`]: Timezone resolution and local-day arithmetic
//! - [`parsing`]: Device data ingestion
//! - [`algorithms`]: Quantiles and binning
//! - [`transformations`]: Reading indexes and the activity filter
//! - [`services`]: Scales, chart geometry and the [`ModalDay`] pipeline
//! - [`models`]: Preferences and configuration
//! - [`error`]: Error types
//!
//! The pipeline is synchronous: filters are fully applied before binning,
//! and binning completes before scale mapping. Downstream stages only ever
//! see immutable snapshots.

// Errors carry a structured context for the rendering layer
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod core;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;
pub mod time;
pub mod transformations;

pub use error::{ErrorContext, ModalError, ModalResult};
pub use models::ModalConfig;
pub use services::{ModalDay, ModalFrame};
