//! Chart services built on the filtered and binned readings.
//!
//! # Modules
//!
//! - [`scales`]: domain to pixel mapping and chart geometry
//! - [`background`]: target-range background bands
//! - [`slices`]: per-bin CBG slice geometry
//! - [`modal_day`]: the orchestrating pipeline
//! - [`week_view`]: printable week view

pub mod background;
pub mod modal_day;
pub mod scales;
pub mod slices;
pub mod week_view;

pub use background::{background_rects, BandRect, BandZone};
pub use modal_day::{fallback_y_domain, ModalDay, ModalFrame, SmbgPoint};
pub use scales::{ChartLayout, LinearScale, Margins, TimeScale};
pub use slices::{cbg_slices, CbgSlice, Segment};
pub use week_view::{week_view, WeekLayout, WeekPoint, WeekTick, WeekView};
