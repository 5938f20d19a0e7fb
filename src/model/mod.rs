//! Measurement data model.
//!
//! A [`Point`] is one named, typed, optionally labeled value. The
//! [`PointStore`] keeps the latest point per key and is the only state
//! shared between the ingest path and the scrape path.

mod point;
mod store;

pub use point::{Point, PointKind};
pub use store::{PointStore, StoreError};
