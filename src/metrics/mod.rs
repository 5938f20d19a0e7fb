//! Prometheus exposition of the point store.
//!
//! Every stored point becomes one series named `rsyslog_<point name>`,
//! with its single label when present. The exporter also reports:
//!
//! - `rsyslog_scrapes` - times the exporter has been scraped
//! - `rsyslog_stats_line_errors` - impstats lines that could not be handled
//! - `process_*` - process metrics (Linux only)
//!
//! # Example
//!
//! ```
//! use rsyslog_exporter::metrics::MetricsRegistry;
//! use rsyslog_exporter::model::{Point, PointStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(PointStore::new());
//! let registry = MetricsRegistry::new(Arc::clone(&store)).expect("Failed to create registry");
//!
//! store
//!     .set(Point::counter("input_submitted", "messages submitted", 1000).with_label("input", "imtcp"))
//!     .unwrap();
//!
//! let output = registry.encode().unwrap();
//! assert!(output.contains(r#"rsyslog_input_submitted{input="imtcp"} 1000"#));
//! ```

mod collector;
mod registry;
#[cfg(feature = "server")]
mod server;

pub use collector::{StoreCollector, NAMESPACE};
pub use registry::MetricsRegistry;
#[cfg(feature = "server")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};

use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}
