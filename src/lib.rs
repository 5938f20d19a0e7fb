//! rsyslog impstats Prometheus exporter
//!
//! Reads rsyslog `impstats` records (one JSON payload per line, usually
//! piped through `omprog`), keeps the latest value of every measurement
//! and exposes them for Prometheus to scrape.
//!
//! # Architecture
//!
//! ```text
//! stdin → ingest → stats::classify → stats::decode → model::PointStore
//!                                                          ↓
//!                                   metrics::StoreCollector (on scrape)
//! ```
//!
//! The [`PointStore`] is the only shared state. The ingest loop writes to
//! it from one thread while scrapes read from it concurrently.
//!
//! # Example
//!
//! ```
//! use rsyslog_exporter::{IngestLoop, MetricsRegistry, PointStore};
//! use std::io::Cursor;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let store = Arc::new(PointStore::new());
//! let registry = MetricsRegistry::new(Arc::clone(&store)).unwrap();
//!
//! let input = Cursor::new(
//!     r#"2017-08-30T08:10:04 node rsyslogd-pstats: {"name":"main Q","size":10,"enqueued":20}"#,
//! );
//! IngestLoop::new(input, Arc::clone(&store))
//!     .run(&CancellationToken::new())
//!     .unwrap();
//!
//! let output = registry.encode().unwrap();
//! assert!(output.contains(r#"rsyslog_queue_size{queue="main Q"} 10"#));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod stats;

// Re-export commonly used types at crate root
pub use config::{Cli, ConfigError, ExporterConfig};
pub use ingest::{IngestError, IngestLoop, LineError};
pub use metrics::{MetricsError, MetricsRegistry, StoreCollector};
pub use model::{Point, PointKind, PointStore, StoreError};
pub use stats::{classify, decode, DecodeError, StatKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
