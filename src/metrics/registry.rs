//! Metrics registry exposed on the telemetry endpoint.

use super::{MetricsError, StoreCollector};
use crate::model::PointStore;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

/// Prometheus registry holding the store collector and process metrics.
pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    /// Creates a registry exporting the points of `store`.
    pub fn new(store: Arc<PointStore>) -> Result<Self, MetricsError> {
        let registry = Registry::new();
        registry.register(Box::new(StoreCollector::new(store)?))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self { registry })
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
