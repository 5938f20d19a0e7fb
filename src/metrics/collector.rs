//! Prometheus collector backed by the point store.

use crate::model::{Point, PointKind, PointStore};
use prometheus::core::{Collector, Desc};
use prometheus::proto::{self, LabelPair, Metric, MetricFamily, MetricType};
use prometheus::{IntCounter, Opts};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::MetricsError;

/// Prefix of every exported metric name.
pub const NAMESPACE: &str = "rsyslog";

/// Exposes the contents of a [`PointStore`] on every scrape.
///
/// The set of series is not known up front: it grows as impstats records
/// of new kinds arrive. [`Collector::desc`] therefore only reports the
/// scrape counter, and the registry treats point series as unchecked.
pub struct StoreCollector {
    store: Arc<PointStore>,
    scrapes: IntCounter,
}

impl StoreCollector {
    /// Creates a collector reading from `store`.
    pub fn new(store: Arc<PointStore>) -> Result<Self, MetricsError> {
        let scrapes = IntCounter::with_opts(
            Opts::new("scrapes", "times exporter has been scraped").namespace(NAMESPACE),
        )?;
        Ok(Self { store, scrapes })
    }

    /// Descriptors of the scrape counter and of every point currently known.
    ///
    /// Only complete once every record kind the deployment produces has
    /// been seen at least once.
    pub fn describe(&self) -> Vec<Desc> {
        let mut descs: Vec<Desc> = self.scrapes.desc().into_iter().cloned().collect();
        for key in self.store.keys() {
            let Ok(point) = self.store.get(&key) else {
                continue;
            };
            match point_desc(&point) {
                Ok(desc) => descs.push(desc),
                Err(e) => tracing::debug!(key = %key, error = %e, "Skipping invalid descriptor"),
            }
        }
        descs
    }

    /// Number of scrapes served so far.
    pub fn scrapes(&self) -> u64 {
        self.scrapes.get()
    }

    fn point_families(&self) -> Vec<MetricFamily> {
        let mut families: BTreeMap<String, MetricFamily> = BTreeMap::new();

        for key in self.store.keys() {
            // Deleted since the key snapshot was taken.
            let Ok(point) = self.store.get(&key) else {
                continue;
            };
            let desc = match point_desc(&point) {
                Ok(desc) => desc,
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "Skipping point with invalid descriptor");
                    continue;
                }
            };

            families
                .entry(desc.fq_name.clone())
                .or_insert_with(|| new_family(&desc, point.kind))
                .mut_metric()
                .push(point_metric(&point));
        }

        families.into_values().collect()
    }
}

impl Collector for StoreCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.scrapes.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.scrapes.inc();
        let mut families = self.scrapes.collect();
        families.extend(self.point_families());
        families
    }
}

fn point_desc(point: &Point) -> prometheus::Result<Desc> {
    let variable_labels = point
        .label()
        .map(|(name, _)| vec![name.to_owned()])
        .unwrap_or_default();
    Desc::new(
        format!("{NAMESPACE}_{}", point.name),
        point.description.clone(),
        variable_labels,
        HashMap::new(),
    )
}

fn new_family(desc: &Desc, kind: PointKind) -> MetricFamily {
    let mut family = MetricFamily::default();
    family.set_name(desc.fq_name.clone());
    family.set_help(desc.help.clone());
    family.set_field_type(match kind {
        PointKind::Counter => MetricType::COUNTER,
        PointKind::Gauge => MetricType::GAUGE,
    });
    family
}

fn point_metric(point: &Point) -> Metric {
    let mut metric = Metric::default();

    if let Some((name, value)) = point.label() {
        let mut pair = LabelPair::default();
        pair.set_name(name.to_owned());
        pair.set_value(value.to_owned());
        metric.mut_label().push(pair);
    }

    let value = point.value as f64;
    match point.kind {
        PointKind::Counter => {
            let mut counter = proto::Counter::default();
            counter.set_value(value);
            metric.set_counter(counter);
        }
        PointKind::Gauge => {
            let mut gauge = proto::Gauge::default();
            gauge.set_value(value);
            metric.set_gauge(gauge);
        }
    }

    metric
}
