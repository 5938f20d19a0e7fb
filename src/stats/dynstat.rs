//! Dynamic statistics buckets (`dyn_stats`).

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One bucket of named counters. The map is ordered so that decoding the
/// same record always yields points in the same order.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct DynStat {
    name: String,
    values: BTreeMap<String, i64>,
}

impl Stat for DynStat {
    const KIND: StatKind = StatKind::DynStat;

    fn into_points(self) -> Vec<Point> {
        let name = format!("dynstat_{}", self.name);
        let description = format!("dynamic statistic bucket {}", self.name);

        self.values
            .into_iter()
            .map(|(counter, value)| {
                Point::counter(name.as_str(), description.as_str(), value)
                    .with_label("counter", counter)
            })
            .collect()
    }
}
