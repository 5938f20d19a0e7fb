//! omfile dynafile cache statistics.

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

const NAME_PREFIX: &str = "dynafile cache ";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct DynafileCache {
    name: String,
    requests: i64,
    level0: i64,
    missed: i64,
    evicted: i64,
    #[serde(rename = "maxused")]
    max_used: i64,
    #[serde(rename = "closetimeouts")]
    close_timeouts: i64,
}

impl DynafileCache {
    /// Cache name without the `dynafile cache ` prefix rsyslog adds.
    fn cache_name(&self) -> &str {
        self.name.strip_prefix(NAME_PREFIX).unwrap_or(&self.name)
    }
}

impl Stat for DynafileCache {
    const KIND: StatKind = StatKind::DynafileCache;

    fn into_points(self) -> Vec<Point> {
        let cache = self.cache_name();
        let point = |name: &str, description: &str, value: i64| {
            Point::counter(name, description, value).with_label("cache", cache)
        };

        vec![
            point(
                "dynafile_cache_requests",
                "number of requests made to obtain a dynafile",
                self.requests,
            ),
            point(
                "dynafile_cache_level0",
                "number of requests for the current active file",
                self.level0,
            ),
            point("dynafile_cache_missed", "number of cache misses", self.missed),
            point(
                "dynafile_cache_evicted",
                "number of times a file needed to be evicted from cache",
                self.evicted,
            ),
            point(
                "dynafile_cache_maxused",
                "maximum number of cache entries ever used",
                self.max_used,
            ),
            point(
                "dynafile_cache_closetimeouts",
                "number of times a file was closed due to timeout settings",
                self.close_timeouts,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{classify, decode};

    const DYNAFILE_CACHE_LOG: &[u8] = br#"{ "name": "dynafile cache cluster", "origin": "omfile", "requests": 1783254, "level0": 1470906, "missed": 2625, "evicted": 2525, "maxused": 100, "closetimeouts": 10 }"#;

    #[test]
    fn test_dynafile_cache_to_points() {
        assert_eq!(classify(DYNAFILE_CACHE_LOG), StatKind::DynafileCache);

        let points = decode(StatKind::DynafileCache, DYNAFILE_CACHE_LOG)
            .unwrap()
            .unwrap();
        let want = [
            ("dynafile_cache_requests", 1783254),
            ("dynafile_cache_level0", 1470906),
            ("dynafile_cache_missed", 2625),
            ("dynafile_cache_evicted", 2525),
            ("dynafile_cache_maxused", 100),
            ("dynafile_cache_closetimeouts", 10),
        ];

        assert_eq!(points.len(), want.len());
        for (p, (name, value)) in points.iter().zip(want) {
            assert_eq!(p.name, name);
            assert_eq!(p.value, value);
            assert_eq!(p.label(), Some(("cache", "cluster")));
        }
    }

    #[test]
    fn test_name_without_prefix_kept() {
        let stat: DynafileCache = serde_json::from_slice(br#"{"name":"custom"}"#).unwrap();
        assert_eq!(stat.cache_name(), "custom");
    }
}
