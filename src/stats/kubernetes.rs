//! mmkubernetes metadata lookup counters.

use super::{Stat, StatKind};
use crate::model::Point;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Captures the API server URL from names like `mmkubernetes(https://host:6443)`.
static API_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"mmkubernetes\((\S+)\)").expect("static regex is valid"));

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Kubernetes {
    name: String,
    #[serde(rename = "recordseen")]
    record_seen: i64,
    #[serde(rename = "namespacemetadatasuccess")]
    namespace_success: i64,
    #[serde(rename = "namespacemetadatanotfound")]
    namespace_not_found: i64,
    #[serde(rename = "namespacemetadatabusy")]
    namespace_busy: i64,
    #[serde(rename = "namespacemetadataerror")]
    namespace_error: i64,
    #[serde(rename = "podmetadatasuccess")]
    pod_success: i64,
    #[serde(rename = "podmetadatanotfound")]
    pod_not_found: i64,
    #[serde(rename = "podmetadatabusy")]
    pod_busy: i64,
    #[serde(rename = "podmetadataerror")]
    pod_error: i64,
}

impl Kubernetes {
    /// API server URL, or "" when the name does not carry one.
    fn url(&self) -> &str {
        API_URL
            .captures(&self.name)
            .and_then(|c| c.get(1))
            .map_or("", |m| m.as_str())
    }
}

impl Stat for Kubernetes {
    const KIND: StatKind = StatKind::Kubernetes;

    fn into_points(self) -> Vec<Point> {
        let url = self.url();
        let point = |name: &str, description: &str, value: i64| {
            Point::counter(name, description, value).with_label("url", url)
        };

        vec![
            point(
                "kubernetes_namespace_metadata_success_total",
                "successful fetches of namespace metadata",
                self.namespace_success,
            ),
            point(
                "kubernetes_namespace_metadata_notfound_total",
                "notfound fetches of namespace metadata",
                self.namespace_not_found,
            ),
            point(
                "kubernetes_namespace_metadata_busy_total",
                "busy fetches of namespace metadata",
                self.namespace_busy,
            ),
            point(
                "kubernetes_namespace_metadata_error_total",
                "error fetches of namespace metadata",
                self.namespace_error,
            ),
            point(
                "kubernetes_pod_metadata_success_total",
                "successful fetches of pod metadata",
                self.pod_success,
            ),
            point(
                "kubernetes_pod_metadata_notfound_total",
                "notfound fetches of pod metadata",
                self.pod_not_found,
            ),
            point(
                "kubernetes_pod_metadata_busy_total",
                "busy fetches of pod metadata",
                self.pod_busy,
            ),
            point(
                "kubernetes_pod_metadata_error_total",
                "error fetches of pod metadata",
                self.pod_error,
            ),
            point(
                "kubernetes_record_seen_total",
                "records fetched from the api",
                self.record_seen,
            ),
        ]
    }
}
