//! rsyslog impstats record classification and decoding.
//!
//! impstats emits one JSON object per statistic origin (actions, inputs,
//! queues, resource usage, ...). Records carry no explicit type tag, so
//! [`classify`] infers a [`StatKind`] from the payload and [`decode`]
//! turns the payload into [`Point`]s using the schema for that kind.
//!
//! # Example
//!
//! ```
//! use rsyslog_exporter::stats::{classify, decode, StatKind};
//!
//! let payload = br#"{"name":"main Q","size":10,"enqueued":20}"#;
//! let kind = classify(payload);
//! assert_eq!(kind, StatKind::Queue);
//!
//! let points = decode(kind, payload).unwrap().unwrap();
//! assert_eq!(points[0].key(), "queue_size.main Q");
//! ```

mod action;
mod classify;
mod dynafile_cache;
mod dynstat;
mod forward;
mod input;
mod input_udp;
mod kafka;
mod kubernetes;
mod queue;
mod resource;

pub use classify::classify;

use crate::model::Point;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

/// Closed set of impstats record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Nothing matched; no decoder.
    Unknown,
    /// Action counters (`processed`, `failed`, ...).
    Action,
    /// Generic input (`submitted`).
    Input,
    /// imudp worker thread.
    InputUdpWorker,
    /// Main or action queue.
    Queue,
    /// Process resource usage.
    Resource,
    /// Dynamic statistics bucket.
    DynStat,
    /// omfile dynafile cache.
    DynafileCache,
    /// omfwd forwarding.
    Forward,
    /// mmkubernetes metadata lookups.
    Kubernetes,
    /// omkafka producer.
    KafkaOutput,
}

impl StatKind {
    /// Short lowercase name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Unknown => "unknown",
            StatKind::Action => "action",
            StatKind::Input => "input",
            StatKind::InputUdpWorker => "input_udp_worker",
            StatKind::Queue => "queue",
            StatKind::Resource => "resource",
            StatKind::DynStat => "dynstat",
            StatKind::DynafileCache => "dynafile_cache",
            StatKind::Forward => "forward",
            StatKind::Kubernetes => "kubernetes",
            StatKind::KafkaOutput => "kafka_output",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload matched a kind but did not fit that kind's schema.
#[derive(Debug, Error)]
#[error("failed to decode {kind} stat `{payload}`: {source}")]
pub struct DecodeError {
    /// Kind the payload was classified as.
    pub kind: StatKind,
    /// The offending payload, lossily converted to UTF-8.
    pub payload: String,
    /// Underlying JSON error.
    #[source]
    pub source: serde_json::Error,
}

/// A kind-specific impstats schema.
trait Stat: DeserializeOwned {
    const KIND: StatKind;

    fn into_points(self) -> Vec<Point>;
}

fn decode_as<T: Stat>(payload: &[u8]) -> Result<Vec<Point>, DecodeError> {
    let stat: T = serde_json::from_slice(payload).map_err(|source| DecodeError {
        kind: T::KIND,
        payload: String::from_utf8_lossy(payload).into_owned(),
        source,
    })?;
    Ok(stat.into_points())
}

/// Decodes a payload as `kind`.
///
/// Returns `None` when no decoder exists for the kind, which today is only
/// [`StatKind::Unknown`].
pub fn decode(kind: StatKind, payload: &[u8]) -> Option<Result<Vec<Point>, DecodeError>> {
    let points = match kind {
        StatKind::Unknown => return None,
        StatKind::Action => decode_as::<action::Action>(payload),
        StatKind::Input => decode_as::<input::Input>(payload),
        StatKind::InputUdpWorker => decode_as::<input_udp::InputUdp>(payload),
        StatKind::Queue => decode_as::<queue::Queue>(payload),
        StatKind::Resource => decode_as::<resource::Resource>(payload),
        StatKind::DynStat => decode_as::<dynstat::DynStat>(payload),
        StatKind::DynafileCache => decode_as::<dynafile_cache::DynafileCache>(payload),
        StatKind::Forward => decode_as::<forward::Forward>(payload),
        StatKind::Kubernetes => decode_as::<kubernetes::Kubernetes>(payload),
        StatKind::KafkaOutput => decode_as::<kafka::KafkaOutput>(payload),
    };
    Some(points)
}
