//! omkafka producer statistics.

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct KafkaOutput {
    name: String,
    submitted: i64,
    maxoutqsize: i64,
    failures: i64,
    #[serde(rename = "topicdynacache.skipped")]
    topic_cache_skipped: i64,
    #[serde(rename = "topicdynacache.miss")]
    topic_cache_miss: i64,
    #[serde(rename = "topicdynacache.evicted")]
    topic_cache_evicted: i64,
    acked: i64,
    failures_msg_too_large: i64,
    failures_unknown_topic: i64,
    failures_queue_full: i64,
    failures_unknown_partition: i64,
    failures_other: i64,
    errors_timed_out: i64,
    errors_transport: i64,
    errors_broker_down: i64,
    errors_auth: i64,
    errors_ssl: i64,
    errors_other: i64,
    rtt_avg_usec: i64,
    throttle_avg_msec: i64,
    int_latency_avg_usec: i64,
}

impl Stat for KafkaOutput {
    const KIND: StatKind = StatKind::KafkaOutput;

    fn into_points(self) -> Vec<Point> {
        let messages = |kind: &str, value: i64| {
            Point::counter("omkafka_messages", "messages handled by omkafka", value)
                .with_label("type", kind)
        };
        let topic_cache = |event: &str, value: i64| {
            Point::counter("omkafka_topicdynacache", "topic dynacache events", value)
                .with_label("event", event)
        };
        let failure = |reason: &str, value: i64| {
            Point::counter("omkafka_failures", "messages failed by reason", value)
                .with_label("reason", reason)
        };
        let error = |reason: &str, value: i64| {
            Point::counter("omkafka_errors", "librdkafka errors by reason", value)
                .with_label("reason", reason)
        };

        vec![
            // Older dashboards read omkafka throughput from the generic input metric.
            Point::counter("input_submitted", "messages submitted", self.submitted)
                .with_label("input", self.name.as_str()),
            messages("submitted", self.submitted),
            Point::counter(
                "omkafka_maxoutqsize",
                "maximum size of the librdkafka output queue",
                self.maxoutqsize,
            ),
            messages("failures", self.failures),
            topic_cache("skipped", self.topic_cache_skipped),
            topic_cache("miss", self.topic_cache_miss),
            topic_cache("evicted", self.topic_cache_evicted),
            messages("acked", self.acked),
            failure("msg_too_large", self.failures_msg_too_large),
            failure("unknown_topic", self.failures_unknown_topic),
            failure("queue_full", self.failures_queue_full),
            failure("unknown_partition", self.failures_unknown_partition),
            failure("other", self.failures_other),
            error("timed_out", self.errors_timed_out),
            error("transport", self.errors_transport),
            error("broker_down", self.errors_broker_down),
            error("auth", self.errors_auth),
            error("ssl", self.errors_ssl),
            error("other", self.errors_other),
            Point::gauge(
                "omkafka_rtt_avg_usec_avg",
                "broker round trip time in microseconds",
                self.rtt_avg_usec,
            ),
            Point::gauge(
                "omkafka_throttle_avg_msec_avg",
                "broker throttle time in milliseconds",
                self.throttle_avg_msec,
            ),
            Point::gauge(
                "omkafka_int_latency_avg_usec_avg",
                "internal librdkafka queue latency in microseconds",
                self.int_latency_avg_usec,
            ),
        ]
    }
}
