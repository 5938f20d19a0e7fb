//! Queue statistics (main queue, action queues).

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Queue {
    name: String,
    size: i64,
    enqueued: i64,
    full: i64,
    #[serde(rename = "discarded.full")]
    discarded_full: i64,
    #[serde(rename = "discarded.nf")]
    discarded_not_full: i64,
    #[serde(rename = "maxqsize")]
    max_size: i64,
}

impl Stat for Queue {
    const KIND: StatKind = StatKind::Queue;

    fn into_points(self) -> Vec<Point> {
        let label = |p: Point| p.with_label("queue", self.name.as_str());

        vec![
            label(Point::gauge(
                "queue_size",
                "messages currently in queue",
                self.size,
            )),
            label(Point::counter(
                "queue_enqueued",
                "total messages enqueued",
                self.enqueued,
            )),
            label(Point::counter(
                "queue_full",
                "times queue was full",
                self.full,
            )),
            label(Point::counter(
                "queue_discarded_full",
                "messages discarded due to queue being full",
                self.discarded_full,
            )),
            label(Point::counter(
                "queue_discarded_not_full",
                "messages discarded when queue not full",
                self.discarded_not_full,
            )),
            label(Point::gauge(
                "queue_max_size",
                "maximum size queue has reached",
                self.max_size,
            )),
        ]
    }
}
