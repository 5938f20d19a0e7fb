//! imudp worker thread counters.

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct InputUdp {
    name: String,
    #[serde(rename = "called.recvmmsg")]
    recvmmsg: i64,
    #[serde(rename = "called.recvmsg")]
    recvmsg: i64,
    #[serde(rename = "msgs.received")]
    received: i64,
}

impl Stat for InputUdp {
    const KIND: StatKind = StatKind::InputUdpWorker;

    fn into_points(self) -> Vec<Point> {
        let point = |name: &str, description: &str, value: i64| {
            Point::counter(name, description, value).with_label("worker", self.name.as_str())
        };

        vec![
            point("input_called_recvmmsg", "Number of recvmmsg called", self.recvmmsg),
            point("input_called_recvmsg", "Number of recvmsg called", self.recvmsg),
            point("input_received", "messages received", self.received),
        ]
    }
}
