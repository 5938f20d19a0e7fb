//! omfwd forwarding counters.

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Forward {
    name: String,
    #[serde(rename = "bytes.sent")]
    bytes_sent: i64,
}

impl Stat for Forward {
    const KIND: StatKind = StatKind::Forward;

    fn into_points(self) -> Vec<Point> {
        vec![Point::counter(
            "forward_bytes_total",
            "bytes forwarded to destination",
            self.bytes_sent,
        )
        .with_label("destination", self.name)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{classify, decode};

    #[test]
    fn test_forward_to_points() {
        let log = br#"{ "name": "TCP-FQDN-6514", "origin": "omfwd", "bytes.sent": 666 }"#;
        assert_eq!(classify(log), StatKind::Forward);

        let points = decode(StatKind::Forward, log).unwrap().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].key(), "forward_bytes_total.TCP-FQDN-6514");
        assert_eq!(points[0].value, 666);
        assert_eq!(points[0].label_name, "destination");
    }
}
