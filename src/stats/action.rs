//! Output action counters (`omfile`, `omfwd`, `omkafka` actions, ...).

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Action {
    name: String,
    processed: i64,
    failed: i64,
    suspended: i64,
    #[serde(rename = "suspended.duration")]
    suspended_duration: i64,
    resumed: i64,
}

impl Stat for Action {
    const KIND: StatKind = StatKind::Action;

    fn into_points(self) -> Vec<Point> {
        let point = |name: &str, description: &str, value: i64| {
            Point::counter(name, description, value).with_label("action", self.name.as_str())
        };

        vec![
            point("action_processed", "messages processed", self.processed),
            point("action_failed", "messages failed", self.failed),
            point("action_suspended", "times suspended", self.suspended),
            point(
                "action_suspended_duration",
                "time spent suspended",
                self.suspended_duration,
            ),
            point("action_resumed", "times resumed", self.resumed),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointKind;
    use crate::stats::{classify, decode};

    const ACTION_LOG: &[u8] = br#"{"name":"test_action","processed":100000,"failed":2,"suspended":1,"suspended.duration":1000,"resumed":1}"#;

    #[test]
    fn test_action_from_json() {
        assert_eq!(classify(ACTION_LOG), StatKind::Action);

        let stat: Action = serde_json::from_slice(ACTION_LOG).unwrap();
        assert_eq!(stat.name, "test_action");
        assert_eq!(stat.processed, 100000);
        assert_eq!(stat.failed, 2);
        assert_eq!(stat.suspended, 1);
        assert_eq!(stat.suspended_duration, 1000);
        assert_eq!(stat.resumed, 1);
    }

    #[test]
    fn test_action_to_points() {
        let points = decode(StatKind::Action, ACTION_LOG).unwrap().unwrap();
        let want = [
            ("action_processed", 100000),
            ("action_failed", 2),
            ("action_suspended", 1),
            ("action_suspended_duration", 1000),
            ("action_resumed", 1),
        ];

        assert_eq!(points.len(), want.len());
        for (p, (name, value)) in points.iter().zip(want) {
            assert_eq!(p.name, name);
            assert_eq!(p.value, value);
            assert_eq!(p.kind, PointKind::Counter);
            assert_eq!(p.label(), Some(("action", "test_action")));
        }
    }

    #[test]
    fn test_action_name_looking_like_other_origin() {
        // Action names such as "omfwd-out" still decode as actions.
        let log = br#"{"name":"omfwd-out","origin":"core.action","processed":7,"failed":0,"suspended":0,"suspended.duration":0,"resumed":0}"#;
        assert_eq!(classify(log), StatKind::Action);
        let points = decode(StatKind::Action, log).unwrap().unwrap();
        assert_eq!(points[0].key(), "action_processed.omfwd-out");
        assert_eq!(points[0].value, 7);
    }
}
