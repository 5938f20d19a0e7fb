//! Generic input counters (`imuxsock`, `imtcp`, ...).

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Input {
    name: String,
    submitted: i64,
}

impl Stat for Input {
    const KIND: StatKind = StatKind::Input;

    fn into_points(self) -> Vec<Point> {
        vec![Point::counter("input_submitted", "messages submitted", self.submitted)
            .with_label("input", self.name)]
    }
}
