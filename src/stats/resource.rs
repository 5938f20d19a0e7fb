//! Process resource usage (`getrusage` fields) reported by impstats.

use super::{Stat, StatKind};
use crate::model::Point;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Resource {
    name: String,
    utime: i64,
    stime: i64,
    maxrss: i64,
    minflt: i64,
    majflt: i64,
    inblock: i64,
    #[serde(rename = "outblock")]
    oublock: i64,
    nvcsw: i64,
    nivcsw: i64,
}

impl Stat for Resource {
    const KIND: StatKind = StatKind::Resource;

    fn into_points(self) -> Vec<Point> {
        let label = |p: Point| p.with_label("resource", self.name.as_str());

        vec![
            label(Point::counter("resource_utime", "user time used in microseconds", self.utime)),
            label(Point::counter("resource_stime", "system time used in microseconds", self.stime)),
            label(Point::gauge("resource_maxrss", "maximum resident set size", self.maxrss)),
            label(Point::counter("resource_minflt", "total minor faults", self.minflt)),
            label(Point::counter("resource_majflt", "total major faults", self.majflt)),
            label(Point::counter("resource_inblock", "filesystem input operations", self.inblock)),
            label(Point::counter("resource_oublock", "filesystem output operations", self.oublock)),
            label(Point::counter("resource_nvcsw", "voluntary context switches", self.nvcsw)),
            label(Point::counter("resource_nivcsw", "involuntary context switches", self.nivcsw)),
        ]
    }
}
