//! Single record handling: split, classify, decode.

use crate::model::Point;
use crate::stats::{classify, decode, DecodeError, StatKind};
use thiserror::Error;

/// Number of space separated columns in an impstats line. The first three
/// (timestamp, host, tag) are ignored.
const COLUMNS: usize = 4;

/// A record that was dropped. Counted, never fatal.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("failed to split log line, expected 4 columns, got: {0}")]
    Split(usize),
    #[error("unknown stat type: {0}")]
    Unclassified(StatKind),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("line exceeds {0} bytes")]
    TooLong(usize),
}

/// Returns the JSON payload, i.e. everything after the third space.
pub fn split_payload(line: &[u8]) -> Result<&[u8], LineError> {
    let fields: Vec<&[u8]> = line.splitn(COLUMNS, |&b| b == b' ').collect();
    match fields.as_slice() {
        [_, _, _, payload] => Ok(*payload),
        other => Err(LineError::Split(other.len())),
    }
}

/// Turns one raw impstats line into points.
pub fn parse_line(line: &[u8]) -> Result<Vec<Point>, LineError> {
    let payload = split_payload(line)?;
    let kind = classify(payload);
    let points = decode(kind, payload).ok_or(LineError::Unclassified(kind))??;
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_payload_keeps_spaces() {
        let line = br#"2017-08-30T08:10:04.786350+00:00 some-node.example.org rsyslogd-pstats: {"name": "main Q", "size": 1}"#;
        assert_eq!(
            split_payload(line).unwrap(),
            br#"{"name": "main Q", "size": 1}"#
        );
    }

    #[test]
    fn test_split_too_few_columns() {
        assert!(matches!(split_payload(b"a b c"), Err(LineError::Split(3))));
        assert!(matches!(split_payload(b""), Err(LineError::Split(1))));
    }

    #[test]
    fn test_parse_line_unclassified() {
        let err = parse_line(br#"a b c {"foo":"bar"}"#).unwrap_err();
        assert!(matches!(err, LineError::Unclassified(StatKind::Unknown)));
        assert_eq!(err.to_string(), "unknown stat type: unknown");
    }

    #[test]
    fn test_parse_line_decode_error() {
        let err = parse_line(br#"a b c {"name":"x","enqueued":"many"}"#).unwrap_err();
        match err {
            LineError::Decode(e) => assert_eq!(e.kind, StatKind::Queue),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_line_resource() {
        let line = br#"col1 col2 col3 {"name":"myres","utime":42,"stime":0,"maxrss":0,"minflt":0,"majflt":0,"inblock":0,"outblock":0,"nvcsw":0,"nivcsw":0}"#;
        let points = parse_line(line).unwrap();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0].key(), "resource_utime.myres");
        assert_eq!(points[0].value, 42);
    }

    #[test]
    fn test_parse_line_omkafka_action_queue() {
        let line = br#"t h rsyslogd-pstats: { "name": "action-3-omkafka queue", "origin": "core.queue", "size": 7, "enqueued": 100, "full": 0, "discarded.full": 0, "discarded.nf": 0, "maxqsize": 9 }"#;
        let points = parse_line(line).unwrap();
        let keys: Vec<String> = points.iter().map(Point::key).collect();
        assert!(keys.contains(&"queue_size.action-3-omkafka queue".to_string()));
        assert!(keys.iter().all(|k| !k.starts_with("omkafka_")));
    }

    #[test]
    fn test_parse_line_too_long_message() {
        assert_eq!(
            LineError::TooLong(65536).to_string(),
            "line exceeds 65536 bytes"
        );
    }
}
