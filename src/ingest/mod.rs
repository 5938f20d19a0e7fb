//! impstats line ingestion.
//!
//! The [`IngestLoop`] reads newline-delimited impstats records, turns each
//! into points and upserts them into the shared [`PointStore`]. Records
//! that cannot be split, classified or decoded are counted in the
//! `stats_line_errors` point and skipped.
//!
//! # Example
//!
//! ```
//! use rsyslog_exporter::ingest::IngestLoop;
//! use rsyslog_exporter::model::PointStore;
//! use std::io::Cursor;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let store = Arc::new(PointStore::new());
//! let input = Cursor::new(r#"t1 t2 t3 {"name":"imtcp","submitted":5}"#);
//!
//! IngestLoop::new(input, Arc::clone(&store))
//!     .run(&CancellationToken::new())
//!     .unwrap();
//!
//! assert_eq!(store.get("input_submitted.imtcp").unwrap().value, 5);
//! ```

mod line;

pub use line::{parse_line, split_payload, LineError};

use crate::model::{Point, PointStore, StoreError};
use std::io::{self, BufRead, Read};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Name of the counter tracking dropped records.
pub const LINE_ERRORS_METRIC: &str = "stats_line_errors";

/// Longest accepted line, excluding the newline. Longer lines are skipped
/// and counted as errors.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Bytes of a dropped line included in its warning.
const LOG_PREVIEW_LEN: usize = 512;

/// Errors that end the ingest loop.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("error reading input: {0}")]
    Stream(#[source] io::Error),
    #[error("failed to store point: {0}")]
    Store(#[from] StoreError),
}

/// Sequential reader feeding the point store.
pub struct IngestLoop<R> {
    reader: R,
    store: Arc<PointStore>,
    silent: bool,
    line_errors: i64,
    buf: Vec<u8>,
}

impl<R: BufRead> IngestLoop<R> {
    /// Creates a loop reading from `reader` into `store`.
    pub fn new(reader: R, store: Arc<PointStore>) -> Self {
        Self {
            reader,
            store,
            silent: false,
            line_errors: 0,
            buf: Vec::new(),
        }
    }

    /// Suppresses the per-line warning for dropped records.
    ///
    /// The error counter is still incremented.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Records dropped so far.
    pub fn line_errors(&self) -> i64 {
        self.line_errors
    }

    /// Consumes records until end of input, cancellation or a read error.
    ///
    /// Cancellation is checked before each read. A read already in progress
    /// is not interrupted, so shutdown waits for the next record or for the
    /// input to close.
    pub fn run(&mut self, cancel: &CancellationToken) -> Result<(), IngestError> {
        self.store.set(self.error_point())?;

        loop {
            if cancel.is_cancelled() {
                tracing::info!(line_errors = self.line_errors, "Ingest cancelled");
                return Ok(());
            }

            self.buf.clear();
            let read = (&mut self.reader)
                .take(MAX_LINE_LEN as u64 + 1)
                .read_until(b'\n', &mut self.buf)
                .map_err(IngestError::Stream)?;
            if read == 0 {
                tracing::info!(line_errors = self.line_errors, "Input ended");
                return Ok(());
            }

            let outcome = if self.buf.len() > MAX_LINE_LEN && !self.buf.ends_with(b"\n") {
                discard_line(&mut self.reader).map_err(IngestError::Stream)?;
                Err(LineError::TooLong(MAX_LINE_LEN))
            } else {
                parse_line(trim_line_end(&self.buf))
            };

            match outcome {
                Ok(points) => {
                    for point in points {
                        self.store.set(point)?;
                    }
                }
                Err(err) => {
                    self.line_errors += 1;
                    if !self.silent {
                        let line = trim_line_end(&self.buf);
                        tracing::warn!(
                            error = %err,
                            line = %String::from_utf8_lossy(&line[..line.len().min(LOG_PREVIEW_LEN)]),
                            "Error handling stats line"
                        );
                    }
                    self.store.set(self.error_point())?;
                }
            }
        }
    }

    fn error_point(&self) -> Point {
        Point::counter(
            LINE_ERRORS_METRIC,
            "Counts errors during stats line handling",
            self.line_errors,
        )
    }
}

/// Drops input up to and including the next newline.
fn discard_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointKind;
    use proptest::prelude::*;
    use std::io::{BufReader, Cursor};

    const QUEUE_LINE: &str = r#"t1 t2 t3 {"name":"main Q","size":10,"enqueued":20,"full":30,"discarded.full":40,"discarded.nf":50,"maxqsize":60}"#;

    fn ingest(input: &str) -> (Arc<PointStore>, Result<(), IngestError>, i64) {
        let store = Arc::new(PointStore::new());
        let mut ingest = IngestLoop::new(Cursor::new(input.to_owned()), Arc::clone(&store));
        let result = ingest.run(&CancellationToken::new());
        (store, result, ingest.line_errors())
    }

    #[test]
    fn test_queue_line() {
        let (store, result, errors) = ingest(QUEUE_LINE);
        assert!(result.is_ok());
        assert_eq!(errors, 0);

        let size = store.get("queue_size.main Q").unwrap();
        assert_eq!(size.kind, PointKind::Gauge);
        assert_eq!(size.value, 10);

        let enqueued = store.get("queue_enqueued.main Q").unwrap();
        assert_eq!(enqueued.kind, PointKind::Counter);
        assert_eq!(enqueued.value, 20);
    }

    #[test]
    fn test_short_line_counts_one_error() {
        let (store, result, errors) = ingest("a b c\n");
        assert!(result.is_ok());
        assert_eq!(errors, 1);
        assert_eq!(store.keys(), vec![LINE_ERRORS_METRIC]);
        assert_eq!(store.get(LINE_ERRORS_METRIC).unwrap().value, 1);
    }

    #[test]
    fn test_errors_accumulate_and_good_lines_continue() {
        let input = format!(
            "a b c\n\
             x y z {{\"foo\":\"bar\"}}\n\
             x y z {{\"name\":\"q\",\"enqueued\":\"many\"}}\n\
             {QUEUE_LINE}\n"
        );
        let (store, result, errors) = ingest(&input);
        assert!(result.is_ok());
        assert_eq!(errors, 3);
        assert_eq!(store.get(LINE_ERRORS_METRIC).unwrap().value, 3);
        assert_eq!(store.get("queue_max_size.main Q").unwrap().value, 60);
    }

    #[test]
    fn test_distinct_kinds_union_of_keys() {
        let input = [
            r#"t h tag {"name":"act","processed":1,"failed":0,"suspended":0,"suspended.duration":0,"resumed":0}"#,
            r#"t h tag {"name":"imuxsock","origin":"imuxsock","submitted":2}"#,
            r#"t h tag {"name":"TCP-1","origin":"omfwd","bytes.sent":3}"#,
            r#"t h tag {"name":"global","origin":"dynstats","values":{"a":1,"b":2}}"#,
        ]
        .join("\n");

        let (store, result, errors) = ingest(&input);
        assert!(result.is_ok());
        assert_eq!(errors, 0);

        let keys = store.keys();
        assert_eq!(keys.len(), 1 + 5 + 1 + 1 + 2);
        assert!(keys.contains(&LINE_ERRORS_METRIC.to_string()));
        assert!(keys.contains(&"action_resumed.act".to_string()));
        assert!(keys.contains(&"input_submitted.imuxsock".to_string()));
        assert!(keys.contains(&"forward_bytes_total.TCP-1".to_string()));
        assert!(keys.contains(&"dynstat_global.b".to_string()));
        assert_eq!(store.get(LINE_ERRORS_METRIC).unwrap().value, 0);
    }

    #[test]
    fn test_repeated_record_replaces_values() {
        let input = format!(
            "{QUEUE_LINE}\n{}\n",
            QUEUE_LINE.replace("\"size\":10", "\"size\":3")
        );
        let (store, result, _) = ingest(&input);
        assert!(result.is_ok());
        assert_eq!(store.get("queue_size.main Q").unwrap().value, 3);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (store, result, errors) = ingest(&format!("{QUEUE_LINE}\r\n"));
        assert!(result.is_ok());
        assert_eq!(errors, 0);
        assert_eq!(store.get("queue_size.main Q").unwrap().value, 10);
    }

    #[test]
    fn test_silent_still_counts() {
        let store = Arc::new(PointStore::new());
        let mut ingest =
            IngestLoop::new(Cursor::new("bad\n"), Arc::clone(&store)).with_silent(true);
        ingest.run(&CancellationToken::new()).unwrap();
        assert_eq!(store.get(LINE_ERRORS_METRIC).unwrap().value, 1);
    }

    #[test]
    fn test_cancelled_before_read() {
        let store = Arc::new(PointStore::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut ingest = IngestLoop::new(Cursor::new(QUEUE_LINE), Arc::clone(&store));
        assert!(ingest.run(&cancel).is_ok());
        assert_eq!(store.keys(), vec![LINE_ERRORS_METRIC]);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "input went away"))
        }
    }

    #[test]
    fn test_stream_error_is_returned() {
        let store = Arc::new(PointStore::new());
        let mut ingest = IngestLoop::new(BufReader::new(FailingReader), store);
        let err = ingest.run(&CancellationToken::new()).unwrap_err();
        match err {
            IngestError::Stream(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overlong_line_is_skipped() {
        let input = format!("t h tag {}\n{QUEUE_LINE}\n", "x".repeat(MAX_LINE_LEN));
        let store = Arc::new(PointStore::new());
        // Small buffer so the skipped remainder spans several fills.
        let reader = BufReader::with_capacity(64, Cursor::new(input));
        let mut ingest = IngestLoop::new(reader, Arc::clone(&store));

        assert!(ingest.run(&CancellationToken::new()).is_ok());
        assert_eq!(ingest.line_errors(), 1);
        assert_eq!(store.get("queue_size.main Q").unwrap().value, 10);
    }

    #[test]
    fn test_overlong_last_line_without_newline() {
        let input = format!("{QUEUE_LINE}\n{}", "y".repeat(MAX_LINE_LEN + 10));
        let (store, result, errors) = ingest(&input);
        assert!(result.is_ok());
        assert_eq!(errors, 1);
        assert_eq!(store.get(LINE_ERRORS_METRIC).unwrap().value, 1);
    }

    #[test]
    fn test_line_at_length_limit_is_accepted() {
        let head = r#"t h tag {"name":""#;
        let tail = r#"","enqueued":1}"#;
        let name = "n".repeat(MAX_LINE_LEN - head.len() - tail.len());
        let line = format!("{head}{name}{tail}");
        assert_eq!(line.len(), MAX_LINE_LEN);

        let (store, result, errors) = ingest(&format!("{line}\n"));
        assert!(result.is_ok());
        assert_eq!(errors, 0);
        assert_eq!(store.get(&format!("queue_enqueued.{name}")).unwrap().value, 1);
    }

    proptest! {
        #[test]
        fn prop_repeated_records_keep_key_count(
            sizes in proptest::collection::vec(any::<i64>(), 1..20),
            utime in any::<i64>(),
        ) {
            let input: String = sizes
                .iter()
                .map(|size| {
                    format!(
                        "t h tag {{\"name\":\"main Q\",\"size\":{size},\"enqueued\":1}}\n\
                         t h tag {{\"name\":\"res\",\"utime\":{utime}}}\n"
                    )
                })
                .collect();

            let (store, result, errors) = ingest(&input);
            prop_assert!(result.is_ok());
            prop_assert_eq!(errors, 0);
            // 6 queue points, 9 resource points, the error counter.
            prop_assert_eq!(store.len(), 6 + 9 + 1);
            prop_assert_eq!(store.get("queue_size.main Q").unwrap().value, *sizes.last().unwrap());
        }

        #[test]
        fn prop_distinct_queue_names_get_distinct_keys(
            names in proptest::collection::btree_set("[a-z]{1,4}", 1..10),
        ) {
            let input: String = names
                .iter()
                .map(|name| format!("t h tag {{\"name\":\"{name}\",\"enqueued\":1}}\n"))
                .collect();

            let (store, result, _) = ingest(&input);
            prop_assert!(result.is_ok());
            prop_assert_eq!(store.len(), names.len() * 6 + 1);
        }
    }
}
