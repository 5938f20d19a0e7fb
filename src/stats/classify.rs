//! Record kind detection.
//!
//! Signals overlap (omkafka records also carry `submitted`, action names
//! can look like any other origin), so detection is an ordered rule table
//! where the first matching rule wins.

use super::StatKind;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde_json::Value;

/// Captures every quoted `"name": "<value>"` string in a raw payload.
static QUOTED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""name"\s*:\s*"([^"]*)""#).expect("static regex is valid"));

/// A signal looked for in a payload.
#[derive(Debug, Clone, Copy)]
enum Signal {
    /// Raw payload contains the substring.
    Contains(&'static str),
    /// The JSON `name` field is a string equal to the value.
    NameIs(&'static str),
    /// The JSON `name` field is a string starting with the value.
    NameStartsWith(&'static str),
    /// Raw payload has a quoted `"name"` value equal to the value.
    QuotedNameIs(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    signal: Signal,
    kind: StatKind,
}

const fn rule(signal: Signal, kind: StatKind) -> Rule {
    Rule { signal, kind }
}

/// Detection rules in priority order.
///
/// `processed` must stay first: it short-circuits before any structural
/// check. A record from another origin that merely contains the word is
/// classified as an action and then fails or misdecodes. That is the
/// observed behavior and is kept as is.
const RULES: &[Rule] = &[
    rule(Signal::Contains("processed"), StatKind::Action),
    rule(Signal::NameIs("omkafka"), StatKind::KafkaOutput),
    rule(Signal::NameIs("omfwd"), StatKind::Forward),
    rule(Signal::NameStartsWith("mmkubernetes"), StatKind::Kubernetes),
    // Exact only: omkafka action queues are named like `action-3-omkafka queue`.
    rule(Signal::QuotedNameIs("omkafka"), StatKind::KafkaOutput),
    rule(Signal::Contains("submitted"), StatKind::Input),
    rule(Signal::Contains("called.recvmmsg"), StatKind::InputUdpWorker),
    rule(Signal::Contains("enqueued"), StatKind::Queue),
    rule(Signal::Contains("utime"), StatKind::Resource),
    rule(Signal::Contains("dynstats"), StatKind::DynStat),
    rule(Signal::Contains("dynafile cache"), StatKind::DynafileCache),
    rule(Signal::Contains("omfwd"), StatKind::Forward),
    rule(Signal::Contains("mmkubernetes"), StatKind::Kubernetes),
];

/// Payload view shared by the rules; the JSON name is parsed at most once.
struct PayloadView<'a> {
    raw: &'a [u8],
    name: Option<Option<String>>,
}

impl<'a> PayloadView<'a> {
    fn new(raw: &'a [u8]) -> Self {
        Self { raw, name: None }
    }

    fn json_name(&mut self) -> Option<&str> {
        let raw = self.raw;
        self.name
            .get_or_insert_with(|| {
                serde_json::from_slice::<Value>(raw)
                    .ok()
                    .and_then(|v| v.get("name")?.as_str().map(str::to_owned))
            })
            .as_deref()
    }

    fn matches(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::Contains(needle) => contains(self.raw, needle.as_bytes()),
            Signal::NameIs(name) => self.json_name() == Some(name),
            Signal::NameStartsWith(prefix) => {
                self.json_name().is_some_and(|n| n.starts_with(prefix))
            }
            Signal::QuotedNameIs(name) => QUOTED_NAME
                .captures_iter(self.raw)
                .any(|c| &c[1] == name.as_bytes()),
        }
    }
}

/// Infers the kind of an impstats payload. Never fails.
pub fn classify(payload: &[u8]) -> StatKind {
    let mut view = PayloadView::new(payload);
    RULES
        .iter()
        .find(|r| view.matches(r.signal))
        .map_or(StatKind::Unknown, |r| r.kind)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
