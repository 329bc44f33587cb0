mod common;

use common::{mapper, TestWriter, HOST};
use logstash_layout::{LogstashLayer, SchemaVersion};
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, info_span, warn};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug)]
struct Root;

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("disk unplugged")
    }
}

impl std::error::Error for Root {}

#[derive(Debug)]
struct Boom(Root);

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("boom")
    }
}

impl std::error::Error for Boom {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

struct Captured {
    lines: Vec<serde_json::Value>,
    total: u64,
    written: u64,
}

fn capture(schema: SchemaVersion, f: impl FnOnce()) -> Captured {
    let writer = TestWriter::default();
    let (mapper, _) = mapper(schema);
    let layer = LogstashLayer::new(mapper).with_writer(writer.clone());
    let total = Arc::clone(&layer.total_events);
    let written = Arc::clone(&layer.written_events);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    Captured {
        lines: writer.lines(),
        total: total.load(Ordering::Relaxed),
        written: written.load(Ordering::Relaxed),
    }
}

#[test]
fn writes_one_line_per_event() {
    let captured = capture(SchemaVersion::V1, || {
        info!("this is an info message");
        warn!("second");
    });
    let lines = captured.lines;
    assert_eq!(lines.len(), 2);
    assert_eq!(captured.total, 2);
    assert_eq!(captured.written, 2);

    let doc = &lines[0];
    assert_eq!(doc["message"], "this is an info message");
    assert_eq!(doc["@version"], "1");
    assert_eq!(doc["source_host"], HOST);
    assert_eq!(doc["level"], "INFO");
    assert_eq!(doc["logger_name"], module_path!());
    assert_eq!(doc["class"], module_path!());
    assert!(doc["file"].as_str().unwrap().ends_with("tracing_layer.rs"));
    assert!(doc["line_number"].is_u64());
    assert!(doc["thread_name"].is_string());
    assert!(doc.get("method").is_none());
    assert_eq!(lines[1]["level"], "WARN");
}

#[test]
fn spans_become_ndc_and_mdc() {
    let lines = capture(SchemaVersion::V0, || {
        let outer = info_span!("request", user = "alice", attempt = 1u64);
        let _outer = outer.enter();
        let inner = info_span!("db", attempt = 2u64);
        let _inner = inner.enter();
        info!(rows = 3i64, "query done");
    })
    .lines;
    let fields = &lines[0]["@fields"];
    assert_eq!(lines[0]["@message"], "query done");
    assert_eq!(fields["ndc"], "request db");
    assert_eq!(fields["mdc"]["user"], "alice");
    assert_eq!(fields["mdc"]["attempt"], 2);
    assert_eq!(fields["mdc"]["rows"], 3);
}

#[test]
fn no_span_means_no_ndc_or_mdc() {
    let lines = capture(SchemaVersion::V0, || info!("bare")).lines;
    let fields = lines[0]["@fields"].as_object().unwrap();
    assert!(!fields.contains_key("ndc"));
    assert!(!fields.contains_key("mdc"));
}

#[test]
fn recorded_span_values_are_picked_up() {
    let lines = capture(SchemaVersion::V1, || {
        let span = info_span!("job", status = tracing::field::Empty);
        let _guard = span.enter();
        span.record("status", "running");
        info!("tick");
    })
    .lines;
    assert_eq!(lines[0]["mdc"]["status"], "running");
}

#[test]
fn errors_become_exceptions() {
    let lines = capture(SchemaVersion::V1, || {
        let err = Boom(Root);
        error!(error = &err as &(dyn std::error::Error + 'static), "uh-oh");
    })
    .lines;
    let exception = &lines[0]["exception"];
    assert!(exception.get("exception_class").is_none());
    assert_eq!(exception["exception_message"], "boom");
    assert_eq!(exception["stacktrace"], "boom\nCaused by: disk unplugged");
    assert_eq!(lines[0]["level"], "ERROR");
}

#[test]
fn non_finite_floats_are_kept_as_text() {
    let lines = capture(SchemaVersion::V1, || {
        info!(ratio = f64::NAN, peak = f64::INFINITY, mean = 0.5f64, "x");
    })
    .lines;
    let mdc = &lines[0]["mdc"];
    assert_eq!(mdc["ratio"], "NaN");
    assert_eq!(mdc["peak"], "inf");
    assert_eq!(mdc["mean"], 0.5);
    assert!(mdc.as_object().unwrap().values().all(|v| !v.is_null()));
}
