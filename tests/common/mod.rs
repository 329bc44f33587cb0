#![allow(dead_code)]

use logstash_layout::host::StaticHost;
use logstash_layout::{CallSite, EventMapper, LayoutConfig, LogEvent, SchemaVersion, ThrowableInfo};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub const HOST: &str = "test-host";

/// A mapper with a fixed host and no override set.
pub fn mapper(schema: SchemaVersion) -> (EventMapper, Arc<LayoutConfig>) {
    mapper_with_override(schema, None)
}

pub fn mapper_with_override(
    schema: SchemaVersion,
    override_value: Option<&str>,
) -> (EventMapper, Arc<LayoutConfig>) {
    let config = Arc::new(LayoutConfig::default());
    let value = override_value.map(str::to_string);
    let mapper = EventMapper::with_parts(
        schema,
        Arc::clone(&config),
        &StaticHost(HOST.to_string()),
        Arc::new(move |_: &str| value.clone()),
    );
    (mapper, config)
}

pub fn event(message: &str) -> LogEvent {
    LogEvent {
        message: message.to_string(),
        timestamp_millis: 1_364_844_991_207,
        level: "INFO".to_string(),
        thread_name: "main".to_string(),
        logger_name: "app.service".to_string(),
        diagnostic_stack: None,
        context_map: BTreeMap::new(),
        throwable: None,
        call_site: Some(CallSite {
            file_name: Some("Service.java".to_string()),
            line_number: Some(42),
            class_name: Some("app.Service".to_string()),
            method_name: Some("handle".to_string()),
        }),
    }
}

pub fn illegal_argument(message: &str) -> ThrowableInfo {
    ThrowableInfo {
        class_name: Some("java.lang.IllegalArgumentException".to_string()),
        message: Some(message.to_string()),
        formatted_trace: Some(vec![
            format!("java.lang.IllegalArgumentException: {message}"),
            "\tat app.Service.handle(Service.java:42)".to_string(),
        ]),
    }
}

/// Format and parse, asserting the single trailing newline.
pub fn render(mapper: &EventMapper, event: &LogEvent) -> Value {
    let line = mapper.format(event).unwrap();
    assert!(line.ends_with('\n'));
    assert!(!line[..line.len() - 1].contains('\n'));
    serde_json::from_str(&line).unwrap()
}

/// A test writer that captures output for verification
#[derive(Clone, Debug, Default)]
pub struct TestWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestWriter {
    pub fn lines(&self) -> Vec<Value> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TestWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
