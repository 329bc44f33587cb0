use crate::mapper::EventMapper;
use crate::record::{CallSite, LogEvent, ThrowableInfo};
use chrono::Utc;
use std::collections::BTreeMap;
use std::error::Error;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that renders every event it observes as one
/// logstash JSON line and writes it to a [`MakeWriter`].
///
/// The `tracing` data model is mapped onto [`LogEvent`] as follows:
/// - the entered span names, root first and space separated, become the
///   diagnostic stack (`ndc`);
/// - fields recorded on enclosing spans plus the event's own fields become
///   the context map (`mdc`), inner values shadowing outer ones;
/// - a field recorded as an error becomes the exception;
/// - the event target is the logger name and the module path the class.
///
/// Level filtering is left to the subscriber stack (e.g. a `Filtered`
/// layer); this layer formats whatever reaches it.
pub struct LogstashLayer<W = fn() -> io::Stdout> {
    mapper: EventMapper,
    make_writer: W,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
    /// Lines successfully written.
    pub written_events: Arc<AtomicU64>,
    /// Events lost to a serialization or write failure.
    pub failed_events: Arc<AtomicU64>,
}

impl LogstashLayer {
    /// Create a layer writing to stdout.
    pub fn new(mapper: EventMapper) -> Self {
        Self {
            mapper,
            make_writer: io::stdout,
            total_events: Arc::new(AtomicU64::new(0)),
            written_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<W> LogstashLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    /// Replace the output destination, keeping mapper and counters.
    pub fn with_writer<W2>(self, make_writer: W2) -> LogstashLayer<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        LogstashLayer {
            mapper: self.mapper,
            make_writer,
            total_events: self.total_events,
            written_events: self.written_events,
            failed_events: self.failed_events,
        }
    }

    pub fn mapper(&self) -> &EventMapper {
        &self.mapper
    }

    fn emit(&self, event: &LogEvent) {
        let line = match self.mapper.format(event) {
            Ok(line) => line,
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("error formatting log event: {}", e);
                return;
            }
        };

        let mut writer = self.make_writer.make_writer();
        match writer.write_all(line.as_bytes()) {
            Ok(()) => {
                self.written_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("error writing log line: {}", e);
            }
        }
    }
}

/// Fields recorded on a span, kept in its extensions.
#[derive(Default)]
struct SpanFields(BTreeMap<String, serde_json::Value>);

impl<S, W> Layer<S> for LogstashLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = SpanFields::default();
        attrs.record(&mut FieldVisitor::span(&mut fields.0));
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<SpanFields>() {
            values.record(&mut FieldVisitor::span(&mut fields.0));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let mut context_map = BTreeMap::new();
        let mut names = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                names.push(span.name());
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    context_map.extend(fields.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let mut message = None;
        let mut throwable = None;
        event.record(&mut FieldVisitor {
            fields: &mut context_map,
            message: Some(&mut message),
            throwable: Some(&mut throwable),
        });

        let meta = event.metadata();
        let record = LogEvent {
            message: message.unwrap_or_default(),
            timestamp_millis: Utc::now().timestamp_millis(),
            level: meta.level().to_string(),
            thread_name: current_thread_name(),
            logger_name: meta.target().to_string(),
            diagnostic_stack: (!names.is_empty()).then(|| names.join(" ")),
            context_map,
            throwable,
            call_site: Some(CallSite {
                file_name: meta.file().map(|s| s.to_string()),
                line_number: meta.line(),
                class_name: meta.module_path().map(|s| s.to_string()),
                method_name: None,
            }),
        };

        self.emit(&record);
    }
}

fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

/// Collects `tracing` fields into a JSON map, pulling out the message and
/// any recorded error when asked to.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: Option<&'a mut Option<String>>,
    pub throwable: Option<&'a mut Option<ThrowableInfo>>,
}

impl<'a> FieldVisitor<'a> {
    fn span(fields: &'a mut BTreeMap<String, serde_json::Value>) -> Self {
        Self { fields, message: None, throwable: None }
    }

    fn take_message(&mut self, field: &Field, value: impl FnOnce() -> String) -> bool {
        match &mut self.message {
            Some(message) if field.name() == "message" => {
                **message = Some(value());
                true
            }
            _ => false,
        }
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if !self.take_message(field, || value.to_string()) {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // JSON has no NaN or infinity; keep them as text rather than null.
        let value = if value.is_finite() {
            serde_json::Value::from(value)
        } else {
            serde_json::Value::String(value.to_string())
        };
        self.fields.insert(field.name().to_string(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        match &mut self.throwable {
            Some(throwable) => **throwable = Some(throwable_info(value)),
            None => {
                self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if !self.take_message(field, || format!("{:?}", value)) {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
        }
    }
}

/// The error's own line followed by one `Caused by:` line per source.
fn throwable_info(error: &(dyn Error + 'static)) -> ThrowableInfo {
    let mut trace = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        trace.push(format!("Caused by: {}", cause));
        source = cause.source();
    }
    ThrowableInfo {
        class_name: None,
        message: Some(error.to_string()),
        formatted_trace: Some(trace),
    }
}
