#![forbid(unsafe_code)]

//! Store log events follow the logging policy:
//! - every edit attempt emits one DEBUG event on `formloom.store`
//! - applied and skipped edits carry structured fields, not bare strings
//! - skipped edits name their reason
//!
//! Run:
//!   cargo test -p formloom-model --test store_logging

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use formloom_model::{BlockId, BlockTreeStore, BlockType};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
    message: Option<String>,
}

impl CapturedEvent {
    fn has_structured_fields(&self) -> bool {
        self.fields.keys().any(|k| k != "message")
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct EventCaptureHandle {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCaptureHandle {
    fn store_events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.target == "formloom.store")
            .cloned()
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
            message,
        });
    }
}

fn with_captured_events<F>(f: F) -> EventCaptureHandle
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    EventCaptureHandle { events }
}

#[test]
fn applied_edits_log_hashes_at_debug() {
    let handle = with_captured_events(|| {
        let mut store = BlockTreeStore::new();
        let container = store
            .new_container(BlockType::RowLayout)
            .expect("row layout is a container");
        let _ = store.insert_container(container, None);
    });

    let events = handle.store_events();
    assert_eq!(events.len(), 1, "one event per edit attempt: {events:?}");
    let event = &events[0];
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.message.as_deref(), Some("edit applied"));
    for key in ["operation_id", "kind", "before_hash", "after_hash"] {
        assert!(event.fields.contains_key(key), "missing {key}: {:?}", event.fields);
    }
    assert_eq!(event.fields["kind"], "InsertContainer");
}

#[test]
fn skipped_edits_log_reason() {
    let handle = with_captured_events(|| {
        let mut store = BlockTreeStore::new();
        let _ = store.remove_container(&BlockId::from("ghost"));
    });

    let events = handle.store_events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.message.as_deref(), Some("edit skipped"));
    assert_eq!(event.fields["reason"], "block ghost does not resolve");
}

#[test]
fn store_events_are_structured_and_never_above_debug() {
    let handle = with_captured_events(|| {
        let mut store = BlockTreeStore::new();
        let container = store
            .new_container(BlockType::RowLayout)
            .expect("row layout is a container");
        let container_id = container.id().clone();
        let _ = store.insert_container(container, None);
        let _ = store.duplicate_container(&container_id);
        let _ = store.remove_field(&container_id, &BlockId::from("missing"));
        let _ = store.remove_container(&container_id);
    });

    let events = handle.store_events();
    assert_eq!(events.len(), 4);
    for event in &events {
        assert!(event.has_structured_fields(), "bare event: {event:?}");
        assert!(event.level >= tracing::Level::DEBUG, "too loud: {event:?}");
    }
}
