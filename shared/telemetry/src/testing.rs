//! In-memory span and event recorder for asserting on telemetry in tests

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Recorded attributes of one span, keyed by field name
pub type SpanFields = HashMap<String, String>;

/// Layer that keeps every span's attributes, in creation order, and the
/// message of every event
#[derive(Clone, Default)]
pub struct RecordedSpans {
    spans: Arc<Mutex<Vec<(u64, SpanFields)>>>,
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordedSpans {
    /// Installs the recorder as the thread-local default subscriber
    #[must_use]
    pub fn set_default(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// Returns the attributes of all spans whose `otel.name` is `name`
    #[must_use]
    pub fn named(&self, name: &str) -> Vec<SpanFields> {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, fields)| fields.get("otel.name").map(String::as_str) == Some(name))
            .map(|(_, fields)| fields.clone())
            .collect()
    }

    /// Messages of all events logged at `level`
    #[must_use]
    pub fn events(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(event_level, _)| *event_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn update(&self, id: &Id, visit: impl FnOnce(&mut FieldVisitor)) {
        let mut spans = self.spans.lock().unwrap_or_else(PoisonError::into_inner);
        let key = id.into_u64();
        if let Some((_, fields)) = spans.iter_mut().rev().find(|(span_id, _)| *span_id == key) {
            visit(&mut FieldVisitor(fields));
        }
    }
}

impl<S: Subscriber> Layer<S> for RecordedSpans {
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut fields = SpanFields::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        fields
            .entry("otel.name".to_string())
            .or_insert_with(|| attrs.metadata().name().to_string());

        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.into_u64(), fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        self.update(id, |visitor| values.record(visitor));
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = SpanFields::new();
        event.record(&mut FieldVisitor(&mut fields));
        let message = fields.remove("message").unwrap_or_default();

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((*event.metadata().level(), message));
    }
}

struct FieldVisitor<'a>(&'a mut SpanFields);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}
