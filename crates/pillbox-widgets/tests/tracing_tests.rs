#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Spans and events enabled:
//!   cargo test -p pillbox-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p pillbox-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pillbox_core::event::{Event, KeyCode};
use pillbox_core::geometry::Rect;
use pillbox_core::glyph_policy::GlyphPolicy;
use pillbox_render::frame::{Frame, HitId};
use pillbox_style::PillTheme;
use pillbox_widgets::StatefulWidget;
use pillbox_widgets::{FocusTarget, PillList, PillListState, PillOptions, PillRecord};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records span metadata and events.
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
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

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn sample_list() -> PillList {
    PillList::from_records([
        PillRecord::new("alpha").bgcolor("lime"),
        PillRecord::new("beta").bgcolor("definitely-not-a-color"),
    ])
    .with_options(PillOptions::new().on_close(|_| {}))
    .theme(PillTheme::dark())
    .glyphs(GlyphPolicy::default())
    .hit_id(HitId::new(1))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn pill_spans_nest_under_list_span() {
    let handle = with_capture(|| {
        let mut frame = Frame::with_hit_grid(40, 2);
        let mut state = PillListState::new();
        sample_list().render(Rect::from_size(40, 2), &mut frame, &mut state);
    });

    let spans = handle.spans();
    let widget_spans: Vec<_> = spans.iter().filter(|s| s.name == "widget_render").collect();
    assert_eq!(widget_spans.len(), 3, "one list span and two pill spans");

    let list_span = widget_spans
        .iter()
        .find(|s| s.fields.get("widget").is_some_and(|w| w.contains("PillList")))
        .expect("list span");
    assert_eq!(list_span.fields.get("items").map(String::as_str), Some("2"));

    let pill_spans: Vec<_> = widget_spans
        .iter()
        .filter(|s| s.fields.get("widget").is_some_and(|w| w == "Pill"))
        .collect();
    assert_eq!(pill_spans.len(), 2);
    assert!(
        pill_spans
            .iter()
            .all(|s| s.parent_name.as_deref() == Some("widget_render"))
    );
}

#[test]
#[cfg(feature = "tracing")]
fn invalid_color_logs_a_warning() {
    let handle = with_capture(|| {
        let mut frame = Frame::with_hit_grid(40, 2);
        let mut state = PillListState::new();
        sample_list().render(Rect::from_size(40, 2), &mut frame, &mut state);
    });

    let warnings: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].fields.get("token").map(String::as_str),
        Some("definitely-not-a-color")
    );
}

#[test]
#[cfg(feature = "tracing")]
fn close_dispatch_logs_label_and_source() {
    let handle = with_capture(|| {
        let list = sample_list();
        let mut state = PillListState::new();
        state.sync(&list.keys());
        state.focus(0, FocusTarget::Close);
        list.handle_event(&Event::key(KeyCode::Enter), None, &mut state);
    });

    let events = handle.events();
    let close = events
        .iter()
        .find(|e| e.fields.get("message").is_some_and(|m| m.contains("pill close")))
        .expect("close event");
    assert_eq!(close.fields.get("label").map(String::as_str), Some("alpha"));
    assert_eq!(close.fields.get("source").map(String::as_str), Some("keyboard"));
}

/// Without the feature the instrumentation compiles away entirely.
#[test]
fn zero_overhead_when_disabled() {
    let handle = with_capture(|| {
        let list = sample_list();
        let mut frame = Frame::with_hit_grid(40, 2);
        let mut state = PillListState::new();
        list.render(Rect::from_size(40, 2), &mut frame, &mut state);
        state.focus(1, FocusTarget::Close);
        list.handle_event(&Event::key(KeyCode::Char(' ')), None, &mut state);
    });

    let widget_spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "widget_render")
        .collect();

    #[cfg(feature = "tracing")]
    assert_eq!(widget_spans.len(), 3);

    #[cfg(not(feature = "tracing"))]
    {
        assert!(widget_spans.is_empty());
        assert!(handle.events().is_empty());
    }
}
