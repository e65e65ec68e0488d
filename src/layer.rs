//! Routes `tracing` events into a [`RotatingWriter`].

use crate::level::Level;
use crate::writer::RotatingWriter;
use std::fmt::Write;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// A tracing layer that writes every event as one rotated log line.
///
/// Events emitted by this crate are skipped: the writer reports its own
/// trouble through `tracing` while holding its lock.
pub struct RotatingLayer {
    writer: Arc<RotatingWriter>,
}

impl RotatingLayer {
    #[must_use]
    pub fn new(writer: Arc<RotatingWriter>) -> Self {
        Self { writer }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            if !self.fields.is_empty() {
                self.fields.push(' ');
            }
            write!(self.fields, "{}={:?}", field.name(), value).ok();
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            if !self.fields.is_empty() {
                self.fields.push(' ');
            }
            write!(self.fields, "{}={}", field.name(), value).ok();
        }
    }
}

fn is_own_target(target: &str) -> bool {
    let own = env!("CARGO_CRATE_NAME");
    target == own || target.strip_prefix(own).is_some_and(|rest| rest.starts_with("::"))
}

impl<S> Layer<S> for RotatingLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if is_own_target(event.metadata().target()) {
            return;
        }

        let level = match *event.metadata().level() {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let mut message = visitor.finish();
        if message.is_empty() {
            message = event.metadata().name().to_string();
        }

        self.writer.log(level, message);
    }
}
