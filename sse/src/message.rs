use crate::error::Error;
use axum::response::sse::Event as SseEvent;
use serde::Serialize;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// One numbered token. `index` starts at 1.
    #[serde(rename = "token")]
    Token { index: u32, token: String },

    /// Terminates the stream. `count` is the number of tokens sent before it.
    #[serde(rename = "done")]
    Done { count: u32 },
}

impl Event {
    pub fn token(index: u32) -> Self {
        Event::Token {
            index,
            token: format!("token-{index}"),
        }
    }

    pub fn done(count: u32) -> Self {
        Event::Done { count }
    }

    /// Sequence number written to the SSE `id:` field.
    pub fn sequence(&self) -> u32 {
        match self {
            Event::Token { index, .. } => *index,
            Event::Done { count } => count.saturating_add(1),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Event::Done { .. })
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Token { .. } => "token",
            Event::Done { .. } => "done",
        }
    }
}

/// Encodes an event as an axum SSE frame: `event:` carries the type, `id:` the
/// sequence number and `data:` the JSON body.
pub fn into_sse_event(event: &Event) -> Result<SseEvent, Error> {
    let event_data = serde_json::to_string(event)?;

    Ok(SseEvent::default()
        .event(event.event_type())
        .id(event.sequence().to_string())
        .data(event_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_serializes_with_type_and_data() {
        let value = serde_json::to_value(Event::token(3)).unwrap();
        assert_eq!(
            value,
            json!({"type": "token", "data": {"index": 3, "token": "token-3"}})
        );
    }

    #[test]
    fn done_serializes_with_count() {
        let value = serde_json::to_value(Event::done(10)).unwrap();
        assert_eq!(value, json!({"type": "done", "data": {"count": 10}}));
    }

    #[test]
    fn event_type_matches_serde_tag() {
        for event in [Event::token(1), Event::done(1)] {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.event_type());
        }
    }

    #[test]
    fn sequence_follows_tokens_then_done() {
        assert_eq!(Event::token(1).sequence(), 1);
        assert_eq!(Event::token(10).sequence(), 10);
        assert_eq!(Event::done(10).sequence(), 11);
        assert_eq!(Event::done(0).sequence(), 1);
    }

    #[test]
    fn into_sse_event_accepts_both_variants() {
        assert!(into_sse_event(&Event::token(2)).is_ok());
        assert!(into_sse_event(&Event::done(2)).is_ok());
    }
}
