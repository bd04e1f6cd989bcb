use crate::message::Event;
use async_stream::stream;
use futures::Stream;
use log::*;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TOKEN_COUNT: u32 = 10;
pub const DEFAULT_TOKEN_INTERVAL: Duration = Duration::from_secs(1);

/// Unique identifier for one `/stream` request (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamId(String);

impl StreamId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How many tokens a stream emits and how long it waits between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub token_count: u32,
    pub token_interval: Duration,
}

impl StreamSettings {
    pub fn new(token_count: u32, token_interval: Duration) -> Self {
        Self {
            token_count,
            token_interval,
        }
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_COUNT, DEFAULT_TOKEN_INTERVAL)
    }
}

/// Yields `token_count` numbered tokens, sleeping `token_interval` between
/// consecutive tokens, followed by exactly one `Done` event.
pub fn token_stream(settings: StreamSettings) -> impl Stream<Item = Event> {
    let StreamSettings {
        token_count,
        token_interval,
    } = settings;

    stream! {
        for index in 1..=token_count {
            trace!("Emitting token {index}/{token_count}");
            yield Event::token(index);

            if index < token_count {
                tokio::time::sleep(token_interval).await;
            }
        }

        yield Event::done(token_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::time::Instant;

    #[test]
    fn stream_ids_are_unique() {
        let a = StreamId::new();
        let b = StreamId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn default_settings_are_ten_tokens_one_second_apart() {
        let settings = StreamSettings::default();
        assert_eq!(settings.token_count, 10);
        assert_eq!(settings.token_interval, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn emits_numbered_tokens_then_done() {
        let events: Vec<Event> = token_stream(StreamSettings::default()).collect().await;

        assert_eq!(events.len(), 11);
        for (i, event) in events.iter().take(10).enumerate() {
            assert_eq!(*event, Event::token(i as u32 + 1));
        }
        assert_eq!(events.last(), Some(&Event::done(10)));
        assert_eq!(events.iter().filter(|e| e.is_done()).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_tokens_but_not_after_the_last() {
        let start = Instant::now();
        let settings = StreamSettings::new(4, Duration::from_secs(1));

        let events: Vec<Event> = token_stream(settings).collect().await;

        let elapsed = start.elapsed();
        assert_eq!(events.len(), 5);
        assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn first_token_is_immediate() {
        let start = Instant::now();
        let mut stream = Box::pin(token_stream(StreamSettings::default()));

        assert_eq!(stream.next().await, Some(Event::token(1)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn zero_tokens_yields_only_done() {
        let settings = StreamSettings::new(0, Duration::from_secs(1));
        let events: Vec<Event> = token_stream(settings).collect().await;
        assert_eq!(events, vec![Event::done(0)]);
    }
}
