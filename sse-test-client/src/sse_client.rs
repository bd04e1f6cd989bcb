use anyhow::Result;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub id: Option<String>,
    pub data: Value,
    pub timestamp: Instant,
}

pub struct Connection {
    pub label: String,
    event_rx: mpsc::UnboundedReceiver<Event>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    /// Opens `GET {base_url}/stream`. Reconnects are disabled: the server closes
    /// the stream after its `done` event and a reconnect would replay the tokens.
    pub async fn establish(base_url: &str, label: String) -> Result<Self> {
        let url = format!("{}/stream", base_url.trim_end_matches('/'));
        let (tx, rx) = mpsc::unbounded_channel();

        let client = es::ClientBuilder::for_url(&url)?
            .header("Accept", "text/event-stream")?
            .reconnect(es::ReconnectOptions::reconnect(false).build())
            .build();

        let stream_label = label.clone();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => {
                        let data = match serde_json::from_str(&event.data) {
                            Ok(data) => data,
                            Err(e) => {
                                warn!("Non-JSON event on {}: {}", stream_label, e);
                                Value::String(event.data.clone())
                            }
                        };
                        let sse_event = Event {
                            event_type: event.event_type,
                            id: event.id,
                            data,
                            timestamp: Instant::now(),
                        };

                        if tx.send(sse_event).is_err() {
                            debug!("SSE receiver dropped for {}", stream_label);
                            break;
                        }
                    }
                    Some(Ok(es::SSE::Comment(_))) => {
                        // Ignore comments (keep-alive)
                    }
                    Some(Err(e)) => {
                        debug!("SSE stream for {} ended: {:?}", stream_label, e);
                        break;
                    }
                    None => {
                        debug!("SSE stream ended for {}", stream_label);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            label,
            event_rx: rx,
            _handle: handle,
        })
    }

    /// Collects events until a `done` event arrives (inclusive).
    pub async fn collect_until_done(&mut self, timeout: Duration) -> Result<Vec<Event>> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                anyhow::bail!("Timeout waiting for done event after {} events", events.len());
            }

            match tokio::time::timeout(remaining, self.event_rx.recv()).await {
                Ok(Some(event)) => {
                    let is_done = event.event_type == "done";
                    events.push(event);
                    if is_done {
                        return Ok(events);
                    }
                }
                Ok(None) => {
                    anyhow::bail!("SSE connection closed before done event");
                }
                Err(_) => {
                    anyhow::bail!("Timeout waiting for done event after {} events", events.len());
                }
            }
        }
    }
}
