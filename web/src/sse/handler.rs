use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use log::*;
use service::AppState;
use sse::message::{into_sse_event, Event as TokenEvent};
use sse::{token_stream, StreamId};
use std::convert::Infallible;

/// Logs when a stream is dropped before its `done` event went out. A client
/// disconnect surfaces this way, as does an aborted encode.
struct StreamLog {
    stream_id: StreamId,
    finished: bool,
}

impl Drop for StreamLog {
    fn drop(&mut self) {
        if !self.finished {
            info!("SSE stream {} closed before completion", self.stream_id);
        }
    }
}

/// GET a demo stream of numbered tokens
///
/// Emits `token` events one interval apart followed by a single `done` event,
/// then closes the response.
#[utoipa::path(
    get,
    path = "/stream",
    responses(
        (status = 200, description = "Numbered tokens as server-sent events, terminated by a done event", body = String, content_type = "text/event-stream"),
    )
)]
pub async fn token_stream_handler(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream_id = StreamId::new();
    let settings = app_state.stream_settings();

    info!(
        "Opening SSE stream {stream_id} ({} tokens, {:?} apart)",
        settings.token_count, settings.token_interval
    );

    let stream = relay(stream_id, token_stream(settings), into_sse_event);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Encodes generator events into SSE frames. The first encode failure ends
/// the stream without marking it finished.
fn relay<S, F>(
    stream_id: StreamId,
    events: S,
    encode: F,
) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: Stream<Item = TokenEvent>,
    F: Fn(&TokenEvent) -> Result<Event, sse::Error>,
{
    stream! {
        let mut stream_log = StreamLog { stream_id: stream_id.clone(), finished: false };
        let mut events = Box::pin(events);

        while let Some(event) = events.next().await {
            match encode(&event) {
                Ok(sse_event) => {
                    yield Ok::<_, Infallible>(sse_event);
                }
                Err(e) => {
                    error!("SSE stream {stream_id} aborted: {e}");
                    return;
                }
            }
        }

        stream_log.finished = true;
        info!("SSE stream {stream_id} finished");
    }
}
