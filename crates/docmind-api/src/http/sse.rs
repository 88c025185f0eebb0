//! Server-Sent Events framing for streamed AI output.
//!
//! Each text chunk becomes `data: {"content":"..."}`. A successful stream
//! ends with `data: [DONE]`. A failure emits one
//! `data: {"error":"...","statusCode":N}` frame and ends without `[DONE]`.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures_util::{Stream, StreamExt};

use docmind_core::ai::failure::StreamFailure;
use docmind_core::ai::service::TextStream;
use docmind_types::ai::ErrorLocale;

const DONE: &str = "[DONE]";
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

fn content_event(content: &str) -> Event {
    Event::default().data(serde_json::json!({ "content": content }).to_string())
}

fn failure_event(failure: &StreamFailure) -> Event {
    Event::default().data(serde_json::to_string(failure).unwrap_or_default())
}

/// Turn a text stream into SSE frames.
pub fn frames(
    mut chunks: TextStream,
    locale: ErrorLocale,
) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    async_stream::stream! {
        let mut failed = false;

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(content) => yield Ok(content_event(&content)),
                Err(err) => {
                    let failure = StreamFailure::classify(&err, locale);
                    tracing::warn!(status = failure.status_code, error = %err, "Stream ended with error");
                    yield Ok(failure_event(&failure));
                    failed = true;
                    break;
                }
            }
        }

        if !failed {
            yield Ok(Event::default().data(DONE));
        }
    }
}

/// Wrap SSE frames in a response with periodic keep-alive comments.
pub fn into_sse<S>(events: S) -> Sse<KeepAliveStream<S>>
where
    S: Stream<Item = Result<Event, Infallible>> + Send + 'static,
{
    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}
