//! Ollama NDJSON chat stream to [`StreamEvent`] adapter.
//!
//! Ollama streams one JSON object per line. Network chunks do not align
//! with lines, so bytes are buffered until a newline arrives.

use futures_util::{Stream, StreamExt};

use docmind_core::llm::provider::EventStream;
use docmind_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::ChatChunk;

pub(crate) fn stop_reason(done_reason: Option<&str>) -> StopReason {
    match done_reason {
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

/// Events for one decoded line. Returns `true` once the final line is seen.
fn line_events(line: &str, out: &mut Vec<StreamEvent>) -> Result<bool, LlmError> {
    let chunk: ChatChunk =
        serde_json::from_str(line).map_err(|e| LlmError::Deserialization(e.to_string()))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::Stream(error));
    }

    if let Some(message) = chunk.message.filter(|m| !m.content.is_empty()) {
        out.push(StreamEvent::TextDelta {
            text: message.content,
        });
    }

    if chunk.done {
        out.push(StreamEvent::MessageDelta {
            stop_reason: stop_reason(chunk.done_reason.as_deref()),
        });
        out.push(StreamEvent::Usage(Usage {
            input_tokens: chunk.prompt_eval_count.unwrap_or(0),
            output_tokens: chunk.eval_count.unwrap_or(0),
        }));
    }

    Ok(chunk.done)
}

/// Map a raw response body stream to provider-agnostic events, ending with `Done`.
pub fn map_ndjson_stream<S, B, E>(bytes: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer: Vec<u8> = Vec::new();
        let mut finished = false;

        while let Some(item) = bytes.next().await {
            let data = item.map_err(|e| LlmError::Stream(e.to_string()))?;
            buffer.extend_from_slice(data.as_ref());

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let mut events = Vec::new();
                finished = line_events(line, &mut events)?;
                for event in events {
                    yield event;
                }
                if finished {
                    break;
                }
            }

            if finished {
                break;
            }
        }

        // A last line without a trailing newline.
        let rest = String::from_utf8_lossy(&buffer).trim().to_string();
        if !finished && !rest.is_empty() {
            let mut events = Vec::new();
            line_events(&rest, &mut events)?;
            for event in events {
                yield event;
            }
        }

        yield StreamEvent::Done;
    })
}
