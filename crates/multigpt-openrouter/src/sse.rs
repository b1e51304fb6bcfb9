//! SSE stream parser for streamed chat completions.
//!
//! The response body is cut into raw SSE frames first. Frames that are not
//! valid UTF-8 are logged and dropped there, so `eventsource-stream` only ever
//! sees decodable text. A `[DONE]` payload ends the stream; payloads that fail
//! to decode are logged and skipped.

use eventsource_stream::{EventStreamError, Eventsource};
use futures::future;
use futures::stream::{self, StreamExt};
use multigpt_core::{ChunkStream, MultigptError};
use tracing::{debug, warn};

use crate::types::ChatCompletionChunk;

/// Payload that terminates a completion stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What a single SSE event means for the caller.
#[derive(Debug)]
enum Frame {
    Text(String),
    Skip,
    Done,
    Failed(MultigptError),
}

/// Cuts a byte stream into SSE frames, each ending with its blank line.
///
/// Line endings may be `\n`, `\r\n` or `\r`. Frames that are not valid UTF-8
/// are dropped with a warning.
#[derive(Debug)]
struct FrameSplitter {
    buf: Vec<u8>,
    model: String,
}

impl FrameSplitter {
    fn new(model: String) -> Self {
        Self {
            buf: Vec::new(),
            model,
        }
    }

    /// Buffers `chunk` and returns every frame it completes.
    fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(end) = frame_end(&self.buf) {
            let frame: Vec<u8> = self.buf.drain(..end).collect();
            if let Some(frame) = self.keep_decodable(frame) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Returns whatever is left once the body has ended.
    fn finish(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        self.keep_decodable(rest)
    }

    fn keep_decodable(&self, frame: Vec<u8>) -> Option<Vec<u8>> {
        match std::str::from_utf8(&frame) {
            Ok(_) => Some(frame),
            Err(e) => {
                warn!(model = %self.model, error = %e, "stream frame is not valid UTF-8, skipping");
                None
            }
        }
    }
}

/// Index just past the blank line that closes the first complete frame.
///
/// A trailing `\r` is not treated as a line end until the next byte is
/// known, since it may be the first half of `\r\n`.
fn frame_end(buf: &[u8]) -> Option<usize> {
    let mut line_start = 0;
    let mut i = 0;
    while i < buf.len() {
        match buf[i] {
            b'\n' | b'\r' => {
                let mut end = i + 1;
                if buf[i] == b'\r' {
                    match buf.get(end) {
                        Some(b'\n') => end += 1,
                        Some(_) => {}
                        None => return None,
                    }
                }
                if i == line_start {
                    return Some(end);
                }
                line_start = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    None
}

/// Parses a streaming response into a [`ChunkStream`] of text increments.
///
/// Increments are yielded in upstream order. A transport error is yielded
/// once as `Err` and ends the stream; undecodable frames never do.
pub fn parse_sse_stream(response: reqwest::Response, model: String) -> ChunkStream {
    let frames = response
        .bytes_stream()
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .scan(FrameSplitter::new(model.clone()), |splitter, item| {
            let out: Vec<Result<Vec<u8>, reqwest::Error>> = match item {
                Some(Ok(chunk)) => splitter.push(&chunk).into_iter().map(Ok).collect(),
                Some(Err(e)) => vec![Err(e)],
                None => splitter.finish().into_iter().map(Ok).collect(),
            };
            future::ready(Some(stream::iter(out)))
        })
        .flatten();

    let chunks = frames
        .eventsource()
        .map(move |result| match result {
            Ok(event) => decode_frame(&event.data, &model),
            Err(EventStreamError::Transport(e)) => Frame::Failed(MultigptError::Transport {
                message: format!("SSE stream error: {e}"),
                source: Some(Box::new(e)),
            }),
            Err(e) => {
                warn!(model = %model, error = %e, "undecodable stream frame, skipping");
                Frame::Skip
            }
        })
        .scan(false, |finished, frame| {
            if *finished {
                return future::ready(None);
            }
            let item = match frame {
                Frame::Done => None,
                Frame::Failed(err) => {
                    *finished = true;
                    Some(Some(Err(err)))
                }
                Frame::Text(text) => Some(Some(Ok(text))),
                Frame::Skip => Some(None),
            };
            future::ready(item)
        })
        .filter_map(future::ready);

    Box::pin(chunks)
}

fn decode_frame(data: &str, model: &str) -> Frame {
    let payload = data.trim();
    if payload == DONE_SENTINEL {
        debug!(model, "stream finished");
        return Frame::Done;
    }
    if payload.is_empty() {
        return Frame::Skip;
    }

    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => {
            if let Some(error) = &chunk.error {
                warn!(
                    model,
                    message = error.message.as_deref().unwrap_or("<none>"),
                    "upstream reported an error inside the stream, skipping frame"
                );
                return Frame::Skip;
            }
            match chunk.text() {
                Some(text) => Frame::Text(text.to_string()),
                None => Frame::Skip,
            }
        }
        Err(e) => {
            warn!(model, error = %e, "failed to parse stream frame, skipping");
            Frame::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    /// Serve a raw SSE body through wiremock to get a real `reqwest::Response`.
    async fn mock_sse_response(body: Vec<u8>) -> reqwest::Response {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        reqwest::get(&server.uri()).await.unwrap()
    }

    async fn collect_bytes(body: Vec<u8>) -> Vec<String> {
        let response = mock_sse_response(body).await;
        parse_sse_stream(response, "test-model".into())
            .try_collect()
            .await
            .unwrap()
    }

    async fn collect(sse_text: &str) -> Vec<String> {
        collect_bytes(sse_text.as_bytes().to_vec()).await
    }

    fn split_all(chunks: &[&[u8]]) -> Vec<String> {
        let mut splitter = FrameSplitter::new("m".into());
        let mut frames: Vec<Vec<u8>> = Vec::new();
        for chunk in chunks {
            frames.extend(splitter.push(chunk));
        }
        frames.extend(splitter.finish());
        frames
            .into_iter()
            .map(|f| String::from_utf8(f).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn yields_content_deltas_in_order() {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        assert_eq!(collect(sse).await, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn done_sentinel_stops_before_trailing_frames() {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n",
        );
        assert_eq!(collect(sse).await, vec!["a"]);
    }

    #[tokio::test]
    async fn malformed_frame_is_skipped() {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"one\"}}]}\n\n",
            "data: {not json at all\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        assert_eq!(collect(sse).await, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn invalid_utf8_frame_is_skipped() {
        let mut body = b"data: {\"choices\":[{\"delta\":{\"content\":\"one\"}}]}\n\n".to_vec();
        body.extend_from_slice(b"data: {\"choices\":[{\"delta\":{\"content\":\"");
        body.extend_from_slice(&[0xff, 0xfe]);
        body.extend_from_slice(b"\"}}]}\n\n");
        body.extend_from_slice(b"data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n\n");
        body.extend_from_slice(b"data: [DONE]\n\n");

        assert_eq!(collect_bytes(body).await, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn crlf_framed_stream_is_decoded() {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\r\n\r\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\r\n\r\n",
            "data: [DONE]\r\n\r\n",
        );
        assert_eq!(collect(sse).await, vec!["a", "b"]);
    }

    #[test]
    fn splitter_joins_frames_across_chunks() {
        let frames = split_all(&[b"data: he", b"llo\n", b"\ndata: x\r", b"\n\r\n"]);
        assert_eq!(frames, vec!["data: hello\n\n", "data: x\r\n\r\n"]);
    }

    #[test]
    fn splitter_keeps_multibyte_char_split_across_chunks() {
        let text = "data: 中文\n\n".as_bytes();
        let (head, tail) = text.split_at(7);
        assert_eq!(split_all(&[head, tail]), vec!["data: 中文\n\n"]);
    }

    #[test]
    fn splitter_drops_invalid_utf8_frame_only() {
        let frames = split_all(&[b"data: a\n\ndata: \xff\n\ndata: b\n\n"]);
        assert_eq!(frames, vec!["data: a\n\n", "data: b\n\n"]);
    }

    #[test]
    fn splitter_flushes_unterminated_tail() {
        assert_eq!(split_all(&[b"data: a\n\ndata: tail"]), vec!["data: a\n\n", "data: tail"]);
        assert!(split_all(&[b""]).is_empty());
    }

    #[tokio::test]
    async fn comments_and_empty_deltas_are_ignored() {
        let sse = concat!(
            ": OPENROUTER PROCESSING\n\n",
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        assert_eq!(collect(sse).await, vec!["x"]);
    }

    #[tokio::test]
    async fn in_band_error_frame_is_skipped() {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
            "data: {\"error\":{\"message\":\"provider hiccup\"}}\n\n",
            "data: [DONE]\n\n",
        );
        assert_eq!(collect(sse).await, vec!["ok"]);
    }

    #[tokio::test]
    async fn stream_without_sentinel_ends_at_eof() {
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}\n\n";
        assert_eq!(collect(sse).await, vec!["tail"]);
    }

    #[test]
    fn decode_frame_classifies_payloads() {
        assert!(matches!(decode_frame("[DONE]", "m"), Frame::Done));
        assert!(matches!(decode_frame("  ", "m"), Frame::Skip));
        assert!(matches!(decode_frame("nope", "m"), Frame::Skip));
        match decode_frame(r#"{"choices":[{"delta":{"content":"z"}}]}"#, "m") {
            Frame::Text(t) => assert_eq!(t, "z"),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
