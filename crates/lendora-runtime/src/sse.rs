//! Event-Stream Reassembly
//!
//! The gateway streams its reply as newline-delimited `data: <json>`
//! records, but the underlying HTTP reads arrive in arbitrary chunks: a
//! logical line may span several reads, and a read may end in the middle
//! of a JSON payload. [`EventBuffer`] absorbs raw byte chunks and yields
//! complete text deltas, never assuming a read boundary aligns with a
//! line boundary and never dropping a partial token.

use serde_json::Value;

/// Sentinel record that terminates the event stream
const DONE_SENTINEL: &str = "[DONE]";

/// Incremental parser for a `data:`-framed event stream.
///
/// Feed it raw chunks with [`EventBuffer::push_chunk`]; it returns the text
/// deltas completed by that chunk, in order. Rules:
///
/// - partial lines are buffered across chunks;
/// - a trailing `\r` is stripped from each line;
/// - blank lines and `:` comment/keep-alive lines are skipped;
/// - only `data: `-prefixed lines carry payloads;
/// - a literal `[DONE]` payload marks the end of the stream;
/// - a payload that fails to parse as JSON is treated as an incomplete
///   fragment: the line is pushed back (newline included) and parsing
///   pauses until more bytes arrive.
#[derive(Debug, Default)]
pub struct EventBuffer {
    buf: Vec<u8>,
    done: bool,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Absorb a raw chunk and return the text deltas it completed
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut deltas = Vec::new();

        if self.done {
            return deltas;
        }

        self.buf.extend_from_slice(chunk);

        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=newline).collect();
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            match self.parse_line(&line) {
                LineOutcome::Delta(text) => deltas.push(text),
                LineOutcome::Skip => {}
                LineOutcome::Done => {
                    self.done = true;
                    break;
                }
                LineOutcome::Incomplete => {
                    // Re-buffer the fragment and wait for more bytes.
                    let mut rebuffered = line;
                    rebuffered.push(b'\n');
                    rebuffered.extend_from_slice(&self.buf);
                    self.buf = rebuffered;
                    break;
                }
            }
        }

        deltas
    }

    fn parse_line(&self, line: &[u8]) -> LineOutcome {
        let Ok(line) = std::str::from_utf8(line) else {
            // A line split inside a multi-byte character; it will complete
            // once the remaining bytes arrive.
            return LineOutcome::Incomplete;
        };

        if line.trim().is_empty() || line.starts_with(':') {
            return LineOutcome::Skip;
        }
        let Some(payload) = line.strip_prefix("data: ") else {
            return LineOutcome::Skip;
        };

        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            return LineOutcome::Done;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(event) => {
                let content = event
                    .pointer("/choices/0/delta/content")
                    .and_then(Value::as_str);
                match content {
                    Some(text) if !text.is_empty() => LineOutcome::Delta(text.to_string()),
                    _ => LineOutcome::Skip,
                }
            }
            Err(_) => LineOutcome::Incomplete,
        }
    }
}

enum LineOutcome {
    Delta(String),
    Skip,
    Done,
    Incomplete,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_line(text: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    fn collect(buffer: &mut EventBuffer, chunks: &[&[u8]]) -> String {
        let mut out = String::new();
        for chunk in chunks {
            for delta in buffer.push_chunk(chunk) {
                out.push_str(&delta);
            }
        }
        out
    }

    #[test]
    fn test_single_chunk() {
        let stream = format!("{}{}data: [DONE]\n", event_line("Hello"), event_line(" world"));
        let mut buffer = EventBuffer::new();
        assert_eq!(collect(&mut buffer, &[stream.as_bytes()]), "Hello world");
        assert!(buffer.is_done());
    }

    #[test]
    fn test_split_at_every_byte_offset() {
        let stream = format!(
            ": keep-alive\n{}{}{}data: [DONE]\n",
            event_line("The "),
            event_line("loan "),
            event_line("is approved")
        );
        let bytes = stream.as_bytes();

        for split in 0..=bytes.len() {
            let mut buffer = EventBuffer::new();
            let text = collect(&mut buffer, &[&bytes[..split], &bytes[split..]]);
            assert_eq!(text, "The loan is approved", "split at byte {split}");
            assert!(buffer.is_done(), "split at byte {split}");
        }
    }

    #[test]
    fn test_partial_payload_reassembled_across_chunks() {
        // Chunk boundary lands inside the JSON payload; the fragment must
        // be held until the rest of the line arrives.
        let line = event_line("stitched");
        let (first, second) = line.split_at(line.len() / 2);

        let mut buffer = EventBuffer::new();
        assert!(buffer.push_chunk(first.as_bytes()).is_empty());
        let deltas = buffer.push_chunk(second.as_bytes());
        assert_eq!(deltas, vec!["stitched".to_string()]);
    }

    #[test]
    fn test_malformed_line_is_rebuffered_not_dropped() {
        // A newline-terminated line with unparseable JSON is held as an
        // incomplete fragment; the consumer must not panic or emit it.
        let mut buffer = EventBuffer::new();
        assert!(buffer.push_chunk(b"data: {\"choices\":[{\"del\n").is_empty());
        assert!(buffer.push_chunk(b"more bytes\n").is_empty());
        assert!(!buffer.is_done());
    }

    #[test]
    fn test_three_way_split_with_partial_json() {
        let stream = format!(
            "{}{}data: [DONE]\n",
            event_line("alpha "),
            event_line("beta")
        );
        let bytes = stream.as_bytes();
        // Boundaries chosen to land inside the second JSON payload.
        let a = bytes.len() / 3;
        let b = 2 * bytes.len() / 3;

        let mut buffer = EventBuffer::new();
        let text = collect(&mut buffer, &[&bytes[..a], &bytes[a..b], &bytes[b..]]);
        assert_eq!(text, "alpha beta");
        assert!(buffer.is_done());
    }

    #[test]
    fn test_crlf_and_comment_lines() {
        let stream = format!(
            ": ping\r\n\r\n{}\r\ndata: [DONE]\r\n",
            event_line("ok").trim_end()
        );
        let mut buffer = EventBuffer::new();
        assert_eq!(collect(&mut buffer, &[stream.as_bytes()]), "ok");
        assert!(buffer.is_done());
    }

    #[test]
    fn test_events_without_content_are_skipped() {
        let stream = "data: {\"choices\":[{\"delta\":{}}]}\ndata: [DONE]\n";
        let mut buffer = EventBuffer::new();
        assert!(buffer.push_chunk(stream.as_bytes()).is_empty());
        assert!(buffer.is_done());
    }

    #[test]
    fn test_nothing_emitted_after_done() {
        let mut buffer = EventBuffer::new();
        buffer.push_chunk(b"data: [DONE]\n");
        assert!(buffer.is_done());
        assert!(buffer.push_chunk(event_line("late").as_bytes()).is_empty());
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let line = event_line("caf\u{e9}");
        let bytes = line.as_bytes();
        // Split inside the two-byte UTF-8 encoding of 'é'.
        let split = line.find('\u{e9}').unwrap() + 1;

        let mut buffer = EventBuffer::new();
        let text = collect(&mut buffer, &[&bytes[..split], &bytes[split..]]);
        assert_eq!(text, "caf\u{e9}");
    }
}
