//! Line framing for fragments that do not respect line boundaries.

/// Buffers incoming fragments and releases only complete lines.
///
/// The text after the last newline is the pending tail: it may still be
/// growing, so it is held back until a later fragment terminates it or the
/// stream is finalized. Only the tail is ever rescanned, never text that was
/// already released.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    /// Incomplete last line
    tail: String,

    decoder: Utf8Decoder,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment, returning the lines it completed.
    pub fn ingest(&mut self, fragment: &str) -> Vec<String> {
        let Some(last_nl) = fragment.rfind('\n') else {
            self.tail.push_str(fragment);
            return Vec::new();
        };

        let mut complete = std::mem::take(&mut self.tail);
        complete.push_str(&fragment[..last_nl]);
        self.tail.push_str(&fragment[last_nl + 1..]);

        complete.split('\n').map(strip_cr).collect()
    }

    /// Append raw transport bytes, decoding UTF-8 in streaming mode.
    pub fn ingest_bytes(&mut self, bytes: &[u8]) -> Vec<String> {
        let decoded = self.decoder.decode(bytes);
        self.ingest(&decoded)
    }

    /// The incomplete line currently held back.
    pub fn pending_tail(&self) -> &str {
        &self.tail
    }

    /// End of stream: release the pending tail as a final line, even if empty.
    pub fn finalize(&mut self) -> String {
        let rest = self.decoder.finish();
        self.tail.push_str(&rest);
        strip_cr(std::mem::take(&mut self.tail).as_str())
    }
}

/// Streaming UTF-8 decoder.
///
/// A multi-byte sequence cut off at the end of one fragment is completed by
/// the next. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Start of a sequence split across fragments
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut decoded = String::new();
        let mut consumed = 0;
        loop {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    decoded.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    // valid_up_to guarantees this prefix is well formed
                    decoded.push_str(&String::from_utf8_lossy(
                        &self.pending[consumed..consumed + valid_len],
                    ));
                    consumed += valid_len;

                    match err.error_len() {
                        Some(bad) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            consumed += bad;
                        }
                        // incomplete sequence at the end, wait for more
                        None => break,
                    }
                }
            }
        }
        self.pending.drain(..consumed);

        decoded
    }

    /// End of input: an unfinished sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        let rest = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&rest).into_owned()
    }
}

fn strip_cr(line: &str) -> String {
    line.strip_suffix('\r').unwrap_or(line).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_is_held_back() {
        let mut acc = ChunkAccumulator::new();
        assert!(acc.ingest("Hel").is_empty());
        assert_eq!(acc.ingest("lo\nwor"), vec!["Hello".to_string()]);
        assert_eq!(acc.pending_tail(), "wor");
        assert_eq!(acc.finalize(), "wor");
    }

    #[test]
    fn test_multiple_lines_in_one_fragment() {
        let mut acc = ChunkAccumulator::new();
        let lines = acc.ingest("a\nb\n\nc\n");
        assert_eq!(lines, vec!["a", "b", "", "c"]);
        assert_eq!(acc.finalize(), "");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let mut acc = ChunkAccumulator::new();
        assert_eq!(acc.ingest("one\r"), Vec::<String>::new());
        assert_eq!(acc.ingest("\ntwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn test_split_utf8_sequence() {
        let mut acc = ChunkAccumulator::new();
        let bytes = "héllo\n".as_bytes();
        // 'é' is two bytes; cut between them
        assert!(acc.ingest_bytes(&bytes[..2]).is_empty());
        assert_eq!(acc.ingest_bytes(&bytes[2..]), vec!["héllo"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut acc = ChunkAccumulator::new();
        let lines = acc.ingest_bytes(b"a\xffb\n");
        assert_eq!(lines, vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_finalize_flushes_incomplete_sequence() {
        let mut acc = ChunkAccumulator::new();
        acc.ingest_bytes(&[b'x', 0xE2, 0x82]);
        assert_eq!(acc.finalize(), "x\u{FFFD}");
    }
}
