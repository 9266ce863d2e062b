use bytes::BytesMut;

use crate::request::Document;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Accumulates datagram payload bytes until they form one complete
/// JSON document.
///
/// `try_parse` returning `None` means the bytes seen so far do not yet
/// parse as a document; callers keep appending and retrying within
/// their time budget. A trailing newline from the peer is tolerated.
#[derive(Debug, Default)]
pub struct DocumentBuffer {
    buf: BytesMut,
}

impl DocumentBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Append freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Attempt to parse the accumulated bytes as one complete document.
    ///
    /// Partial or malformed content yields `None`; the buffer is left
    /// untouched either way so accumulation can continue.
    pub fn try_parse(&self) -> Option<Document> {
        if self.buf.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.buf).ok()
    }

    /// Number of accumulated bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discard all accumulated bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_incomplete() {
        let buf = DocumentBuffer::new();
        assert!(buf.try_parse().is_none());
    }

    #[test]
    fn truncated_document_is_incomplete() {
        let mut buf = DocumentBuffer::new();
        buf.extend(b"{\"result\":");
        assert!(buf.try_parse().is_none());
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn completing_a_fragment_parses() {
        let mut buf = DocumentBuffer::new();
        buf.extend(b"{\"result\":");
        assert!(buf.try_parse().is_none());

        buf.extend(b"[]}");
        let doc = buf.try_parse().expect("completed document should parse");
        assert_eq!(doc, serde_json::json!({"result": []}));
        assert_eq!(buf.len(), 13);
    }

    #[test]
    fn trailing_newline_tolerated() {
        let mut buf = DocumentBuffer::new();
        buf.extend(b"{\"result\":true}\n");
        assert!(buf.try_parse().is_some());
    }

    #[test]
    fn malformed_bytes_stay_incomplete() {
        let mut buf = DocumentBuffer::new();
        buf.extend(b"not json at all");
        assert!(buf.try_parse().is_none());
    }

    #[test]
    fn clear_discards_accumulation() {
        let mut buf = DocumentBuffer::new();
        buf.extend(b"{}");
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.try_parse().is_none());
    }
}
