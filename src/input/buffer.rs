//! Single-line edit buffer with append and remove-at-end semantics.

/// Bytes typed so far, optionally capped in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    bytes: Vec<u8>,
    limit: Option<usize>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer that silently refuses appends beyond `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(limit),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.bytes.len() >= limit)
    }

    /// True when the content is empty once surrounding whitespace is ignored.
    pub fn is_blank(&self) -> bool {
        self.bytes.iter().all(u8::is_ascii_whitespace)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Append a byte; returns false (and leaves the buffer alone) when full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.bytes.push(byte);
        true
    }

    /// Remove the last byte, if any.
    pub fn pop(&mut self) -> Option<u8> {
        self.bytes.pop()
    }

    /// Replace the whole content, truncating to the limit.
    pub fn replace(&mut self, content: &[u8]) {
        let keep = self
            .limit
            .map_or(content.len(), |limit| content.len().min(limit));
        self.bytes.clear();
        self.bytes.extend_from_slice(&content[..keep]);
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
