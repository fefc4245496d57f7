//! Response accumulation.
//!
//! [`PendingResponse`] is the per-request body accumulator: it grows by one
//! fragment at a time and is released (reset to empty) when the request
//! terminates for any reason. Growth failures surface as a result instead of
//! aborting the process, so one oversized response cannot take the device
//! down.

use std::borrow::Cow;

/// Growable buffer collecting streamed body fragments for one request.
#[derive(Debug, Default)]
pub(crate) struct PendingResponse {
    data: Vec<u8>,
    limit: Option<usize>,
}

impl PendingResponse {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Accumulator that refuses to grow past `limit` bytes.
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Append one fragment, preserving arrival order.
    ///
    /// Fails (and releases the partial buffer) if the configured size limit
    /// would be exceeded or the allocation cannot be satisfied.
    pub(crate) fn append(&mut self, fragment: &[u8]) -> Result<(), BufferExhausted> {
        if fragment.is_empty() {
            return Ok(());
        }
        let over_limit = self
            .limit
            .is_some_and(|limit| self.data.len().saturating_add(fragment.len()) > limit);
        if over_limit || self.data.try_reserve(fragment.len()).is_err() {
            self.release();
            return Err(BufferExhausted);
        }
        self.data.extend_from_slice(fragment);
        Ok(())
    }

    /// Drop any accumulated data, returning the buffer to its initial empty
    /// state. The size limit survives the release.
    pub(crate) fn release(&mut self) {
        self.data = Vec::new();
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Move the accumulated body out, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

/// Allocation failure while accumulating a response; fatal to the request
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BufferExhausted;

/// A completed exchange: status, reported length, and the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    content_length: Option<u64>,
    body: Vec<u8>,
}

impl Response {
    pub(crate) fn new(status_code: u16, content_length: Option<u64>, body: Vec<u8>) -> Self {
        Self {
            status_code,
            content_length,
            body,
        }
    }

    /// HTTP status code of the final response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// `Content-Length` as reported by the server, when present.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// The accumulated body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Total accumulated body length.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut pending = PendingResponse::new();
        pending.append(b"He").unwrap();
        pending.append(b"llo").unwrap();
        assert_eq!(pending.len(), 5);
        assert_eq!(pending.take(), b"Hello");
    }

    #[test]
    fn test_empty_fragment_is_a_no_op() {
        let mut pending = PendingResponse::new();
        pending.append(b"").unwrap();
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_release_resets_to_empty() {
        let mut pending = PendingResponse::new();
        pending.append(b"partial data").unwrap();
        pending.release();
        assert_eq!(pending.len(), 0);
        assert!(pending.take().is_empty());
    }

    #[test]
    fn test_take_leaves_buffer_empty() {
        let mut pending = PendingResponse::new();
        pending.append(b"abc").unwrap();
        assert_eq!(pending.take(), b"abc");
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_limit_rejects_overflowing_fragment_and_releases() {
        let mut pending = PendingResponse::with_limit(4);
        pending.append(b"ab").unwrap();
        assert_eq!(pending.append(b"cde"), Err(BufferExhausted));
        // The partial buffer is gone, not truncated.
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_limit_allows_an_exact_fit() {
        let mut pending = PendingResponse::with_limit(4);
        pending.append(b"ab").unwrap();
        pending.append(b"cd").unwrap();
        assert_eq!(pending.take(), b"abcd");
    }

    #[test]
    fn test_response_text_lossy() {
        let response = Response::new(200, Some(5), vec![b'o', b'k', 0xff]);
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.content_length(), Some(5));
        assert_eq!(response.text(), "ok\u{fffd}");
    }

    #[test]
    fn test_response_len() {
        let response = Response::new(204, None, Vec::new());
        assert!(response.is_empty());
        assert_eq!(response.len(), 0);
    }
}
