//! Request sequencing for stale-response detection.
//!
//! Each logical operation stream (feed loads, suggestions, genre fetches)
//! owns a [`RequestSequence`]. Issuing a request hands out a
//! [`RequestToken`]; a response may only land while its token is still the
//! newest one issued. Nothing is cancelled on the wire; superseded responses
//! are simply dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new token, superseding every token issued before it.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_token_is_current() {
        let seq = RequestSequence::new();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn clones_share_the_same_counter() {
        let seq = RequestSequence::new();
        let token = seq.issue();
        seq.clone().issue();
        assert!(!seq.is_current(token));
    }
}
