use alloc::string::String;

use thiserror::Error;

/// Errors surfaced by queue and cursor operations.
///
/// Every failure is synchronous and propagated as-is. Only
/// [`QueueError::Starved`] is recoverable without re-acquiring a cursor: push
/// more data and retry the same operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// A precondition on an argument was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The cursor was issued by a different queue.
    #[error("cursor belongs to a different queue")]
    ForeignCursor,
    /// The owning queue was consumed from after the cursor was issued.
    #[error("cursor is invalid: queue was modified")]
    StaleCursor,
    /// Fewer bytes are buffered than the requested unit or point needs.
    #[error("not enough bytes to complete unit: needed {needed}, available {available}")]
    Starved {
        /// Bytes required from the cursor position.
        needed: usize,
        /// Bytes currently buffered from the cursor position.
        available: usize,
    },
    /// A caller-supplied decoding policy rejected the data.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Coarse classification of a [`QueueError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid input at the call site.
    Precondition,
    /// A cursor outlived the data it pointed into.
    Stale,
    /// Not enough data is buffered yet.
    Starvation,
    /// The injected decoding policy failed.
    Decode,
}

impl QueueError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueError::InvalidArgument(_) | QueueError::ForeignCursor => ErrorKind::Precondition,
            QueueError::StaleCursor => ErrorKind::Stale,
            QueueError::Starved { .. } => ErrorKind::Starvation,
            QueueError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Whether pushing more data and retrying the same call can succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Starvation
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString};

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(QueueError::InvalidArgument("x"), ErrorKind::Precondition)]
    #[case(QueueError::ForeignCursor, ErrorKind::Precondition)]
    #[case(QueueError::StaleCursor, ErrorKind::Stale)]
    #[case(QueueError::Starved { needed: 2, available: 1 }, ErrorKind::Starvation)]
    #[case(QueueError::Decode("bad".to_string()), ErrorKind::Decode)]
    fn classifies(#[case] err: QueueError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.is_recoverable(), kind == ErrorKind::Starvation);
    }

    #[test]
    fn messages() {
        insta::assert_snapshot!(
            format!("{}", QueueError::StaleCursor),
            @"cursor is invalid: queue was modified"
        );
        insta::assert_snapshot!(
            format!("{}", QueueError::Starved { needed: 4, available: 3 }),
            @"not enough bytes to complete unit: needed 4, available 3"
        );
        insta::assert_snapshot!(
            format!("{}", QueueError::InvalidArgument("unit length must be in 1..=8")),
            @"invalid argument: unit length must be in 1..=8"
        );
    }
}
