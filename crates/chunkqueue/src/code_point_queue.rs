//! Variable-width code points decoded from a [`CodeUnitQueue`].
//!
//! A code point cursor wraps a code unit cursor and only rests where the
//! policy reports a boundary. One step may cross several units; if no
//! boundary can be reached with the data buffered so far, the cursor is left
//! untouched.
//!
//! Pushing is boundary-relevant at this layer. Each push bumps a revision,
//! and a cursor issued under an older revision is re-checked on its next use:
//! it survives if it still rests on begin or on a boundary, and is otherwise
//! reported stale. This catches, for instance, an end cursor taken while a
//! code point was half buffered, which a push would leave inside that code
//! point.

use alloc::string::String;

use bytes::Bytes;
use log::{debug, trace};

use crate::{
    code_unit_queue::{CodeUnitCursor, CodeUnitQueue},
    cursor::Cursor,
    error::QueueError,
    policy::{CodePointPolicy, FnPolicy},
};

/// A queue of decoded code points.
#[derive(Debug)]
pub struct CodePointQueue<P> {
    units: CodeUnitQueue,
    policy: P,
    revision: u64,
}

/// A cursor over a [`CodePointQueue`], resting on code point boundaries.
#[derive(Debug, Clone)]
pub struct CodePointCursor {
    inner: CodeUnitCursor,
    revision: u64,
}

impl PartialEq for CodePointCursor {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for CodePointCursor {}

impl CodePointCursor {
    /// The underlying unit cursor.
    #[must_use]
    pub fn units(&self) -> &CodeUnitCursor {
        &self.inner
    }

    /// Absolute byte offset since the start of the stream.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.inner.offset()
    }
}

impl<P: CodePointPolicy> CodePointQueue<P> {
    /// Wraps `units`, decoding with `policy`.
    pub fn new(units: CodeUnitQueue, policy: P) -> Self {
        Self {
            units,
            policy,
            revision: 0,
        }
    }

    /// Creates an empty queue over `unit_length`-byte units.
    ///
    /// # Errors
    ///
    /// Fails with [`QueueError::InvalidArgument`] unless `unit_length` is in
    /// `1..=8`.
    pub fn with_unit_length(unit_length: usize, policy: P) -> Result<Self, QueueError> {
        Ok(Self::new(CodeUnitQueue::with_unit_length(unit_length)?, policy))
    }

    /// Appends a chunk at the tail and bumps the revision.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        self.units.push(chunk);
        self.revision += 1;
        trace!("code point queue revision {}", self.revision);
    }

    /// A fresh cursor at the first unconsumed code point.
    #[must_use]
    pub fn begin(&self) -> CodePointCursor {
        self.wrap(self.units.begin())
    }

    /// A fresh cursor one past the last pushed byte.
    #[must_use]
    pub fn end(&self) -> CodePointCursor {
        self.wrap(self.units.end())
    }

    /// Consumes and decodes everything buffered.
    ///
    /// # Errors
    ///
    /// Propagates a [`decode_string`](CodePointPolicy::decode_string) failure,
    /// in which case nothing is consumed.
    pub fn read(&mut self) -> Result<String, QueueError> {
        let mut end = self.end();
        self.read_to(&mut end)
    }

    /// Consumes every byte before `cursor` and returns it decoded as text.
    ///
    /// The data is decoded before it is consumed, so a decoding failure
    /// leaves the queue and `cursor` untouched. On success `cursor` rests on
    /// the new begin and every other cursor is invalidated.
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or foreign, or if decoding fails.
    pub fn read_to(&mut self, cursor: &mut CodePointCursor) -> Result<String, QueueError> {
        self.validate(cursor)?;
        let views = self.units.views_to(&cursor.inner)?;
        let text = self.policy.decode_string(&views)?;
        self.consume(cursor)?;
        debug!("read {} bytes as {} chars", byte_len(&views), text.chars().count());
        Ok(text)
    }

    /// Consumes everything buffered without decoding it.
    pub fn ignore(&mut self) {
        self.units.pop();
    }

    /// Consumes every byte before `cursor` without decoding it.
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or foreign.
    pub fn ignore_to(&mut self, cursor: &mut CodePointCursor) -> Result<(), QueueError> {
        self.validate(cursor)?;
        self.consume(cursor)
    }

    /// The unit source.
    #[must_use]
    pub fn units(&self) -> &CodeUnitQueue {
        &self.units
    }

    /// The decoding policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of unconsumed bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The current version. Bumped by every read or ignore.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.units.version()
    }

    /// The current revision. Bumped by every push.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn wrap(&self, inner: CodeUnitCursor) -> CodePointCursor {
        CodePointCursor {
            inner,
            revision: self.revision,
        }
    }

    fn consume(&mut self, cursor: &mut CodePointCursor) -> Result<(), QueueError> {
        self.units.pop_to(&mut cursor.inner)?;
        cursor.revision = self.revision;
        Ok(())
    }

    fn at_boundary(&self, at: &CodeUnitCursor) -> Result<bool, QueueError> {
        Ok(at.is_begin(&self.units)? || self.policy.is_aligned(&self.units, at)?)
    }

    fn validate(&self, cursor: &CodePointCursor) -> Result<(), QueueError> {
        self.units.check(&cursor.inner)?;
        if cursor.revision != self.revision && !self.at_boundary(&cursor.inner)? {
            trace!(
                "cursor at offset {} left inside a code point by a push",
                cursor.inner.offset()
            );
            return Err(QueueError::StaleCursor);
        }
        Ok(())
    }

    /// Steps `cursor` with `step` until it reaches a boundary. `cursor` is
    /// only written on success.
    fn hop<F>(&self, cursor: &mut CodePointCursor, mut step: F) -> Result<bool, QueueError>
    where
        F: FnMut(&mut CodeUnitCursor, &CodeUnitQueue) -> Result<bool, QueueError>,
    {
        self.validate(cursor)?;
        cursor.revision = self.revision;
        let mut probe = cursor.inner.clone();
        loop {
            if !step(&mut probe, &self.units)? {
                return Ok(false);
            }
            if self.at_boundary(&probe)? {
                cursor.inner = probe;
                return Ok(true);
            }
        }
    }
}

impl<A, D, S, V> CodePointQueue<FnPolicy<A, D, S, V>>
where
    A: Fn(&CodeUnitQueue, &CodeUnitCursor) -> Result<bool, QueueError>,
    D: Fn(&CodeUnitQueue, &CodeUnitCursor) -> Result<V, QueueError>,
    S: Fn(&[Bytes]) -> Result<String, QueueError>,
{
    /// Creates an empty queue decoding with three plain functions.
    ///
    /// # Errors
    ///
    /// Fails with [`QueueError::InvalidArgument`] unless `unit_length` is in
    /// `1..=8`.
    pub fn from_fns(
        unit_length: usize,
        is_aligned: A,
        decode_value: D,
        decode_string: S,
    ) -> Result<Self, QueueError> {
        Self::with_unit_length(
            unit_length,
            FnPolicy::new(is_aligned, decode_value, decode_string),
        )
    }
}

fn byte_len(views: &[Bytes]) -> usize {
    views.iter().map(Bytes::len).sum()
}

impl<P: CodePointPolicy> Cursor<CodePointQueue<P>> for CodePointCursor {
    type Value = P::Value;

    fn is_begin(&self, queue: &CodePointQueue<P>) -> Result<bool, QueueError> {
        queue.validate(self)?;
        self.inner.is_begin(&queue.units)
    }

    fn is_end(&self, queue: &CodePointQueue<P>) -> Result<bool, QueueError> {
        queue.validate(self)?;
        self.inner.is_end(&queue.units)
    }

    fn value(&self, queue: &CodePointQueue<P>) -> Result<Option<P::Value>, QueueError> {
        queue.validate(self)?;
        if self.inner.is_end(&queue.units)? {
            return Ok(None);
        }
        queue.policy.decode_value(&queue.units, &self.inner).map(Some)
    }

    fn step(&mut self, queue: &CodePointQueue<P>) -> Result<bool, QueueError> {
        queue.hop(self, CodeUnitCursor::step)
    }

    fn step_back(&mut self, queue: &CodePointQueue<P>) -> Result<bool, QueueError> {
        queue.hop(self, CodeUnitCursor::step_back)
    }
}
