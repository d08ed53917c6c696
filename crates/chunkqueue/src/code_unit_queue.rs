//! Fixed-width code units over a chunked byte stream.
//!
//! A code unit is `unit_length` consecutive bytes packed most-significant
//! byte first into a `u64`. Unit boundaries are measured from the current
//! begin, not from the start of any chunk, so a unit may straddle any number
//! of chunk boundaries. Every pop re-anchors the unit grid at the new begin,
//! including a pop that ends inside a partially buffered unit. Cursors only
//! ever rest on unit boundaries:
//! a step that cannot reach the next boundary with the bytes currently
//! buffered leaves the cursor where it was and reports `false`.

use alloc::vec::Vec;

use bytes::Bytes;

use crate::{
    chunk_queue::{ChunkCursor, ChunkQueue},
    cursor::Cursor,
    error::QueueError,
    options::CodeUnitOptions,
};

/// A queue of fixed-width code units.
///
/// ```rust
/// use chunkqueue::{CodeUnitQueue, Cursor};
///
/// let mut queue = CodeUnitQueue::with_unit_length(2)?;
/// queue.push(vec![0x00_u8, 0x01, 0x00]);
/// queue.push(vec![0x02_u8]);
///
/// let mut cursor = queue.begin();
/// assert_eq!(cursor.value(&queue)?, Some(1));
/// assert!(cursor.step(&queue)?);
/// assert_eq!(cursor.value(&queue)?, Some(2));
/// assert!(cursor.step(&queue)?);
/// assert!(cursor.is_end(&queue)?);
/// # Ok::<(), chunkqueue::QueueError>(())
/// ```
#[derive(Debug)]
pub struct CodeUnitQueue {
    chunks: ChunkQueue,
    unit_length: usize,
}

/// A cursor over a [`CodeUnitQueue`], always resting on a unit boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnitCursor {
    inner: ChunkCursor,
}

impl CodeUnitCursor {
    /// Absolute byte offset since the start of the stream.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.inner.absolute
    }
}

impl Default for CodeUnitQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeUnitQueue {
    /// Creates an empty queue of single-byte units.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: ChunkQueue::new(),
            unit_length: CodeUnitOptions::default().unit_length,
        }
    }

    /// Creates an empty queue configured by `options`.
    ///
    /// # Errors
    ///
    /// Fails with [`QueueError::InvalidArgument`] unless the unit length is in
    /// `1..=8`.
    pub fn with_options(options: CodeUnitOptions) -> Result<Self, QueueError> {
        let options = options.validate()?;
        Ok(Self {
            chunks: ChunkQueue::new(),
            unit_length: options.unit_length,
        })
    }

    /// Creates an empty queue of `unit_length`-byte units.
    ///
    /// # Errors
    ///
    /// Fails with [`QueueError::InvalidArgument`] unless `unit_length` is in
    /// `1..=8`.
    pub fn with_unit_length(unit_length: usize) -> Result<Self, QueueError> {
        Self::with_options(CodeUnitOptions { unit_length })
    }

    /// Width of one unit in bytes.
    #[must_use]
    pub fn unit_length(&self) -> usize {
        self.unit_length
    }

    /// Appends a chunk at the tail. Empty chunks are ignored.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        self.chunks.push(chunk);
    }

    /// A fresh cursor at the first unconsumed unit.
    #[must_use]
    pub fn begin(&self) -> CodeUnitCursor {
        CodeUnitCursor {
            inner: self.chunks.begin(),
        }
    }

    /// A fresh cursor one past the last pushed byte.
    ///
    /// When the buffered length is not a whole number of units, the end
    /// cursor is the one cursor that does not rest on a unit boundary; it
    /// becomes one again once the unit is completed by a later push.
    #[must_use]
    pub fn end(&self) -> CodeUnitCursor {
        CodeUnitCursor {
            inner: self.chunks.end(),
        }
    }

    /// Consumes everything buffered.
    pub fn pop(&mut self) -> Vec<Bytes> {
        self.chunks.pop()
    }

    /// Consumes every byte before `cursor`. See [`ChunkQueue::pop_to`].
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or was issued by another queue.
    pub fn pop_to(&mut self, cursor: &mut CodeUnitCursor) -> Result<Vec<Bytes>, QueueError> {
        self.chunks.pop_to(&mut cursor.inner)
    }

    /// The views [`pop_to`](Self::pop_to) would return, without consuming.
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or was issued by another queue.
    pub fn views_to(&self, cursor: &CodeUnitCursor) -> Result<Vec<Bytes>, QueueError> {
        self.chunks.views_to(&cursor.inner)
    }

    /// Number of unconsumed bytes (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The current version. Bumped by every pop.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.chunks.version()
    }

    /// Whether `cursor` rests on a unit boundary, counted from begin.
    ///
    /// Only the end cursor of a queue holding a trailing partial unit is not
    /// on a boundary.
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or was issued by another queue.
    pub fn is_boundary(&self, cursor: &CodeUnitCursor) -> Result<bool, QueueError> {
        self.check(cursor)?;
        Ok(self.phase(&cursor.inner) == 0)
    }

    pub(crate) fn check(&self, cursor: &CodeUnitCursor) -> Result<(), QueueError> {
        self.chunks.check(&cursor.inner)
    }

    /// Bytes between the last unit boundary at or before `cursor` and
    /// `cursor` itself.
    fn phase(&self, cursor: &ChunkCursor) -> usize {
        (cursor.absolute - self.chunks.consumed()) % self.unit_length
    }

    /// Packs the unit at `cursor`, or `None` at the end.
    fn unit_at(&self, cursor: &ChunkCursor) -> Result<Option<u64>, QueueError> {
        let Some(first) = self.chunks.byte_at(cursor) else {
            return Ok(None);
        };
        let mut value = u64::from(first);
        if self.unit_length == 1 {
            return Ok(Some(value));
        }
        let mut probe = cursor.clone();
        for available in 1..self.unit_length {
            self.chunks.forward(&mut probe, 1);
            let Some(byte) = self.chunks.byte_at(&probe) else {
                return Err(QueueError::Starved {
                    needed: self.unit_length,
                    available,
                });
            };
            value = (value << 8) | u64::from(byte);
        }
        Ok(Some(value))
    }
}

impl Cursor<CodeUnitQueue> for CodeUnitCursor {
    type Value = u64;

    fn is_begin(&self, queue: &CodeUnitQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        Ok(queue.chunks.is_begin_position(&self.inner))
    }

    fn is_end(&self, queue: &CodeUnitQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        Ok(queue.chunks.is_end_position(&self.inner))
    }

    fn value(&self, queue: &CodeUnitQueue) -> Result<Option<u64>, QueueError> {
        queue.check(self)?;
        queue.unit_at(&self.inner)
    }

    fn step(&mut self, queue: &CodeUnitQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        let want = queue.unit_length - queue.phase(&self.inner);
        let mut probe = self.inner.clone();
        if queue.chunks.forward(&mut probe, want) < want {
            return Ok(false);
        }
        self.inner = probe;
        Ok(true)
    }

    fn step_back(&mut self, queue: &CodeUnitQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        let want = match queue.phase(&self.inner) {
            0 => queue.unit_length,
            partial => partial,
        };
        let mut probe = self.inner.clone();
        if queue.chunks.backward(&mut probe, want) < want {
            return Ok(false);
        }
        self.inner = probe;
        Ok(true)
    }
}
