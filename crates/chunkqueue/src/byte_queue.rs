use alloc::vec::Vec;

use bytes::Bytes;

use crate::{
    chunk_queue::{ChunkCursor, ChunkQueue},
    cursor::Cursor,
    error::QueueError,
};

/// A byte-granular facade over a [`ChunkQueue`].
///
/// ```rust
/// use chunkqueue::{ByteQueue, Cursor};
///
/// let mut queue = ByteQueue::new();
/// queue.push(&b"Item0"[..]);
/// assert_eq!(queue.count(), 5);
/// assert_eq!(queue.begin().value(&queue)?, Some(b'I'));
///
/// assert_eq!(queue.pop(), [&b"Item0"[..]]);
/// assert_eq!(queue.count(), 0);
/// # Ok::<(), chunkqueue::QueueError>(())
/// ```
#[derive(Debug, Default)]
pub struct ByteQueue {
    chunks: ChunkQueue,
}

/// A cursor over a [`ByteQueue`] that moves one byte at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteCursor {
    inner: ChunkCursor,
}

impl ByteCursor {
    /// Absolute byte offset since the start of the stream.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.inner.absolute
    }
}

impl ByteQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk at the tail. Empty chunks are ignored.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        self.chunks.push(chunk);
    }

    /// A fresh cursor at the first unconsumed byte.
    #[must_use]
    pub fn begin(&self) -> ByteCursor {
        ByteCursor {
            inner: self.chunks.begin(),
        }
    }

    /// A fresh cursor one past the last pushed byte.
    #[must_use]
    pub fn end(&self) -> ByteCursor {
        ByteCursor {
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
    pub fn pop_to(&mut self, cursor: &mut ByteCursor) -> Result<Vec<Bytes>, QueueError> {
        self.chunks.pop_to(&mut cursor.inner)
    }

    /// Number of unconsumed bytes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The underlying chunk storage.
    #[must_use]
    pub fn chunks(&self) -> &ChunkQueue {
        &self.chunks
    }
}

impl Cursor<ByteQueue> for ByteCursor {
    type Value = u8;

    fn is_begin(&self, queue: &ByteQueue) -> Result<bool, QueueError> {
        queue.chunks.check(&self.inner)?;
        Ok(queue.chunks.is_begin_position(&self.inner))
    }

    fn is_end(&self, queue: &ByteQueue) -> Result<bool, QueueError> {
        queue.chunks.check(&self.inner)?;
        Ok(queue.chunks.is_end_position(&self.inner))
    }

    fn value(&self, queue: &ByteQueue) -> Result<Option<u8>, QueueError> {
        queue.chunks.check(&self.inner)?;
        Ok(queue.chunks.byte_at(&self.inner))
    }

    fn step(&mut self, queue: &ByteQueue) -> Result<bool, QueueError> {
        queue.chunks.check(&self.inner)?;
        Ok(queue.chunks.forward(&mut self.inner, 1) == 1)
    }

    fn step_back(&mut self, queue: &ByteQueue) -> Result<bool, QueueError> {
        queue.chunks.check(&self.inner)?;
        Ok(queue.chunks.backward(&mut self.inner, 1) == 1)
    }
}
