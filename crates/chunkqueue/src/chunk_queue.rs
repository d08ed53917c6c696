//! Ordered storage of pushed chunks, appended at the tail and released from
//! the head.
//!
//! Every other queue in this crate is a view over a [`ChunkQueue`]: it owns
//! the chunks, the running begin offset into the first chunk, and the version
//! counter that decides whether a cursor is still usable.
//!
//! Positions are `(chunk index, intra-chunk offset)` pairs. Chunk indices are
//! absolute: the first chunk ever pushed has index 0 and indices are never
//! reused, so releasing chunks from the head does not shift the index of any
//! surviving chunk. A position is normalized so that its offset always lies
//! inside its chunk; the only position past the last byte is
//! `(end index, 0)`. Pushing appends a chunk at exactly that index, which is
//! why a cursor resting at the end observes newly pushed data.

use alloc::{collections::VecDeque, vec::Vec};
use core::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use bstr::BStr;
use bytes::Bytes;
use log::{debug, trace};

use crate::{cursor::Cursor, error::QueueError};

static NEXT_QUEUE_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a queue, stamped into each cursor it issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct QueueId(usize);

impl QueueId {
    fn next() -> Self {
        Self(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An append-at-tail, release-at-head sequence of immutable byte chunks.
///
/// ```rust
/// use chunkqueue::{ChunkQueue, Cursor};
///
/// let mut queue = ChunkQueue::new();
/// queue.push(&b"Item"[..]);
/// queue.push(&b"0"[..]);
///
/// let mut cursor = queue.begin();
/// assert_eq!(cursor.value(&queue)?.as_deref(), Some(&b"Item"[..]));
/// assert!(cursor.step(&queue)?);
///
/// let views = queue.pop_to(&mut cursor)?;
/// assert_eq!(views, [&b"Item"[..]]);
/// assert_eq!(queue.len(), 1);
/// # Ok::<(), chunkqueue::QueueError>(())
/// ```
pub struct ChunkQueue {
    id: QueueId,
    chunks: VecDeque<Bytes>,
    /// Absolute index of `chunks[0]`.
    first: usize,
    /// Bytes of `chunks[0]` already released.
    begin_offset: usize,
    /// Absolute offset of the begin position.
    consumed: usize,
    /// Unreleased byte count.
    buffered: usize,
    version: u64,
}

/// A cursor over a [`ChunkQueue`] that moves one chunk at a time.
///
/// Its [`value`](Cursor::value) is the not yet stepped-over remainder of the
/// current chunk, as a view sharing the chunk's storage.
#[derive(Debug, Clone)]
pub struct ChunkCursor {
    pub(crate) queue: QueueId,
    pub(crate) version: u64,
    pub(crate) index: usize,
    pub(crate) offset: usize,
    pub(crate) absolute: usize,
}

impl PartialEq for ChunkCursor {
    fn eq(&self, other: &Self) -> bool {
        self.queue == other.queue && self.index == other.index && self.offset == other.offset
    }
}

impl Eq for ChunkCursor {}

impl ChunkCursor {
    /// Absolute byte offset since the start of the stream.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.absolute
    }
}

impl Default for ChunkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChunkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chunks: Vec<&BStr> = self.chunks.iter().map(|c| BStr::new(c.as_ref())).collect();
        f.debug_struct("ChunkQueue")
            .field("version", &self.version)
            .field("first", &self.first)
            .field("begin_offset", &self.begin_offset)
            .field("buffered", &self.buffered)
            .field("chunks", &chunks)
            .finish_non_exhaustive()
    }
}

impl ChunkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: QueueId::next(),
            chunks: VecDeque::new(),
            first: 0,
            begin_offset: 0,
            consumed: 0,
            buffered: 0,
            version: 0,
        }
    }

    /// Appends a chunk at the tail. Empty chunks are ignored.
    ///
    /// Pushing never invalidates cursors.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        if chunk.is_empty() {
            return;
        }
        self.buffered += chunk.len();
        trace!(
            "push: chunk #{} of {} bytes, {} buffered",
            self.end_index(),
            chunk.len(),
            self.buffered
        );
        self.chunks.push_back(chunk);
    }

    /// A fresh cursor at the first unreleased byte.
    #[must_use]
    pub fn begin(&self) -> ChunkCursor {
        self.cursor_at(self.first, self.begin_offset, self.consumed)
    }

    /// A fresh cursor one past the last pushed byte.
    #[must_use]
    pub fn end(&self) -> ChunkCursor {
        self.cursor_at(self.end_index(), 0, self.consumed + self.buffered)
    }

    /// Releases everything currently buffered and returns it as views.
    pub fn pop(&mut self) -> Vec<Bytes> {
        self.release(self.end_index(), 0, self.consumed + self.buffered)
    }

    /// Releases every byte from begin up to `cursor` and returns the released
    /// data as an ordered list of views.
    ///
    /// The first view is trimmed to the running begin offset and the last one
    /// to the cursor's intra-chunk offset; empty views are left out. The
    /// version is bumped, invalidating every outstanding cursor except
    /// `cursor` itself, which is re-stamped and now rests on the new begin.
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or was issued by another queue.
    pub fn pop_to(&mut self, cursor: &mut ChunkCursor) -> Result<Vec<Bytes>, QueueError> {
        self.check(cursor)?;
        let views = self.release(cursor.index, cursor.offset, cursor.absolute);
        cursor.version = self.version;
        Ok(views)
    }

    /// The views [`pop_to`](Self::pop_to) would return, without releasing
    /// anything.
    ///
    /// # Errors
    ///
    /// Fails if `cursor` is stale or was issued by another queue.
    pub fn views_to(&self, cursor: &ChunkCursor) -> Result<Vec<Bytes>, QueueError> {
        self.check(cursor)?;
        Ok(self.trimmed_views(cursor.index, cursor.offset))
    }

    /// Number of buffered, unreleased bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffered
    }

    /// Whether no unreleased bytes are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffered == 0
    }

    /// Number of chunks still (partially) buffered.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total bytes released so far; the absolute offset of begin.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The current version. Bumped by every pop.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn cursor_at(&self, index: usize, offset: usize, absolute: usize) -> ChunkCursor {
        ChunkCursor {
            queue: self.id,
            version: self.version,
            index,
            offset,
            absolute,
        }
    }

    fn end_index(&self) -> usize {
        self.first + self.chunks.len()
    }

    fn chunk(&self, index: usize) -> Option<&Bytes> {
        index
            .checked_sub(self.first)
            .and_then(|slot| self.chunks.get(slot))
    }

    /// Offset of the first unreleased byte of the chunk at `index`.
    fn chunk_start(&self, index: usize) -> usize {
        if index == self.first {
            self.begin_offset
        } else {
            0
        }
    }

    fn trimmed_views(&self, index: usize, offset: usize) -> Vec<Bytes> {
        let mut views = Vec::with_capacity(index - self.first + 1);
        for (at, chunk) in (self.first..=index).zip(self.chunks.iter()) {
            let start = self.chunk_start(at);
            let stop = if at == index { offset } else { chunk.len() };
            if stop > start {
                views.push(chunk.slice(start..stop));
            }
        }
        views
    }

    fn release(&mut self, index: usize, offset: usize, absolute: usize) -> Vec<Bytes> {
        let views = self.trimmed_views(index, offset);
        self.chunks.drain(..index - self.first);
        self.first = index;
        self.begin_offset = offset;
        let released = absolute - self.consumed;
        self.consumed = absolute;
        self.buffered -= released;
        self.version += 1;
        debug!(
            "pop: released {released} bytes in {} views, version {}",
            views.len(),
            self.version
        );
        views
    }

    /// Verifies that `cursor` was issued by this queue under its current
    /// version.
    pub(crate) fn check(&self, cursor: &ChunkCursor) -> Result<(), QueueError> {
        if cursor.queue != self.id {
            Err(QueueError::ForeignCursor)
        } else if cursor.version != self.version {
            Err(QueueError::StaleCursor)
        } else {
            Ok(())
        }
    }

    pub(crate) fn is_begin_position(&self, cursor: &ChunkCursor) -> bool {
        cursor.index == self.first && cursor.offset == self.begin_offset
    }

    pub(crate) fn is_end_position(&self, cursor: &ChunkCursor) -> bool {
        cursor.index == self.end_index()
    }

    /// The byte at `cursor`, or `None` at the end.
    pub(crate) fn byte_at(&self, cursor: &ChunkCursor) -> Option<u8> {
        self.chunk(cursor.index).map(|chunk| chunk[cursor.offset])
    }

    /// Moves `cursor` forward by up to `n` bytes, crossing chunk boundaries,
    /// and returns how many bytes it moved.
    pub(crate) fn forward(&self, cursor: &mut ChunkCursor, n: usize) -> usize {
        let mut moved = 0;
        while moved < n {
            let Some(chunk) = self.chunk(cursor.index) else {
                break;
            };
            let step = (chunk.len() - cursor.offset).min(n - moved);
            cursor.offset += step;
            cursor.absolute += step;
            moved += step;
            if cursor.offset == chunk.len() {
                cursor.index += 1;
                cursor.offset = 0;
            }
        }
        moved
    }

    /// Moves `cursor` back by up to `n` bytes, never past begin, and returns
    /// how many bytes it moved.
    pub(crate) fn backward(&self, cursor: &mut ChunkCursor, n: usize) -> usize {
        let mut moved = 0;
        while moved < n {
            let start = self.chunk_start(cursor.index);
            if cursor.offset > start {
                let step = (cursor.offset - start).min(n - moved);
                cursor.offset -= step;
                cursor.absolute -= step;
                moved += step;
            } else if cursor.index > self.first {
                cursor.index -= 1;
                cursor.offset = self.chunks[cursor.index - self.first].len();
            } else {
                break;
            }
        }
        moved
    }
}

impl Cursor<ChunkQueue> for ChunkCursor {
    type Value = Bytes;

    fn is_begin(&self, queue: &ChunkQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        Ok(queue.is_begin_position(self))
    }

    fn is_end(&self, queue: &ChunkQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        Ok(queue.is_end_position(self))
    }

    fn value(&self, queue: &ChunkQueue) -> Result<Option<Bytes>, QueueError> {
        queue.check(self)?;
        Ok(queue.chunk(self.index).map(|chunk| chunk.slice(self.offset..)))
    }

    fn step(&mut self, queue: &ChunkQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        let Some(chunk) = queue.chunk(self.index) else {
            return Ok(false);
        };
        self.absolute += chunk.len() - self.offset;
        self.index += 1;
        self.offset = 0;
        Ok(true)
    }

    fn step_back(&mut self, queue: &ChunkQueue) -> Result<bool, QueueError> {
        queue.check(self)?;
        let start = queue.chunk_start(self.index);
        if self.offset > start {
            self.absolute -= self.offset - start;
            self.offset = start;
        } else if self.index > queue.first {
            self.index -= 1;
            let start = queue.chunk_start(self.index);
            self.absolute -= queue.chunks[self.index - queue.first].len() - start;
            self.offset = start;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}
