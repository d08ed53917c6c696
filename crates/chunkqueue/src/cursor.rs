//! The cursor protocol shared by every queue layer.
//!
//! A cursor is a plain value: it records which queue issued it, the queue
//! version it was issued under, and a position. It holds no borrow of the
//! queue, so the queue can keep accepting pushes while cursors are
//! outstanding. Every operation therefore takes the owning queue as an
//! argument and starts by checking that the cursor still belongs to it.
//!
//! `clone` and `equals` are [`Clone`] and [`PartialEq`]: two cursors are equal
//! when they come from the same queue and rest on the same chunk at the same
//! intra-chunk offset.
//!
//! Each cursor type also has an inherent `offset` method giving its absolute
//! byte offset since the start of the stream.

use alloc::vec::Vec;

use crate::error::QueueError;

/// A versioned, bidirectional position handle into a queue `Q`.
pub trait Cursor<Q: ?Sized>: Clone + PartialEq {
    /// The element observed at a position.
    type Value;

    /// Whether the cursor rests on the queue's current begin.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is stale or foreign to `queue`.
    fn is_begin(&self, queue: &Q) -> Result<bool, QueueError>;

    /// Whether the cursor rests one past the last buffered byte.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is stale or foreign to `queue`.
    fn is_end(&self, queue: &Q) -> Result<bool, QueueError>;

    /// The element at the cursor, or `None` at the end of buffered data.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is stale or foreign to `queue`, or with
    /// [`QueueError::Starved`] when the element is only partially buffered.
    fn value(&self, queue: &Q) -> Result<Option<Self::Value>, QueueError>;

    /// Moves forward by one element. Returns `false`, without moving, when no
    /// complete element lies ahead.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is stale or foreign to `queue`.
    fn step(&mut self, queue: &Q) -> Result<bool, QueueError>;

    /// Moves back by one element. Returns `false`, without moving, at begin.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is stale or foreign to `queue`.
    fn step_back(&mut self, queue: &Q) -> Result<bool, QueueError>;
}

/// Walks `cursor` forward, collecting every value until the end of buffered
/// data or the first element that is only partially buffered.
///
/// # Errors
///
/// Propagates every error other than [`QueueError::Starved`].
pub fn collect_values<C, Q>(mut cursor: C, queue: &Q) -> Result<Vec<C::Value>, QueueError>
where
    C: Cursor<Q>,
    Q: ?Sized,
{
    let mut values = Vec::new();
    loop {
        match cursor.value(queue) {
            Ok(Some(value)) => values.push(value),
            Ok(None) => break,
            Err(err) if err.is_recoverable() => break,
            Err(err) => return Err(err),
        }
        if !cursor.step(queue)? {
            break;
        }
    }
    Ok(values)
}
