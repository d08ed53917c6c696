//! Decoding policies injected into a [`CodePointQueue`](crate::CodePointQueue).
//!
//! The queue itself knows nothing about any character set. A policy tells it
//! where code points begin, how to turn the units at a boundary into a value,
//! and how to turn a consumed run of bytes into text.

use alloc::{string::String, vec::Vec};
use core::{fmt, marker::PhantomData};

use bytes::Bytes;

use crate::{
    code_unit_queue::{CodeUnitCursor, CodeUnitQueue},
    error::QueueError,
};

/// Decoding rules for variable-width code points built from code units.
///
/// All three methods must be pure: the queue calls them any number of times,
/// on cursors it may later discard.
pub trait CodePointPolicy {
    /// The decoded code point.
    type Value;

    /// Whether `at` rests on a code point boundary.
    ///
    /// Called on every intermediate position of a step, including the end
    /// position, where the policy must decide whether the buffered data ends
    /// on a complete code point.
    ///
    /// # Errors
    ///
    /// Any error is propagated to the caller of the cursor operation.
    fn is_aligned(&self, units: &CodeUnitQueue, at: &CodeUnitCursor) -> Result<bool, QueueError>;

    /// Decodes the code point starting at `at`. Never called at the end.
    ///
    /// # Errors
    ///
    /// Should report [`QueueError::Starved`] when the code point is only
    /// partially buffered.
    fn decode_value(
        &self,
        units: &CodeUnitQueue,
        at: &CodeUnitCursor,
    ) -> Result<Self::Value, QueueError>;

    /// Decodes a consumed run of bytes into text.
    ///
    /// # Errors
    ///
    /// Any error aborts the read before anything is consumed.
    fn decode_string(&self, views: &[Bytes]) -> Result<String, QueueError>;
}

/// A [`CodePointPolicy`] assembled from three plain functions.
pub struct FnPolicy<A, D, S, V> {
    is_aligned: A,
    decode_value: D,
    decode_string: S,
    value: PhantomData<fn() -> V>,
}

impl<A, D, S, V> FnPolicy<A, D, S, V>
where
    A: Fn(&CodeUnitQueue, &CodeUnitCursor) -> Result<bool, QueueError>,
    D: Fn(&CodeUnitQueue, &CodeUnitCursor) -> Result<V, QueueError>,
    S: Fn(&[Bytes]) -> Result<String, QueueError>,
{
    /// Wraps the three functions.
    pub fn new(is_aligned: A, decode_value: D, decode_string: S) -> Self {
        Self {
            is_aligned,
            decode_value,
            decode_string,
            value: PhantomData,
        }
    }
}

impl<A, D, S, V> fmt::Debug for FnPolicy<A, D, S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

impl<A, D, S, V> CodePointPolicy for FnPolicy<A, D, S, V>
where
    A: Fn(&CodeUnitQueue, &CodeUnitCursor) -> Result<bool, QueueError>,
    D: Fn(&CodeUnitQueue, &CodeUnitCursor) -> Result<V, QueueError>,
    S: Fn(&[Bytes]) -> Result<String, QueueError>,
{
    type Value = V;

    fn is_aligned(&self, units: &CodeUnitQueue, at: &CodeUnitCursor) -> Result<bool, QueueError> {
        (self.is_aligned)(units, at)
    }

    fn decode_value(&self, units: &CodeUnitQueue, at: &CodeUnitCursor) -> Result<V, QueueError> {
        (self.decode_value)(units, at)
    }

    fn decode_string(&self, views: &[Bytes]) -> Result<String, QueueError> {
        (self.decode_string)(views)
    }
}

/// Joins the views of a read into one buffer, for policies whose
/// `decode_string` needs contiguous input.
#[must_use]
pub fn concat_views(views: &[Bytes]) -> Vec<u8> {
    let mut out = Vec::with_capacity(views.iter().map(Bytes::len).sum());
    for view in views {
        out.extend_from_slice(view);
    }
    out
}
