//! A layered, chunked streaming buffer.
//!
//! Data arrives as independently sized chunks and is walked in order by
//! cursors that cross chunk boundaries transparently. Nothing is copied:
//! consuming a span hands back views that share the pushed chunks' storage.
//!
//! Four queues build on each other:
//!
//! - [`ChunkQueue`] stores the chunks, and owns the version that decides
//!   whether a cursor is still valid.
//! - [`ByteQueue`] walks the stream one byte at a time.
//! - [`CodeUnitQueue`] walks fixed-width units, packed most-significant
//!   byte first.
//! - [`CodePointQueue`] walks variable-width code points, using a
//!   [`CodePointPolicy`] supplied by the caller.
//!
//! Pushing never invalidates a cursor. Consuming (`pop`, `read`, `ignore`)
//! invalidates every cursor except the one the data was consumed up to.
//!
//! ```rust
//! use chunkqueue::{ByteQueue, Cursor, QueueError};
//!
//! let mut queue = ByteQueue::new();
//! queue.push(&b"key="[..]);
//! let mut cursor = queue.begin();
//! while cursor.value(&queue)? != Some(b'=') {
//!     cursor.step(&queue)?;
//! }
//! let key = queue.pop_to(&mut cursor)?;
//! assert_eq!(key, [&b"key"[..]]);
//!
//! let stale = queue.begin();
//! queue.push(&b"value"[..]);
//! queue.pop();
//! assert_eq!(stale.value(&queue), Err(QueueError::StaleCursor));
//! # Ok::<(), QueueError>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod byte_queue;
mod chunk_queue;
mod code_point_queue;
mod code_unit_queue;
mod cursor;
mod error;
mod options;
mod policy;

#[cfg(test)]
mod tests;

pub use byte_queue::{ByteCursor, ByteQueue};
pub use bytes::Bytes;
pub use chunk_queue::{ChunkCursor, ChunkQueue};
pub use code_point_queue::{CodePointCursor, CodePointQueue};
pub use code_unit_queue::{CodeUnitCursor, CodeUnitQueue};
pub use cursor::{Cursor, collect_values};
pub use error::{ErrorKind, QueueError};
pub use options::{CodeUnitOptions, MAX_UNIT_LENGTH};
pub use policy::{CodePointPolicy, FnPolicy, concat_views};
