use crate::error::QueueError;

/// Largest supported unit width; a unit value is packed into a `u64`.
pub const MAX_UNIT_LENGTH: usize = 8;

/// Configuration for a [`CodeUnitQueue`](crate::CodeUnitQueue).
///
/// # Examples
///
/// ```rust
/// use chunkqueue::{CodeUnitOptions, CodeUnitQueue};
///
/// let queue = CodeUnitQueue::with_options(CodeUnitOptions { unit_length: 2 })?;
/// assert_eq!(queue.unit_length(), 2);
/// # Ok::<(), chunkqueue::QueueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeUnitOptions {
    /// Width of one code unit in bytes, assembled most-significant byte first.
    ///
    /// Must be in `1..=8`.
    ///
    /// # Default
    ///
    /// `1`
    pub unit_length: usize,
}

impl Default for CodeUnitOptions {
    fn default() -> Self {
        Self { unit_length: 1 }
    }
}

impl CodeUnitOptions {
    pub(crate) fn validate(self) -> Result<Self, QueueError> {
        if (1..=MAX_UNIT_LENGTH).contains(&self.unit_length) {
            Ok(self)
        } else {
            Err(QueueError::InvalidArgument("unit length must be in 1..=8"))
        }
    }
}
