use thiserror::Error;

/// Everything a queue operation can report.
///
/// [`Full`](CxqError::Full) and [`Empty`](CxqError::Empty) are ordinary outcomes
/// that callers are expected to branch on. The remaining variants point at a
/// misconfigured queue or a mismatched buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CxqError {
    /// No free slot, and the queue rejects insertions when full.
    #[error("queue is full")]
    Full,
    /// Nothing to dequeue or peek.
    #[error("queue is empty")]
    Empty,
    /// Capacity or element size was zero, or their product overflows `usize`.
    #[error("invalid queue configuration: capacity {capacity}, element size {element_size}")]
    InvalidConfig {
        capacity: usize,
        element_size: usize,
    },
    /// The strategy did not allocate storage and none has been bound yet.
    #[error("queue has no backing storage bound")]
    Unbound,
    /// An element or output buffer did not span exactly one slot.
    #[error("expected an element of {expected} bytes, got {found}")]
    ElementSize { expected: usize, found: usize },
    /// Backing storage did not span exactly `capacity * element_size` bytes.
    #[error("expected backing storage of {expected} bytes, got {found}")]
    StorageSize { expected: usize, found: usize },
    /// The strategy could not provide the requested number of bytes.
    #[error("failed to allocate {len} bytes of backing storage")]
    AllocationFailed { len: usize },
}
