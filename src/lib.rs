//! A bounded queue of fixed-size byte elements for firmware and other places
//! where a growable, type-erased container is not an option.
//!
//! A [`Cxq`] is a fixed number of equally sized slots in one contiguous buffer.
//! Elements go in at either end and come out of the front. When the queue is
//! full it either rejects the insertion or, as a ring buffer, evicts its oldest
//! element ([`FullPolicy`]).
//!
//! How the buffer is obtained, released, and how elements are copied in and out
//! is up to a [`Strategy`]. The default [`FlatCopy`] allocates zeroed heap
//! storage and copies bytes verbatim, which is fine for plain data. Elements
//! that own resources outside of their own bytes need a strategy with a deep
//! copy. With [`ExternalStorage`] the caller provides the buffer, for example a
//! `static` array.
//!
//! The queue can be shared between threads by picking a real lock from
//! [`lock`]. The default [`NullLock`] keeps it single-threaded.
//!
//! ```rust
//! use cxq::{Cxq, CxqError};
//!
//! // Three slots of four bytes each.
//! let q = Cxq::new(3, 4)?;
//!
//! q.enqueue(&1u32.to_ne_bytes())?;
//! q.enqueue(&2u32.to_ne_bytes())?;
//! q.enqueue_front(&0u32.to_ne_bytes())?;
//! assert!(q.is_full());
//!
//! // Peek at the head without removing it.
//! let mut out = [0u8; 4];
//! q.dequeue(Some(&mut out), false)?;
//! assert_eq!(u32::from_ne_bytes(out), 0);
//!
//! // Visit every element, oldest first.
//! let mut seen = Vec::new();
//! q.traverse(|bytes| seen.push(u32::from_ne_bytes(bytes.try_into().unwrap())));
//! assert_eq!(seen, [0, 1, 2]);
//!
//! q.flush();
//! assert_eq!(q.dequeue(None, true), Err(CxqError::Empty));
//! # Ok::<(), CxqError>(())
//! ```
//!
//! Caller-provided storage works the same way:
//!
//! ```rust
//! use cxq::{Cxq, CxqError};
//!
//! let mut buf = [0u8; 6];
//! let q = Cxq::with_storage(3, 2, &mut buf)?;
//! q.enqueue(&[1, 2])?;
//! q.finish();
//!
//! assert_eq!(&buf[..2], &[1, 2]);
//! # Ok::<(), CxqError>(())
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod error;
mod inner;
pub mod lock;
mod queue;
mod storage;
mod strategy;

pub use error::CxqError;
pub use lock::NullLock;
pub use queue::{Cxq, FullPolicy};
pub use strategy::{ExternalStorage, FlatCopy, Strategy};

#[cfg(feature = "spin")]
pub use lock::SpinLock;

#[cfg(feature = "parking_lot")]
pub use lock::BlockingLock;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(VERSION, "0.9.0");
    }

    #[test]
    fn error_display() {
        assert_eq!(CxqError::Full.to_string(), "queue is full");
        assert_eq!(
            CxqError::InvalidConfig {
                capacity: 0,
                element_size: 4
            }
            .to_string(),
            "invalid queue configuration: capacity 0, element size 4"
        );
    }
}
