#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};

#[cfg(feature = "alloc")]
use crate::CxqError;

/// How a queue obtains, gives back, and copies into its backing storage.
///
/// Every method has a default, so an implementation only overrides what it
/// needs:
///
/// * [`allocate`](Strategy::allocate) returns `Ok(None)` by default, which puts
/// the queue in external-storage mode. The caller must then bind a buffer with
/// [`Cxq::bind_storage`] before enqueueing.
/// * [`release`](Strategy::release) drops the buffer by default. It is only
/// ever handed storage that came out of `allocate`; borrowed storage is never
/// released by the queue.
/// * [`copy`](Strategy::copy) is a flat byte copy by default. That is only
/// correct for plain-data elements. Elements that own something outside of
/// their own bytes (handles into a pool, for instance) need a deep copy that
/// moves the owned contents and leaves the destination's own handles intact.
///
/// The same strategy value is shared by every operation on the queue, so with
/// a real lock it must be safe to call from any thread that uses the queue.
///
/// [`Cxq::bind_storage`]: crate::Cxq::bind_storage
pub trait Strategy {
    /// Provides `len` bytes of backing storage, or `Ok(None)` if the caller
    /// supplies storage.
    #[cfg(feature = "alloc")]
    fn allocate(&self, len: usize) -> Result<Option<Box<[u8]>>, CxqError> {
        let _ = len;
        Ok(None)
    }

    /// Gives back storage previously returned by [`allocate`](Strategy::allocate).
    #[cfg(feature = "alloc")]
    fn release(&self, storage: Box<[u8]>) {
        drop(storage);
    }

    /// Copies one element from `src` into `dst` and returns `dst`.
    ///
    /// `dst` and `src` always have the same length, one slot.
    fn copy<'d>(&self, dst: &'d mut [u8], src: &[u8]) -> &'d mut [u8] {
        dst.copy_from_slice(src);
        dst
    }
}

impl<S: Strategy + ?Sized> Strategy for &S {
    #[cfg(feature = "alloc")]
    fn allocate(&self, len: usize) -> Result<Option<Box<[u8]>>, CxqError> {
        (**self).allocate(len)
    }

    #[cfg(feature = "alloc")]
    fn release(&self, storage: Box<[u8]>) {
        (**self).release(storage)
    }

    fn copy<'d>(&self, dst: &'d mut [u8], src: &[u8]) -> &'d mut [u8] {
        (**self).copy(dst, src)
    }
}

/// The default strategy: zeroed heap storage (with the `alloc` feature) and a
/// flat byte copy.
///
/// Only valid for elements that own nothing outside of their own bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlatCopy;

impl Strategy for FlatCopy {
    #[cfg(feature = "alloc")]
    fn allocate(&self, len: usize) -> Result<Option<Box<[u8]>>, CxqError> {
        let mut vec = Vec::new();
        vec.try_reserve_exact(len)
            .map_err(|_| CxqError::AllocationFailed { len })?;
        vec.resize(len, 0);

        Ok(Some(vec.into_boxed_slice()))
    }
}

/// Never allocates; storage is always supplied by the caller. Copies flatly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExternalStorage;

impl Strategy for ExternalStorage {}
