#[cfg(feature = "alloc")]
use alloc::boxed::Box;
use core::fmt::Debug;

/// Backing buffer of a queue.
///
/// Either the queue owns it (handed out by the strategy's allocator) or it is
/// a borrowed buffer the caller keeps alive for `'a`.
pub(crate) enum Storage<'a> {
    Unbound,
    #[cfg(feature = "alloc")]
    Owned(Box<[u8]>),
    Borrowed(&'a mut [u8]),
}

impl<'a> Storage<'a> {
    #[inline]
    pub fn as_slice(&self) -> Option<&[u8]> {
        match self {
            Storage::Unbound => None,
            #[cfg(feature = "alloc")]
            Storage::Owned(data) => Some(&data[..]),
            Storage::Borrowed(data) => Some(&data[..]),
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            Storage::Unbound => None,
            #[cfg(feature = "alloc")]
            Storage::Owned(data) => Some(&mut data[..]),
            Storage::Borrowed(data) => Some(&mut data[..]),
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        !matches!(self, Storage::Unbound)
    }

    /// Unbinds the storage, handing back the buffer if the queue owned it.
    #[cfg(feature = "alloc")]
    pub fn take_owned(&mut self) -> Option<Box<[u8]>> {
        match core::mem::replace(self, Storage::Unbound) {
            Storage::Owned(data) => Some(data),
            _ => None,
        }
    }
}

impl<'a> Debug for Storage<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Storage::Unbound => f.write_str("Unbound"),
            #[cfg(feature = "alloc")]
            Storage::Owned(data) => f.debug_tuple("Owned").field(&data.len()).finish(),
            Storage::Borrowed(data) => f.debug_tuple("Borrowed").field(&data.len()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_borrowed() {
        let mut data = [1u8, 2, 3, 4];
        let mut storage = Storage::Borrowed(&mut data);

        assert!(storage.is_bound());
        storage.as_mut_slice().unwrap()[0] = 9;
        assert_eq!(storage.as_slice(), Some(&[9u8, 2, 3, 4][..]));

        #[cfg(feature = "alloc")]
        {
            assert!(storage.take_owned().is_none());
            assert!(!storage.is_bound());
        }
    }

    #[test]
    fn storage_unbound() {
        let mut storage = Storage::Unbound;

        assert!(!storage.is_bound());
        assert!(storage.as_slice().is_none());
        assert!(storage.as_mut_slice().is_none());
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn storage_owned_take() {
        let mut storage = Storage::Owned(alloc::vec![0u8; 8].into_boxed_slice());

        let data = storage.take_owned().unwrap();
        assert_eq!(data.len(), 8);
        assert!(!storage.is_bound());
    }
}
