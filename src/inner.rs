use core::num::NonZeroUsize;
use core::ops::Range;

/// Slot geometry of a queue: how many slots there are and how many bytes each
/// one spans. All wraparound arithmetic goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    slots: NonZeroUsize,
    slot_size: NonZeroUsize,
    storage_len: usize,
}

impl Layout {
    /// Returns `None` if `slots * slot_size` overflows `usize`.
    pub const fn new(slots: NonZeroUsize, slot_size: NonZeroUsize) -> Option<Self> {
        match slots.get().checked_mul(slot_size.get()) {
            Some(storage_len) => Some(Self {
                slots,
                slot_size,
                storage_len,
            }),
            None => None,
        }
    }

    #[inline(always)]
    pub const fn slots(&self) -> usize {
        self.slots.get()
    }

    #[inline(always)]
    pub const fn slot_size(&self) -> usize {
        self.slot_size.get()
    }

    #[inline(always)]
    pub const fn storage_len(&self) -> usize {
        self.storage_len
    }

    /// The slot `offset` positions after `index`.
    ///
    /// Both `index` and `offset` must be no greater than the slot count, which
    /// keeps the sum from overflowing.
    #[inline(always)]
    pub fn forward(&self, index: usize, offset: usize) -> usize {
        debug_assert!(index < self.slots());
        debug_assert!(offset <= self.slots());

        let room = self.slots() - index;
        if offset >= room {
            offset - room
        } else {
            index + offset
        }
    }

    #[inline(always)]
    pub fn next(&self, index: usize) -> usize {
        self.forward(index, 1)
    }

    #[inline(always)]
    pub fn prev(&self, index: usize) -> usize {
        debug_assert!(index < self.slots());

        if index == 0 {
            self.slots() - 1
        } else {
            index - 1
        }
    }

    /// Byte range of slot `index` inside the backing storage.
    #[inline(always)]
    pub fn bytes(&self, index: usize) -> Range<usize> {
        debug_assert!(index < self.slots());

        let start = index * self.slot_size();
        start..start + self.slot_size()
    }
}
