use core::fmt::Debug;
use core::num::NonZeroUsize;

use lock_api::{Mutex, RawMutex};
use log::{debug, trace, warn};

use crate::inner::Layout;
use crate::lock::NullLock;
use crate::storage::Storage;
use crate::strategy::{ExternalStorage, FlatCopy, Strategy};
use crate::CxqError;

/// What an insertion into a full queue does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FullPolicy {
    /// Fail with [`CxqError::Full`] and leave the queue untouched.
    #[default]
    Reject,
    /// Evict the oldest element, then insert. The queue stays full.
    Overwrite,
}

struct State<'a> {
    storage: Storage<'a>,
    first: usize,
    count: usize,
    policy: FullPolicy,
}

impl<'a> State<'a> {
    /// Drops the head without copying it anywhere.
    #[inline]
    fn advance(&mut self, layout: &Layout) {
        debug_assert!(self.count > 0);

        self.first = layout.next(self.first);
        self.count -= 1;
    }

    /// Makes sure one slot is free for an insertion, evicting the head if the
    /// queue is full and overwrites.
    fn make_room(&mut self, layout: &Layout) -> Result<(), CxqError> {
        if !self.storage.is_bound() {
            return Err(CxqError::Unbound);
        }

        if self.count == layout.slots() {
            match self.policy {
                FullPolicy::Reject => return Err(CxqError::Full),
                FullPolicy::Overwrite => {
                    trace!("cxq: evicting slot {} to make room", self.first);
                    self.advance(layout);
                }
            }
        }

        Ok(())
    }

    fn head(&self) -> Result<usize, CxqError> {
        if self.count == 0 {
            Err(CxqError::Empty)
        } else {
            Ok(self.first)
        }
    }
}

/// A bounded queue of fixed-size byte elements.
///
/// The queue owns (or borrows, see [`Cxq::with_storage`]) one contiguous buffer
/// of `capacity * element_size` bytes and never grows. Elements are copied in
/// and out through the queue's [`Strategy`], and can be inserted at either end.
/// When the queue is full an insertion is either rejected or evicts the oldest
/// element, depending on the [`FullPolicy`].
///
/// Every operation takes `&self` and holds the queue's lock `L` for its whole
/// duration. With the default [`NullLock`] the queue is single-threaded; pick
/// a real lock from [`crate::lock`] to share it between threads.
///
/// Operations that land on a slot return its index, not a reference into the
/// buffer. Use [`Cxq::dequeue_with`] or [`Cxq::traverse`] to look at slot bytes
/// in place.
///
/// ## Example
/// ```rust
/// # use cxq::{Cxq, CxqError};
/// let q = Cxq::new(3, 4)?;
///
/// for i in 1u32..=3 {
///     q.enqueue(&i.to_ne_bytes())?;
/// }
/// assert_eq!(q.enqueue(&4u32.to_ne_bytes()), Err(CxqError::Full));
///
/// // Turn the queue into a ring buffer: the oldest element makes room.
/// q.set_overwrite_on_full(true);
/// q.enqueue(&4u32.to_ne_bytes())?;
///
/// let mut out = [0u8; 4];
/// q.dequeue(Some(&mut out), true)?;
/// assert_eq!(u32::from_ne_bytes(out), 2);
/// # Ok::<(), CxqError>(())
/// ```
pub struct Cxq<'a, S: Strategy = FlatCopy, L: RawMutex = NullLock> {
    state: Mutex<L, State<'a>>,
    layout: Layout,
    strategy: S,
}

#[cfg(feature = "alloc")]
impl Cxq<'static> {
    /// Creates a queue with heap storage for `capacity` elements of
    /// `element_size` bytes each, using the flat-copy strategy.
    ///
    /// # Errors
    ///
    /// * [`CxqError::InvalidConfig`] if either argument is zero or the storage
    /// size overflows `usize`.
    /// * [`CxqError::AllocationFailed`] if the storage could not be allocated.
    pub fn new(capacity: usize, element_size: usize) -> Result<Self, CxqError> {
        Self::with_strategy(capacity, element_size, FlatCopy)
    }
}

impl<'a> Cxq<'a, ExternalStorage> {
    /// Creates a queue on top of caller-provided storage.
    ///
    /// `storage` must be exactly `capacity * element_size` bytes long. It is
    /// never released by the queue.
    ///
    /// # Example
    ///
    /// ```
    /// # use cxq::{Cxq, CxqError};
    /// let mut buf = [0u8; 8];
    /// let q = Cxq::with_storage(4, 2, &mut buf)?;
    ///
    /// q.enqueue_front(&[1, 2])?;
    /// q.enqueue_front(&[3, 4])?;
    /// assert_eq!(q.len(), 2);
    /// # Ok::<(), CxqError>(())
    /// ```
    pub fn with_storage(
        capacity: usize,
        element_size: usize,
        storage: &'a mut [u8],
    ) -> Result<Self, CxqError> {
        let mut q = Self::with_strategy(capacity, element_size, ExternalStorage)?;
        q.bind_storage(storage)?;

        Ok(q)
    }
}

impl<'a, S: Strategy, L: RawMutex> Cxq<'a, S, L> {
    /// Creates a queue that manages its storage through `strategy`.
    ///
    /// If the strategy allocates, the queue owns that storage and hands it back
    /// to [`Strategy::release`] when dropped. Otherwise the queue starts unbound
    /// and [`Cxq::bind_storage`] must be called before anything is enqueued.
    ///
    /// # Errors
    ///
    /// * [`CxqError::InvalidConfig`] if either size is zero or the storage size
    /// overflows `usize`.
    /// * [`CxqError::StorageSize`] if the strategy allocated the wrong amount.
    /// * Whatever the strategy's allocator fails with.
    pub fn with_strategy(
        capacity: usize,
        element_size: usize,
        strategy: S,
    ) -> Result<Self, CxqError> {
        let layout = NonZeroUsize::new(capacity)
            .zip(NonZeroUsize::new(element_size))
            .and_then(|(slots, slot_size)| Layout::new(slots, slot_size))
            .ok_or(CxqError::InvalidConfig {
                capacity,
                element_size,
            })?;

        #[cfg(feature = "alloc")]
        let storage = match strategy.allocate(layout.storage_len())? {
            Some(data) if data.len() == layout.storage_len() => Storage::Owned(data),
            Some(data) => {
                let found = data.len();
                strategy.release(data);
                return Err(CxqError::StorageSize {
                    expected: layout.storage_len(),
                    found,
                });
            }
            None => Storage::Unbound,
        };
        #[cfg(not(feature = "alloc"))]
        let storage = Storage::Unbound;

        debug!(
            "cxq: init capacity={} element_size={} storage={:?}",
            capacity, element_size, storage
        );

        Ok(Self {
            state: Mutex::new(State {
                storage,
                first: 0,
                count: 0,
                policy: FullPolicy::Reject,
            }),
            layout,
            strategy,
        })
    }

    /// Binds caller-provided storage, replacing whatever the queue had.
    ///
    /// Storage the queue owned is handed to [`Strategy::release`]. The queue is
    /// emptied and its head reset to slot `0`.
    ///
    /// # Errors
    ///
    /// [`CxqError::StorageSize`] if `storage` is not exactly
    /// `capacity * element_size` bytes. The queue is left as it was.
    pub fn bind_storage(&mut self, storage: &'a mut [u8]) -> Result<(), CxqError> {
        if storage.len() != self.layout.storage_len() {
            return Err(CxqError::StorageSize {
                expected: self.layout.storage_len(),
                found: storage.len(),
            });
        }

        let state = self.state.get_mut();

        #[cfg(feature = "alloc")]
        if let Some(previous) = state.storage.take_owned() {
            self.strategy.release(previous);
        }

        debug!("cxq: binding {} bytes of external storage", storage.len());

        state.storage = Storage::Borrowed(storage);
        state.first = 0;
        state.count = 0;

        Ok(())
    }

    /// Tears the queue down, releasing owned storage through the strategy.
    ///
    /// Equivalent to dropping the queue.
    pub fn finish(self) {
        debug!("cxq: finish");
        drop(self);
    }

    /// Appends `element` after the newest element and returns the slot it
    /// landed in.
    ///
    /// # Errors
    ///
    /// * [`CxqError::Full`] if the queue is full and rejects insertions.
    /// * [`CxqError::ElementSize`] if `element` is not one slot long.
    /// * [`CxqError::Unbound`] if no storage is bound.
    pub fn enqueue(&self, element: &[u8]) -> Result<usize, CxqError> {
        self.check_element(element.len())?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.make_room(&self.layout)?;

        let index = self.layout.forward(state.first, state.count);
        self.write(&mut state.storage, index, element)?;
        state.count += 1;

        Ok(index)
    }

    /// Inserts `element` before the oldest element, so it is the next one
    /// out, and returns the slot it landed in.
    ///
    /// When the queue is full and overwrites, the current head is evicted
    /// first, so the new element takes its place.
    ///
    /// # Errors
    ///
    /// Same as [`Cxq::enqueue`].
    pub fn enqueue_front(&self, element: &[u8]) -> Result<usize, CxqError> {
        self.check_element(element.len())?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.make_room(&self.layout)?;

        let index = self.layout.prev(state.first);
        self.write(&mut state.storage, index, element)?;
        state.first = index;
        state.count += 1;

        Ok(index)
    }

    /// Reads the oldest element and returns its slot.
    ///
    /// * `out` - If given, the element is copied into it through the strategy.
    /// It must be exactly one slot long.
    /// * `remove` - `true` to take the element off the queue, `false` to only
    /// peek at it.
    ///
    /// # Errors
    ///
    /// * [`CxqError::Empty`] if there is nothing to read.
    /// * [`CxqError::ElementSize`] if `out` is not one slot long.
    pub fn dequeue(&self, out: Option<&mut [u8]>, remove: bool) -> Result<usize, CxqError> {
        if let Some(out) = &out {
            self.check_element(out.len())?;
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let index = state.head()?;

        if let Some(out) = out {
            let storage = state.storage.as_slice().ok_or(CxqError::Unbound)?;
            self.strategy.copy(out, &storage[self.layout.bytes(index)]);
        }

        if remove {
            state.advance(&self.layout);
        }

        Ok(index)
    }

    /// Reads the oldest element in place.
    ///
    /// `f` is called with the head slot's bytes while the lock is held, before
    /// the element is removed (if `remove` is set). Nothing is copied.
    ///
    /// # Errors
    ///
    /// [`CxqError::Empty`] if there is nothing to read. `f` is not called.
    ///
    /// # Example
    ///
    /// ```
    /// # use cxq::{Cxq, CxqError};
    /// let q = Cxq::new(2, 2)?;
    /// q.enqueue(&[5, 6])?;
    ///
    /// let sum = q.dequeue_with(false, |bytes| bytes.iter().map(|&b| b as u32).sum::<u32>())?;
    /// assert_eq!(sum, 11);
    /// assert_eq!(q.len(), 1);
    /// # Ok::<(), CxqError>(())
    /// ```
    pub fn dequeue_with<R>(
        &self,
        remove: bool,
        f: impl FnOnce(&[u8]) -> R,
    ) -> Result<R, CxqError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let index = state.head()?;
        let storage = state.storage.as_slice().ok_or(CxqError::Unbound)?;
        let result = f(&storage[self.layout.bytes(index)]);

        if remove {
            state.advance(&self.layout);
        }

        Ok(result)
    }

    /// Removes every element. Calling it on an empty queue does nothing.
    pub fn flush(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        while state.count > 0 {
            state.advance(&self.layout);
        }
    }

    /// Calls `visit` with the bytes of every element, oldest first, under a
    /// single lock acquisition.
    ///
    /// Every occupied slot is visited, so a one-element queue gets exactly one
    /// call. The C `cxq_traverse` this replaces stopped one element short of
    /// the newest and skipped one-element queues entirely.
    ///
    /// `visit` must not call back into the queue. With [`NullLock`] that
    /// panics; with a real lock it deadlocks.
    pub fn traverse(&self, mut visit: impl FnMut(&[u8])) {
        let guard = self.state.lock();

        let Some(storage) = guard.storage.as_slice() else {
            return;
        };

        for offset in 0..guard.count {
            let index = self.layout.forward(guard.first, offset);
            visit(&storage[self.layout.bytes(index)]);
        }
    }

    /// Returns the bytes of slot `index`, occupied or not.
    ///
    /// Returns `None` if `index` is out of range or no storage is bound.
    pub fn slot(&mut self, index: usize) -> Option<&[u8]> {
        if index >= self.layout.slots() {
            return None;
        }

        let range = self.layout.bytes(index);
        self.state
            .get_mut()
            .storage
            .as_slice()
            .map(|storage| &storage[range])
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.state.lock().count == 0
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.state.lock().count == self.layout.slots()
    }

    /// Whether the queue has storage to work with.
    pub fn is_bound(&self) -> bool {
        self.state.lock().storage.is_bound()
    }

    /// The number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.slots()
    }

    /// The number of occupied slots.
    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    /// The number of free slots.
    pub fn free(&self) -> usize {
        self.layout.slots() - self.len()
    }

    /// The size of one element in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.layout.slot_size()
    }

    /// What an insertion into a full queue does.
    pub fn policy(&self) -> FullPolicy {
        self.state.lock().policy
    }

    /// Changes what an insertion into a full queue does. Queued elements are kept.
    pub fn set_policy(&self, policy: FullPolicy) {
        self.state.lock().policy = policy;
    }

    /// Whether a full queue evicts its oldest element on insertion.
    pub fn overwrite_on_full(&self) -> bool {
        self.policy() == FullPolicy::Overwrite
    }

    /// Switches between [`FullPolicy::Overwrite`] (`true`) and [`FullPolicy::Reject`].
    pub fn set_overwrite_on_full(&self, overwrite: bool) {
        self.set_policy(if overwrite {
            FullPolicy::Overwrite
        } else {
            FullPolicy::Reject
        });
    }

    /// The slot of the oldest element.
    pub fn first(&self) -> usize {
        self.state.lock().first
    }

    /// Moves the head to slot `first`. Out-of-range values are ignored.
    ///
    /// The occupied slots move with the head; their bytes do not.
    pub fn set_first(&self, first: usize) {
        if first < self.layout.slots() {
            self.state.lock().first = first;
        } else {
            warn!(
                "cxq: ignoring head position {} for a queue of {} slots",
                first,
                self.layout.slots()
            );
        }
    }

    /// The slot of the newest element, or `None` if the queue is empty.
    pub fn last(&self) -> Option<usize> {
        let state = self.state.lock();

        match state.count {
            0 => None,
            count => Some(self.layout.forward(state.first, count - 1)),
        }
    }

    /// The strategy shared by every operation on this queue.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    fn check_element(&self, len: usize) -> Result<(), CxqError> {
        if len == self.layout.slot_size() {
            Ok(())
        } else {
            Err(CxqError::ElementSize {
                expected: self.layout.slot_size(),
                found: len,
            })
        }
    }

    fn write(
        &self,
        storage: &mut Storage<'a>,
        index: usize,
        element: &[u8],
    ) -> Result<usize, CxqError> {
        let storage = storage.as_mut_slice().ok_or(CxqError::Unbound)?;
        self.strategy
            .copy(&mut storage[self.layout.bytes(index)], element);

        Ok(index)
    }
}

impl<'a, S: Strategy, L: RawMutex> Drop for Cxq<'a, S, L> {
    fn drop(&mut self) {
        #[cfg(feature = "alloc")]
        if let Some(data) = self.state.get_mut().storage.take_owned() {
            self.strategy.release(data);
        }
    }
}

impl<'a, S: Strategy + Debug, L: RawMutex> Debug for Cxq<'a, S, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut f = f.debug_struct("Cxq");
        f.field("capacity", &self.layout.slots());
        f.field("element_size", &self.layout.slot_size());
        match self.state.try_lock() {
            Some(state) => {
                f.field("storage", &state.storage);
                f.field("first", &state.first);
                f.field("count", &state.count);
                f.field("policy", &state.policy);
            }
            None => {
                f.field("state", &format_args!("<locked>"));
            }
        }
        f.field("strategy", &self.strategy);
        f.finish()
    }
}
