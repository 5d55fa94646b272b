//! Scoped locks a queue can run under.
//!
//! A queue is generic over any [`lock_api::RawMutex`]. Every operation acquires
//! it once and holds it until the operation is done, including the
//! evict-then-insert step of overwrite mode and the read-then-advance step of
//! a dequeue.
//!
//! * [`NullLock`] is the default, for single-threaded use.
//! * [`SpinLock`] (feature `spin`) spins, and works without an OS.
//! * [`BlockingLock`] (feature `parking_lot`) parks the waiting thread. Its
//! timed acquisition is not used by the queue; callers that need a bounded
//! wait have to arrange it themselves.

use core::cell::Cell;

use lock_api::{GuardNoSend, RawMutex};

/// A lock that never blocks.
///
/// It is `!Sync`, so a queue using it can be moved to another thread but never
/// shared between threads. Acquiring it while it is already held (calling
/// back into a queue from inside [`Cxq::traverse`], for example) panics
/// instead of handing out a second view of the queue state.
///
/// [`Cxq::traverse`]: crate::Cxq::traverse
#[derive(Debug)]
pub struct NullLock {
    held: Cell<bool>,
}

unsafe impl RawMutex for NullLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        held: Cell::new(false),
    };

    type GuardMarker = GuardNoSend;

    #[inline]
    fn lock(&self) {
        assert!(self.try_lock(), "cxq: queue re-entered while locked");
    }

    #[inline]
    fn try_lock(&self) -> bool {
        !self.held.replace(true)
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.held.set(false);
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.held.get()
    }
}

/// A spinning lock for targets without an OS scheduler.
#[cfg(feature = "spin")]
pub type SpinLock = spin::mutex::SpinMutex<()>;

/// A lock that parks the waiting thread.
#[cfg(feature = "parking_lot")]
pub type BlockingLock = parking_lot::RawMutex;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_lock_acquire_release() {
        let lock = NullLock::INIT;

        assert!(!lock.is_locked());
        lock.lock();
        assert!(lock.is_locked());
        assert!(!lock.try_lock());

        unsafe { lock.unlock() };
        assert!(!lock.is_locked());
        assert!(lock.try_lock());
    }

    #[cfg(feature = "spin")]
    #[test]
    fn spin_lock_acquire_release() {
        let lock = <SpinLock as RawMutex>::INIT;

        RawMutex::lock(&lock);
        assert!(RawMutex::is_locked(&lock));
        assert!(!RawMutex::try_lock(&lock));

        unsafe { RawMutex::unlock(&lock) };
        assert!(RawMutex::try_lock(&lock));
        unsafe { RawMutex::unlock(&lock) };
    }

    #[cfg(feature = "parking_lot")]
    #[test]
    fn blocking_lock_acquire_release() {
        let lock = <BlockingLock as RawMutex>::INIT;

        RawMutex::lock(&lock);
        assert!(RawMutex::is_locked(&lock));
        assert!(!RawMutex::try_lock(&lock));

        unsafe { RawMutex::unlock(&lock) };
        assert!(RawMutex::try_lock(&lock));
        unsafe { RawMutex::unlock(&lock) };
    }

    #[test]
    #[should_panic(expected = "re-entered")]
    fn null_lock_reentry_panics() {
        let lock = NullLock::INIT;

        lock.lock();
        lock.lock();
    }
}
