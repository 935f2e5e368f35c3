//! Lock-free single-producer/single-consumer ring buffer
//!
//! Moves fixed-size items between exactly two execution contexts, typically
//! a DMA-completion interrupt (producer) and the foreground loop
//! (consumer), without a critical section.
//!
//! One slot is always left empty so that "full" (`tail + 1 == head`) and
//! "empty" (`head == tail`) can be told apart without a separate counter;
//! a buffer with `N` slots holds at most `N - 1` items.
//!
//! # Ownership of the indices
//!
//! - `tail` is written only by the producer, after the item is in its slot
//!   (`Release`); the consumer reads it with `Acquire`.
//! - `head` is written only by the consumer, after the item has been
//!   copied out (`Release`); the producer reads it with `Acquire`.
//!
//! The split is enforced by the type system: [`RingBuffer::split`] hands
//! out exactly one [`Producer`] and one [`Consumer`].
//!
//! ```
//! use linbus_core::ring::RingBuffer;
//!
//! let mut rb: RingBuffer<u16, 4> = RingBuffer::new();
//! let (mut tx, mut rx) = rb.split();
//!
//! assert!(tx.push(7).is_ok());
//! assert_eq!(rx.pop(), Some(7));
//! assert_eq!(rx.pop(), None);
//! ```

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use portable_atomic::{AtomicUsize, Ordering};

/// Fixed-capacity SPSC queue of `Copy` items with `N` slots
///
/// `T: Copy` restricts items to plain data that can be duplicated
/// byte-for-byte. `N` must be at least 2.
pub struct RingBuffer<T, const N: usize> {
    /// Index of the next item to read
    head: AtomicUsize,
    /// Index of the next free slot to write
    tail: AtomicUsize,
    slots: UnsafeCell<MaybeUninit<[T; N]>>,
}

// SAFETY: items only cross contexts by value (`T: Send`). Slot access is
// serialized by the head/tail protocol: the producer touches only the slot
// at `tail` before publishing it, the consumer only the slot at `head`
// before releasing it, and `&self` methods outside the handles read
// nothing but the atomics.
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    const SLOTS_CHECK: () = assert!(N >= 2, "RingBuffer needs at least two slots");

    /// Create an empty ring buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::SLOTS_CHECK;

        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    #[inline]
    const fn increment(idx: usize) -> usize {
        (idx + 1) % N
    }

    #[inline]
    fn slot(&self, idx: usize) -> *mut T {
        debug_assert!(idx < N);
        self.slots.get().cast::<T>().wrapping_add(idx)
    }

    /// Maximum number of items the buffer can hold (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of items currently stored
    ///
    /// Exact when called from a context that is neither pushing nor
    /// popping concurrently; otherwise a snapshot that may already be stale
    /// with respect to the other side.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (tail + N - head) % N
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Check if the buffer is full
    pub fn is_full(&self) -> bool {
        Self::increment(self.tail.load(Ordering::Acquire)) == self.head.load(Ordering::Acquire)
    }

    /// Reset the buffer to empty
    ///
    /// The exclusive borrow guarantees no push or pop is in flight.
    pub fn reset(&mut self) {
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
    }

    /// Push an item from a single context
    ///
    /// Returns the item back if the buffer is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        // SAFETY: `&mut self` excludes every other producer and consumer
        unsafe { self.enqueue(item) }
    }

    /// Pop the oldest item from a single context
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: `&mut self` excludes every other producer and consumer
        unsafe { self.dequeue() }
    }

    /// Split into producer and consumer handles
    ///
    /// Each handle can be moved to its own execution context. While they
    /// exist, the buffer itself cannot be pushed, popped or reset.
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        let rb: &Self = self;
        (Producer { rb }, Consumer { rb })
    }

    /// # Safety
    ///
    /// At most one context may be inside `enqueue` at any time.
    unsafe fn enqueue(&self, item: T) -> Result<(), T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = Self::increment(tail);

        if next == self.head.load(Ordering::Acquire) {
            return Err(item);
        }

        // The consumer never reads `tail` before it is published below
        self.slot(tail).write(item);
        self.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// # Safety
    ///
    /// At most one context may be inside `dequeue` at any time.
    unsafe fn dequeue(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);

        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        // Written by the producer before it released `tail` past `head`
        let item = self.slot(head).read();
        self.head.store(Self::increment(head), Ordering::Release);
        Some(item)
    }
}

/// Writing end of a [`RingBuffer`]
pub struct Producer<'a, T, const N: usize> {
    rb: &'a RingBuffer<T, N>,
}

impl<T: Copy, const N: usize> Producer<'_, T, N> {
    /// Push an item
    ///
    /// Returns the item back if the buffer is full; nothing is modified.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        // SAFETY: there is exactly one `Producer` per split and pushing
        // needs `&mut self`
        unsafe { self.rb.enqueue(item) }
    }

    /// Check whether a push would currently fail
    pub fn is_full(&self) -> bool {
        self.rb.is_full()
    }

    /// Number of items currently stored (snapshot)
    pub fn len(&self) -> usize {
        self.rb.len()
    }

    /// Check if the buffer is empty (snapshot)
    pub fn is_empty(&self) -> bool {
        self.rb.is_empty()
    }

    /// Maximum number of items
    pub fn capacity(&self) -> usize {
        self.rb.capacity()
    }
}

/// Reading end of a [`RingBuffer`]
pub struct Consumer<'a, T, const N: usize> {
    rb: &'a RingBuffer<T, N>,
}

impl<T: Copy, const N: usize> Consumer<'_, T, N> {
    /// Pop the oldest item, if any
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: there is exactly one `Consumer` per split and popping
        // needs `&mut self`
        unsafe { self.rb.dequeue() }
    }

    /// Check whether a pop would currently fail
    pub fn is_empty(&self) -> bool {
        self.rb.is_empty()
    }

    /// Number of items currently stored (snapshot)
    pub fn len(&self) -> usize {
        self.rb.len()
    }

    /// Check if the buffer is full (snapshot)
    pub fn is_full(&self) -> bool {
        self.rb.is_full()
    }

    /// Maximum number of items
    pub fn capacity(&self) -> usize {
        self.rb.capacity()
    }
}
