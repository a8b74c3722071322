use tracing::{debug, warn};

use crate::error::RingError;
use crate::ring::slots::{Heap, SlotAllocator};

/// FIFO of `f64` over one contiguous allocation. Resizable in place.
///
/// Logical element `i` lives at physical slot `(start + i) % capacity`. The
/// live run is wrapped when `start + len > capacity`. Append never grows the
/// buffer; callers `resize` first.
#[derive(Debug)]
pub struct RingBuffer<A: SlotAllocator = Heap> {
    slots:    Vec<f64>,
    start:    usize,
    len:      usize,
    capacity: usize,
    alloc:    A,
}

/// Which run a resize had to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relocation {
    None,
    CopyLower,
    MoveUpper,
    Compact,
}

impl Relocation {
    fn label(self) -> &'static str {
        match self {
            Relocation::None      => "none",
            Relocation::CopyLower => "copy_lower",
            Relocation::MoveUpper => "move_upper",
            Relocation::Compact   => "compact",
        }
    }
}

impl RingBuffer {
    /// Buffer with room for `capacity` elements on the global heap.
    /// Degrades to an empty buffer if the allocation fails.
    pub fn new(capacity: usize) -> Self {
        Self::with_allocator(capacity, Heap)
    }
}

impl<A: SlotAllocator + Default> Default for RingBuffer<A> {
    fn default() -> Self {
        Self::empty_with(A::default())
    }
}

impl<A: SlotAllocator> RingBuffer<A> {
    pub fn with_allocator(capacity: usize, alloc: A) -> Self {
        let mut buf = Self::empty_with(alloc);
        if capacity == 0 {
            return buf;
        }
        match buf.alloc.allocate(capacity) {
            Ok(slots) => {
                buf.slots = slots;
                buf.capacity = capacity;
            }
            Err(e) => warn!(capacity, error = %e, "ring buffer allocation failed, starting empty"),
        }
        buf
    }

    fn empty_with(alloc: A) -> Self {
        Self { slots: Vec::new(), start: 0, len: 0, capacity: 0, alloc }
    }

    /// Release the storage and return to the empty state. Safe to repeat.
    pub fn destroy(&mut self) {
        self.slots = Vec::new();
        self.start = 0;
        self.len = 0;
        self.capacity = 0;
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn capacity(&self) -> usize { self.capacity }
    pub fn is_full(&self) -> bool { self.len == self.capacity }

    /// Physical slot of logical element 0.
    pub fn start(&self) -> usize { self.start }

    /// True when the live run crosses the physical end of the storage.
    pub fn is_wrapped(&self) -> bool {
        self.start + self.len > self.capacity
    }

    /// Slots actually held by the storage. Exceeds `capacity()` only after a
    /// shrink whose reallocation failed.
    pub fn allocated_slots(&self) -> usize { self.slots.len() }

    pub fn allocator(&self) -> &A { &self.alloc }

    fn physical_index(&self, pos: usize) -> usize {
        debug_assert!(self.capacity > 0);
        (self.start + pos) % self.capacity
    }

    /// Slot at logical position `pos`, for any `pos < capacity()`.
    ///
    /// The bound is the capacity, not the length: positions at or past
    /// `len()` address the free slots that the next appends will fill.
    pub fn element_at(&self, pos: usize) -> Option<&f64> {
        if pos >= self.capacity {
            return None;
        }
        self.slots.get(self.physical_index(pos))
    }

    pub fn element_at_mut(&mut self, pos: usize) -> Option<&mut f64> {
        if pos >= self.capacity {
            return None;
        }
        let idx = self.physical_index(pos);
        self.slots.get_mut(idx)
    }

    /// Write `value` at the logical end. Fails without mutation when full.
    pub fn append(&mut self, value: f64) -> Result<(), RingError> {
        let capacity = self.capacity;
        let slot = self.element_at_mut(self.len).ok_or(RingError::Full { capacity })?;
        *slot = value;
        self.len += 1;
        Ok(())
    }

    /// Remove and return logical element 0, or `None` when empty.
    pub fn try_pop(&mut self) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        let value = *self.element_at(0)?;
        self.start = (self.start + 1) % self.capacity;
        self.len -= 1;
        Some(value)
    }

    /// Like `try_pop`, but an empty buffer yields `0.0`.
    pub fn pop(&mut self) -> f64 {
        self.try_pop().unwrap_or_default()
    }

    /// Change the capacity, keeping every live element at its logical position.
    ///
    /// Refuses to go below `len()`. A failed grow leaves the buffer as it was.
    /// A failed shrink reallocation is tolerated: the data is already
    /// compacted below `new_capacity`, the larger allocation is kept, and
    /// `capacity()` reports `new_capacity` regardless.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), RingError> {
        if self.len > new_capacity {
            return Err(RingError::WouldTruncate { len: self.len, requested: new_capacity });
        }
        let old_capacity = self.capacity;
        if new_capacity == old_capacity {
            return Ok(());
        }

        let relocation = if new_capacity > old_capacity {
            self.grow(new_capacity)?
        } else {
            self.shrink(new_capacity)
        };

        debug!(
            from = old_capacity,
            to = new_capacity,
            start = self.start,
            len = self.len,
            strategy = relocation.label(),
            "resized ring buffer"
        );
        Ok(())
    }

    fn grow(&mut self, new_capacity: usize) -> Result<Relocation, RingError> {
        let old_capacity = self.capacity;
        self.alloc.grow(&mut self.slots, new_capacity)?;
        self.capacity = new_capacity;

        if self.start + self.len <= old_capacity {
            return Ok(Relocation::None);
        }

        let upper_len = old_capacity - self.start;
        let lower_len = self.len - upper_len;
        if lower_len <= new_capacity - old_capacity {
            // Lower run goes right after the old end; the live run is contiguous again.
            self.slots.copy_within(0..lower_len, old_capacity);
            Ok(Relocation::CopyLower)
        } else {
            let new_start = new_capacity - upper_len;
            self.slots.copy_within(self.start..old_capacity, new_start);
            self.start = new_start;
            Ok(Relocation::MoveUpper)
        }
    }

    // Everything live must sit below `new_capacity` before the storage shrinks.
    fn shrink(&mut self, new_capacity: usize) -> Relocation {
        let old_capacity = self.capacity;

        let relocation = if self.start + self.len > old_capacity {
            let upper_len = old_capacity - self.start;
            let new_start = new_capacity - upper_len;
            self.slots.copy_within(self.start..old_capacity, new_start);
            self.start = new_start;
            Relocation::MoveUpper
        } else if self.len == 0 {
            self.start = 0;
            Relocation::None
        } else if self.start + self.len > new_capacity {
            self.slots.copy_within(self.start..self.start + self.len, 0);
            self.start = 0;
            Relocation::Compact
        } else {
            Relocation::None
        };

        if let Err(e) = self.alloc.shrink(&mut self.slots, new_capacity) {
            warn!(
                from = old_capacity,
                to = new_capacity,
                error = %e,
                "shrink reallocation failed, keeping the larger allocation"
            );
        }
        self.capacity = new_capacity;
        relocation
    }
}
