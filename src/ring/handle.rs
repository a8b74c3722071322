//! Ring buffer operations over a buffer that may not exist.
//!
//! Every function checks for `None` first and answers with the matching soft
//! failure: zero, `None`, or `RingError::Absent`. Nothing here panics.

use crate::error::RingError;
use crate::ring::ring_buffer::RingBuffer;
use crate::ring::slots::SlotAllocator;

pub fn length_of<A: SlotAllocator>(buf: Option<&RingBuffer<A>>) -> usize {
    match buf {
        Some(b) => b.len(),
        None    => 0,
    }
}

pub fn element_at<A: SlotAllocator>(buf: Option<&RingBuffer<A>>, pos: usize) -> Option<&f64> {
    buf?.element_at(pos)
}

pub fn append<A: SlotAllocator>(buf: Option<&mut RingBuffer<A>>, value: f64) -> Result<(), RingError> {
    let Some(b) = buf else { return Err(RingError::Absent) };
    b.append(value)
}

pub fn pop<A: SlotAllocator>(buf: Option<&mut RingBuffer<A>>) -> f64 {
    match buf {
        Some(b) => b.pop(),
        None    => 0.0,
    }
}

pub fn resize<A: SlotAllocator>(buf: Option<&mut RingBuffer<A>>, new_capacity: usize) -> Result<(), RingError> {
    let Some(b) = buf else { return Err(RingError::Absent) };
    b.resize(new_capacity)
}

pub fn destroy<A: SlotAllocator>(buf: Option<&mut RingBuffer<A>>) {
    if let Some(b) = buf {
        b.destroy();
    }
}
