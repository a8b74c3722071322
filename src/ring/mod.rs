pub mod handle;
pub mod ring_buffer;
pub mod slots;

pub use ring_buffer::RingBuffer;
pub use slots::{Heap, SlotAllocator};
