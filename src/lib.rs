pub mod config;
pub mod error;
pub mod report;
pub mod ring;
pub mod script;

pub use error::{AllocError, RingError, ScriptError};
pub use ring::{Heap, RingBuffer, SlotAllocator};
