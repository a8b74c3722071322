use crate::error::AllocError;

/// How a ring buffer obtains, grows and shrinks its slot storage.
///
/// Every method works on the buffer's `Vec<f64>` directly. Slots gained by
/// `grow` are zeroed; slots below the old length keep their contents.
pub trait SlotAllocator {
    /// Allocate `len` zeroed slots.
    fn allocate(&self, len: usize) -> Result<Vec<f64>, AllocError>;

    /// Extend `slots` to at least `new_len`. On error `slots` is untouched.
    fn grow(&self, slots: &mut Vec<f64>, new_len: usize) -> Result<(), AllocError>;

    /// Cut `slots` down to `new_len` and give the excess back. On error the
    /// allocation is left as it was; the caller decides whether that matters.
    fn shrink(&self, slots: &mut Vec<f64>, new_len: usize) -> Result<(), AllocError>;
}

/// The global allocator, with failure surfaced through `try_reserve_exact`
/// instead of aborting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heap;

impl SlotAllocator for Heap {
    fn allocate(&self, len: usize) -> Result<Vec<f64>, AllocError> {
        let mut slots = Vec::new();
        self.grow(&mut slots, len)?;
        Ok(slots)
    }

    fn grow(&self, slots: &mut Vec<f64>, new_len: usize) -> Result<(), AllocError> {
        if new_len <= slots.len() { return Ok(()); }
        slots
            .try_reserve_exact(new_len - slots.len())
            .map_err(|_| AllocError { slots: new_len })?;
        slots.resize(new_len, 0.0);
        Ok(())
    }

    fn shrink(&self, slots: &mut Vec<f64>, new_len: usize) -> Result<(), AllocError> {
        if new_len == 0 {
            *slots = Vec::new();
        } else {
            slots.truncate(new_len);
            slots.shrink_to_fit();
        }
        Ok(())
    }
}
