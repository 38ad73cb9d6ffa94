//! The allocation capability the parser draws its arrays from.
//!
//! Every array of a [`Model`](crate::Model), and the symbol stream the
//! parser walks, is an [`allocator_api2`] vector living in the caller's
//! allocator. The parser sizes each array before asking for it and never
//! grows one afterwards; what backs a grant (heap, bump arena, quota) is up
//! to the implementation.

use core::{alloc::Layout, cell::Cell, ptr::NonNull};

pub use allocator_api2::alloc::{AllocError, Allocator, Global as Unbounded};
use allocator_api2::{alloc::Global, vec::Vec};

use crate::error::Error;

/// The allocator a parse draws from. Every array of one model shares it.
pub type Arena<'a> = &'a dyn Allocator;

/// A vector whose storage lives in an [`Arena`].
pub type List<'a, T> = Vec<T, Arena<'a>>;

/// An allocator that needs no setup; empty lists built by `Default` point
/// here and never allocate.
pub(crate) const GLOBAL: Arena<'static> = &Global;

/// Passes requests to an inner allocator until a fixed byte budget is spent.
///
/// Memory handed back is not credited: the budget bounds what a parse
/// requested, not what it holds.
#[derive(Debug)]
pub struct Budget<A: Allocator = Global> {
    inner: A,
    limit: usize,
    used: Cell<usize>,
}

impl Budget {
    /// A budget of `limit` bytes over the global allocator.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self::new_in(limit, Global)
    }
}

impl<A: Allocator> Budget<A> {
    /// A budget of `limit` bytes over `inner`.
    #[must_use]
    pub const fn new_in(limit: usize, inner: A) -> Self {
        Self {
            inner,
            limit,
            used: Cell::new(0),
        }
    }

    /// Bytes granted so far.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit - self.used.get()
    }
}

// SAFETY: every block comes from `inner` and goes back to it unchanged, so
// `inner`'s guarantees carry over. Growing and shrinking use the default
// allocate-copy-deallocate path, which goes through the budget as well.
#[allow(unsafe_code)]
unsafe impl<A: Allocator> Allocator for Budget<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let bytes = layout.size();
        if bytes > self.remaining() {
            tracing::trace!(bytes, remaining = self.remaining(), "budget exhausted");
            return Err(AllocError);
        }
        let block = self.inner.allocate(layout)?;
        self.used.set(self.used.get() + bytes);
        Ok(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller hands back a block this allocator returned,
        // which `inner` allocated with the same layout.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

/// Requests room for exactly `count` elements of `T`; the returned list is
/// empty with that capacity.
pub(crate) fn reserve_array<'a, T>(arena: Arena<'a>, count: usize) -> Result<List<'a, T>, Error> {
    let bytes = count
        .checked_mul(core::mem::size_of::<T>())
        .ok_or(Error::AllocationFailed { bytes: usize::MAX })?;
    let mut out = Vec::new_in(arena);
    out.try_reserve_exact(count)
        .map_err(|_| Error::AllocationFailed { bytes })?;
    tracing::trace!(count, bytes, "reserved array");
    Ok(out)
}

/// Requests exactly `count` elements of `T` and fills them with `fill`.
pub(crate) fn allocate_array<'a, T>(
    arena: Arena<'a>,
    count: usize,
    fill: impl FnMut() -> T,
) -> Result<List<'a, T>, Error> {
    let mut out = reserve_array(arena, count)?;
    out.resize_with(count, fill);
    Ok(out)
}
