//! Virtual-memory primitives for the host OS
//!
//! Exactly one backend compiles in: `unix` (mmap family) or `windows`
//! (VirtualAlloc family). The arena core calls the wrappers here and
//! never inspects the platform itself.
//!
//! All four operations work on whole pages. `reserve` claims address
//! space with no backing and no access rights; `commit` grants
//! read/write backing to a sub-range; `revoke_access` turns a sub-range
//! into a fault-on-touch guard; `release` returns the whole reservation.

use core::ptr::NonNull;
use std::io;

use once_cell::sync::Lazy;

use crate::align::is_aligned;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as imp;
#[cfg(windows)]
use windows as imp;

/// OS page size, queried once per process.
static PAGE_SIZE: Lazy<usize> = Lazy::new(imp::query_page_size);

/// Allocation granularity of the host OS in bytes.
#[inline]
pub(crate) fn page_size() -> usize {
    *PAGE_SIZE
}

/// Reserve `total` bytes of contiguous address space.
///
/// The range has no physical backing and no access permissions until
/// [`commit`] grants them to a sub-range. A failed reserve has no side
/// effects.
pub(crate) fn reserve(total: usize) -> io::Result<NonNull<u8>> {
    imp::reserve(total)
}

/// Grant read/write backing to `len` bytes of a reservation.
///
/// # Safety
///
/// `addr..addr + len` must be page-aligned and lie inside a live range
/// returned by [`reserve`]. On failure no part of the range may be
/// treated as committed.
pub(crate) unsafe fn commit(addr: *mut u8, len: usize) -> io::Result<()> {
    debug_assert!(is_aligned(addr as usize, page_size()));
    debug_assert!(is_aligned(len, page_size()));
    imp::commit(addr, len)
}

/// Revoke all access to `len` bytes of a reservation, turning the range
/// into a guard region: any read or write of it faults.
///
/// # Safety
///
/// Same range requirements as [`commit`]. The range must never be
/// handed out afterwards.
pub(crate) unsafe fn revoke_access(addr: *mut u8, len: usize) -> io::Result<()> {
    debug_assert!(is_aligned(addr as usize, page_size()));
    debug_assert!(is_aligned(len, page_size()));
    imp::revoke_access(addr, len)
}

/// Return an entire reservation to the OS.
///
/// # Safety
///
/// `addr` and `total` must be exactly the base and span of one live
/// [`reserve`] result. The range must not be touched afterwards, and
/// releasing it twice is undefined.
pub(crate) unsafe fn release(addr: *mut u8, total: usize) {
    imp::release(addr, total)
}
