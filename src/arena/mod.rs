//! Virtual-memory arena - reserve once, commit lazily, free in O(1)
//!
//! Design: one linear region per arena, three speeds:
//! 1. Bump allocation (fast path, no OS calls)
//! 2. Commit growth (slow path, one protection call per step)
//! 3. Reservation release (rare, whole region at once)
//!
//! One owner per arena: allocation takes `&mut self`, teardown is `Drop`.


use core::ptr::NonNull;
use std::fmt;
use std::io;

use crate::align::{checked_align_up, is_aligned};
use crate::logging::{log_commit, log_release, log_reserve, log_reset};
use crate::platform;

/// Fixed allocation alignment. Every returned pointer and the cursor
/// itself stay on this boundary; callers with stricter needs round
/// their own sizes.
pub const ALIGNMENT: usize = 8;

/// Default usable reservation: 64 MiB of address space
pub const DEFAULT_RESERVE_SIZE: usize = 64 * 1024 * 1024;

/// Default commit granularity: 64 KiB
pub const DEFAULT_COMMIT_STEP: usize = 64 * 1024;

/// Construction parameters for [`Arena`].
///
/// Both byte counts round up to the OS page size. Guard pages cost two
/// pages of address space and no physical memory.
#[derive(Debug, Clone, Copy)]
pub struct ArenaConfig {
    /// Usable bytes to reserve. The arena never grows past this.
    pub reserve_size: usize,
    /// Commit growth granularity in bytes.
    pub commit_step: usize,
    /// Keep an inaccessible page on each flank of the usable range.
    pub guard_pages: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            reserve_size: DEFAULT_RESERVE_SIZE,
            commit_step: DEFAULT_COMMIT_STEP,
            guard_pages: true,
        }
    }
}

/// Why an arena operation failed.
#[derive(Debug)]
pub enum ArenaError {
    /// The OS declined the address-space reservation, or a requested
    /// size rounds past `usize::MAX`. Construction only.
    ReserveFailed { total: usize, source: io::Error },
    /// The OS declined physical backing while the committed range grew.
    CommitFailed { offset: usize, len: usize, source: io::Error },
    /// The rounded request does not fit under the reservation ceiling.
    OutOfSpace { requested: usize, remaining: usize },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::ReserveFailed { total, source } => {
                write!(f, "Failed to reserve {} bytes of address space: {}", total, source)
            }
            ArenaError::CommitFailed { offset, len, source } => {
                write!(f, "Failed to commit {} bytes at offset {}: {}", len, offset, source)
            }
            ArenaError::OutOfSpace { requested, remaining } => {
                write!(
                    f,
                    "Allocation of {} bytes exceeds the arena ceiling ({} bytes remain)",
                    requested, remaining
                )
            }
        }
    }
}

impl std::error::Error for ArenaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArenaError::ReserveFailed { source, .. }
            | ArenaError::CommitFailed { source, .. } => Some(source),
            ArenaError::OutOfSpace { .. } => None,
        }
    }
}

/// Occupancy snapshot for monitoring and debugging
#[derive(Debug, Clone, Copy)]
pub struct ArenaStats {
    /// Usable ceiling in bytes.
    pub reserved: usize,
    /// Bytes with physical backing.
    pub committed: usize,
    /// Bytes handed out since construction or the last reset.
    pub used: usize,
}

/// Region allocator backed by one contiguous virtual-memory reservation.
///
/// ```text
/// | guard |  committed  :  uncommitted  | guard |
///         ^base    ^cursor              ^base + reserve_size
/// ```
///
/// Allocation bumps `cursor`; crossing the committed watermark commits
/// another `commit_step`. [`reset`](Arena::reset) rewinds the cursor
/// without touching the mapping, and dropping the arena returns the
/// whole reservation to the OS.
#[derive(Debug)]
pub struct Arena {
    /// First usable byte, just past the leading guard page.
    base: NonNull<u8>,
    /// Allocation offset from `base`. Always a multiple of [`ALIGNMENT`].
    cursor: usize,
    /// Bytes of read/write backing granted so far, from `base`.
    committed: usize,
    /// Usable ceiling. `cursor` and `committed` never exceed it.
    reserve_size: usize,
    /// Commit growth granularity, a page multiple.
    commit_step: usize,
    /// Full reservation span including guards, kept for release.
    total_size: usize,
    /// One page when guards are enabled, zero otherwise.
    guard_size: usize,
}

// Safety: an arena exclusively owns its reservation and OS mappings have
// no thread affinity. Every mutator takes `&mut self` and Sync stays
// unimplemented, so moving between threads is the only sharing there is.
unsafe impl Send for Arena {}

impl Arena {
    /// Build an arena with guard pages enabled.
    ///
    /// `reserve_size` is the usable ceiling and `commit_step` the commit
    /// granularity; both round up to the OS page size.
    pub fn new(reserve_size: usize, commit_step: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig {
            reserve_size,
            commit_step,
            guard_pages: true,
        })
    }

    /// Build an arena from explicit parameters.
    ///
    /// Reserves the usable range plus two flanking guard pages (when
    /// enabled) in one contiguous span and commits none of it. The
    /// guards stay inaccessible for the arena's whole life, so a stray
    /// access just past either end faults instead of corrupting a
    /// neighbour.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ReserveFailed`] when the OS declines the
    /// reservation or a size rounds past `usize::MAX`. Nothing stays
    /// mapped on failure.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        let page = platform::page_size();
        let guard = if config.guard_pages { page } else { 0 };

        let reserve_size = checked_align_up(config.reserve_size, page)
            .ok_or_else(|| size_overflow(config.reserve_size))?;
        // A zero step would never grow the committed range.
        let commit_step = checked_align_up(config.commit_step.max(1), page)
            .ok_or_else(|| size_overflow(config.commit_step))?;
        let total = reserve_size
            .checked_add(guard * 2)
            .ok_or_else(|| size_overflow(reserve_size))?;

        let mem = platform::reserve(total)
            .map_err(|source| ArenaError::ReserveFailed { total, source })?;

        if guard != 0 {
            // Safety: both flanks lie inside the fresh reservation.
            let lead = unsafe { platform::revoke_access(mem.as_ptr(), guard) };
            let trail = lead.and_then(|_| unsafe {
                platform::revoke_access(mem.as_ptr().add(guard + reserve_size), guard)
            });
            if let Err(source) = trail {
                // A half-guarded arena must not exist.
                unsafe { platform::release(mem.as_ptr(), total) };
                return Err(ArenaError::ReserveFailed { total, source });
            }
        }

        // Safety: guard ≤ total keeps the offset inside the reservation.
        let base = unsafe { NonNull::new_unchecked(mem.as_ptr().add(guard)) };
        log_reserve(total, base.as_ptr());

        Ok(Self {
            base,
            cursor: 0,
            committed: 0,
            reserve_size,
            commit_step,
            total_size: total,
            guard_size: guard,
        })
    }

    /// Hand out `size` bytes from the cursor.
    ///
    /// The request rounds up to [`ALIGNMENT`], so every returned pointer
    /// is 8-byte aligned. A zero-size request succeeds and returns the
    /// current cursor position without advancing it; that pointer must
    /// not be dereferenced.
    ///
    /// # Errors
    ///
    /// [`ArenaError::OutOfSpace`] when the rounded request does not fit
    /// under the ceiling and [`ArenaError::CommitFailed`] when the OS
    /// refuses backing. Both leave the arena unchanged.
    pub fn alloc(&mut self, size: usize) -> Result<NonNull<u8>, ArenaError> {
        debug_assert!(is_aligned(self.cursor, ALIGNMENT));

        // Fast path: aligned bump, checked against the ceiling.
        let candidate = checked_align_up(size, ALIGNMENT)
            .and_then(|aligned| self.cursor.checked_add(aligned))
            .filter(|&end| end <= self.reserve_size);
        let candidate = match candidate {
            Some(end) => end,
            None => {
                return Err(ArenaError::OutOfSpace {
                    requested: size,
                    remaining: self.reserve_size - self.cursor,
                });
            }
        };

        if candidate > self.committed {
            self.grow_commit(candidate)?;
        }

        // Safety: everything below candidate is committed and base is
        // non-null, so base + cursor is a valid in-range pointer.
        let ptr = unsafe { NonNull::new_unchecked(self.base.as_ptr().add(self.cursor)) };
        self.cursor = candidate;
        Ok(ptr)
    }

    /// Slow path: extend the committed range so `candidate` is usable.
    fn grow_commit(&mut self, candidate: usize) -> Result<(), ArenaError> {
        debug_assert!(candidate > self.committed);
        debug_assert!(candidate <= self.reserve_size);

        let needed = candidate - self.committed;
        // Whole step multiples (the step is any page multiple, not
        // necessarily a power of two), truncated at the ceiling when the
        // reservation is not a step multiple.
        let growth = needed
            .div_ceil(self.commit_step)
            .saturating_mul(self.commit_step)
            .min(self.reserve_size - self.committed);

        // Safety: the range starts at the committed watermark and ends
        // at or below the reservation ceiling.
        let result = unsafe { platform::commit(self.base.as_ptr().add(self.committed), growth) };
        if let Err(source) = result {
            return Err(ArenaError::CommitFailed {
                offset: self.committed,
                len: growth,
                source,
            });
        }

        self.committed += growth;
        debug_assert!(self.committed >= candidate);
        log_commit(self.committed, growth);
        Ok(())
    }

    /// Rewind the cursor to the start of the arena in O(1).
    ///
    /// Committed backing stays committed, so the next fill cycle reuses
    /// it without OS calls. Pointers handed out before the reset are
    /// dead; the arena will serve the same addresses again.
    pub fn reset(&mut self) {
        log_reset(self.cursor);
        self.cursor = 0;
    }

    /// Usable ceiling in bytes (the page-rounded reservation size).
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserve_size
    }

    /// Bytes of committed backing.
    #[inline]
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Bytes handed out since construction or the last reset.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Bytes still available under the ceiling.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.reserve_size - self.cursor
    }

    /// Occupancy snapshot.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            reserved: self.reserve_size,
            committed: self.committed,
            used: self.cursor,
        }
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // Safety: base - guard_size is exactly what reserve returned and
        // total_size its span; drop runs at most once.
        unsafe {
            platform::release(self.base.as_ptr().sub(self.guard_size), self.total_size);
        }
        log_release(self.total_size);
    }
}

fn size_overflow(size: usize) -> ArenaError {
    ArenaError::ReserveFailed {
        total: size,
        source: io::Error::new(io::ErrorKind::InvalidInput, "size overflows the address space"),
    }
}
