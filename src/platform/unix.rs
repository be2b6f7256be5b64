//! POSIX backend: mmap / mprotect / munmap
//!
//! Reservations are anonymous private mappings created with `PROT_NONE`,
//! so the kernel hands out address space without backing pages and any
//! touch of uncommitted memory faults. Commit and revoke are both
//! `mprotect` calls over page-aligned sub-ranges.

use core::ptr::{self, NonNull};
use std::io;

pub(super) fn query_page_size() -> usize {
    // Safety: sysconf has no preconditions.
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

pub(super) fn reserve(total: usize) -> io::Result<NonNull<u8>> {
    // Safety: anonymous mapping, no fd, no address hint.
    let ptr = unsafe {
        libc::mmap(
            ptr::null_mut(),
            total,
            libc::PROT_NONE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }
    NonNull::new(ptr.cast()).ok_or_else(io::Error::last_os_error)
}

pub(super) unsafe fn commit(addr: *mut u8, len: usize) -> io::Result<()> {
    let rc = libc::mprotect(addr.cast(), len, libc::PROT_READ | libc::PROT_WRITE);
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

pub(super) unsafe fn revoke_access(addr: *mut u8, len: usize) -> io::Result<()> {
    let rc = libc::mprotect(addr.cast(), len, libc::PROT_NONE);
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

pub(super) unsafe fn release(addr: *mut u8, total: usize) {
    let rc = libc::munmap(addr.cast(), total);
    debug_assert_eq!(rc, 0, "munmap rejected the reservation range");
}
