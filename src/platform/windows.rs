//! Windows backend: VirtualAlloc / VirtualFree
//!
//! `MEM_RESERVE` claims address space without commit charge. Committing
//! is a second `VirtualAlloc` over the same range with `MEM_COMMIT`.
//! Guard ranges are committed `PAGE_NOACCESS` because `VirtualProtect`
//! refuses to change the protection of reserved-but-uncommitted pages.

use core::mem;
use core::ptr::{self, NonNull};
use std::io;

use winapi::um::memoryapi::{VirtualAlloc, VirtualFree};
use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};
use winapi::um::winnt::{MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_NOACCESS, PAGE_READWRITE};

pub(super) fn query_page_size() -> usize {
    let mut info: SYSTEM_INFO = unsafe { mem::zeroed() };
    // Safety: GetSystemInfo only writes the out-parameter.
    unsafe { GetSystemInfo(&mut info) };
    info.dwPageSize as usize
}

pub(super) fn reserve(total: usize) -> io::Result<NonNull<u8>> {
    // Safety: no address hint, the kernel picks the placement.
    let ptr = unsafe { VirtualAlloc(ptr::null_mut(), total, MEM_RESERVE, PAGE_NOACCESS) };
    NonNull::new(ptr.cast()).ok_or_else(io::Error::last_os_error)
}

pub(super) unsafe fn commit(addr: *mut u8, len: usize) -> io::Result<()> {
    let ptr = VirtualAlloc(addr.cast(), len, MEM_COMMIT, PAGE_READWRITE);
    if ptr.is_null() {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

pub(super) unsafe fn revoke_access(addr: *mut u8, len: usize) -> io::Result<()> {
    let ptr = VirtualAlloc(addr.cast(), len, MEM_COMMIT, PAGE_NOACCESS);
    if ptr.is_null() {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

pub(super) unsafe fn release(addr: *mut u8, _total: usize) {
    // MEM_RELEASE takes the reservation base and a zero size.
    let ok = VirtualFree(addr.cast(), 0, MEM_RELEASE);
    debug_assert_ne!(ok, 0, "VirtualFree rejected the reservation base");
}
