//! Guard-page probes: out-of-bounds accesses must fault, not corrupt.
//!
//! A fault cannot be observed in-process without signal handling, so
//! each probe re-executes this test binary with a marker variable set
//! and asserts the child died on a protection fault instead of exiting
//! cleanly.

use std::env;
use std::process::{Command, Stdio};

use vmarena::Arena;

const PROBE_VAR: &str = "VMARENA_GUARD_PROBE";

fn assert_probe_faults(which: &str) {
    let exe = env::current_exe().expect("test binary path");
    let status = Command::new(exe)
        .args(["guard_probe_child", "--exact", "--nocapture"])
        .env(PROBE_VAR, which)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("spawn probe child");

    assert!(
        !status.success(),
        "probe `{}` exited cleanly; the guard page did not fault",
        which
    );

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        let signal = status.signal();
        assert!(
            signal == Some(libc::SIGSEGV) || signal == Some(libc::SIGBUS),
            "probe `{}` died with {:?}, expected a protection fault",
            which,
            signal
        );
    }
    #[cfg(windows)]
    {
        const ACCESS_VIOLATION: i32 = 0xC000_0005u32 as i32;
        assert_eq!(
            status.code(),
            Some(ACCESS_VIOLATION),
            "probe `{}` did not die on an access violation",
            which
        );
    }
}

/// Probe body. Inert unless the marker variable is set; the tests below
/// re-run this binary with it set and expect the write to kill us.
#[test]
fn guard_probe_child() {
    let which = match env::var(PROBE_VAR) {
        Ok(v) => v,
        Err(_) => return, // normal test run
    };

    let mut arena = Arena::new(64 << 10, 64 << 10).expect("reserve");
    let base = arena.alloc(0).expect("cursor probe").as_ptr();

    match which.as_str() {
        "lead" => unsafe {
            // One byte before the usable range
            base.sub(1).write_volatile(0xAA);
        },
        "trail" => unsafe {
            // First byte past the ceiling
            base.add(arena.reserved()).write_volatile(0xAA);
        },
        other => panic!("unknown probe {}", other),
    }
}

#[test]
fn write_before_base_faults() {
    assert_probe_faults("lead");
}

#[test]
fn write_past_ceiling_faults() {
    assert_probe_faults("trail");
}
