//! vmarena - region allocation on raw OS virtual memory
//!
//! Reserves a large span of address space up front, commits physical
//! backing lazily in fixed steps, and serves allocations by bumping a
//! cursor. Reclamation is wholesale: [`Arena::reset`] rewinds the
//! cursor in O(1) and dropping the arena returns the span to the OS.
//! Guard pages flank the usable range by default, so a stray access
//! just past either end faults instead of corrupting a neighbour.
//!
//! ```
//! use vmarena::Arena;
//!
//! let mut arena = Arena::new(1 << 20, 64 << 10)?;
//! let ptr = arena.alloc(64)?;
//! unsafe { ptr.as_ptr().write_bytes(0, 64) };
//! arena.reset(); // every allocation dies at once
//! # Ok::<(), vmarena::ArenaError>(())
//! ```

mod align;
pub mod arena;
pub mod logging;
mod platform;

// Re-export core types
pub use arena::{
    Arena, ArenaConfig, ArenaError, ArenaStats, ALIGNMENT, DEFAULT_COMMIT_STEP,
    DEFAULT_RESERVE_SIZE,
};
