//! Power-of-two alignment arithmetic
//!
//! Two users: arena construction rounds byte counts up to the OS page
//! size, and the allocation path rounds request sizes up to the fixed
//! 8-byte boundary. Both only ever pass power-of-two alignments.

/// Round `value` up to the next multiple of `align`.
///
/// `align` must be a power of two. Wraps when the rounded value does
/// not fit in `usize`; [`checked_align_up`] screens that case out.
#[inline(always)]
pub const fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    value.wrapping_add(align - 1) & !(align - 1)
}

/// Overflow-checked [`align_up`] for sizes that come from callers.
///
/// Returns `None` when `value` is close enough to `usize::MAX` that
/// rounding would wrap.
#[inline]
pub const fn checked_align_up(value: usize, align: usize) -> Option<usize> {
    if value > usize::MAX - (align - 1) {
        return None;
    }
    Some(align_up(value, align))
}

/// Whether `value` sits on an `align` boundary.
#[inline(always)]
pub const fn is_aligned(value: usize, align: usize) -> bool {
    debug_assert!(align.is_power_of_two());
    value & (align - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(7, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(9, 8), 16);
        assert_eq!(align_up(4095, 4096), 4096);
        assert_eq!(align_up(4097, 4096), 8192);
        // Largest input whose rounded value still fits
        assert_eq!(align_up(usize::MAX - 7, 8), usize::MAX - 7);
    }

    #[test]
    fn test_checked_align_up() {
        assert_eq!(checked_align_up(9, 8), Some(16));
        assert_eq!(checked_align_up(usize::MAX - 8, 8), Some(usize::MAX - 7));
        assert_eq!(checked_align_up(usize::MAX - 7, 8), Some(usize::MAX - 7));
        assert_eq!(checked_align_up(usize::MAX, 8), None);
        assert_eq!(checked_align_up(usize::MAX - 6, 8), None);
    }

    #[test]
    fn test_is_aligned() {
        assert!(is_aligned(0, 8));
        assert!(is_aligned(64, 8));
        assert!(!is_aligned(63, 8));
        assert!(is_aligned(4096, 4096));
        assert!(!is_aligned(4095, 4096));
    }
}
