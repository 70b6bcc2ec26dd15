//! Stack growth for the recursive walks.
//!
//! Equality and duplication recurse once per nesting level of the value
//! being walked. Every recursive step goes through
//! [`ensure_sufficient_stack`], which grows the stack on native targets when
//! it runs low and is a plain call on `wasm32`.

/// Remaining stack below which a new segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than 100 KiB remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn test_passes_result_through() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
    }

    #[test]
    fn test_deep_recursion() {
        assert_eq!(depth(200_000), 200_000);
    }
}
