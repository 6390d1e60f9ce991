//! Advisory computations
//!
//! Plain host code with loops and early exits. Nothing computed here is
//! trusted: every gadget that consumes one of these results re-derives it with
//! constraints. The same functions drive native witness generation.

/// Positions tagged with `group`.
pub fn is_capture<T: PartialEq>(capture_ids: &[T], group: &T) -> Vec<bool> {
    capture_ids.iter().map(|id| id == group).collect()
}

/// Forward scan: set from the group's start position onwards.
pub fn capture_start_mask(is_capture: &[bool], capture_starts: &[bool]) -> Vec<bool> {
    let mut mask = Vec::with_capacity(is_capture.len());
    let mut seen = false;
    for (&tagged, &start) in is_capture.iter().zip(capture_starts) {
        seen |= tagged && start;
        mask.push(seen);
    }
    mask
}

/// Backward scan: set up to and including the group's end position.
pub fn capture_end_mask(is_capture: &[bool], capture_starts: &[bool]) -> Vec<bool> {
    let mut mask = vec![false; is_capture.len()];
    let mut seen = false;
    for j in (0..is_capture.len()).rev() {
        seen |= is_capture[j] && !capture_starts[j];
        mask[j] = seen;
    }
    mask
}

pub fn capture_mask(start_mask: &[bool], end_mask: &[bool]) -> Vec<bool> {
    start_mask.iter().zip(end_mask).map(|(s, e)| *s && *e).collect()
}

/// Full single-group pipeline: the interval selected for `group`.
pub fn capture_mask_for<T: PartialEq>(capture_ids: &[T], capture_starts: &[bool], group: &T) -> Vec<bool> {
    let tagged = is_capture(capture_ids, group);
    capture_mask(
        &capture_start_mask(&tagged, capture_starts),
        &capture_end_mask(&tagged, capture_starts),
    )
}

/// Masked-in bytes in haystack order, stopping once `capacity` is filled.
pub fn extract_substring<T: Copy>(haystack: &[T], mask: &[bool], capacity: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(capacity);
    for (byte, _) in haystack.iter().zip(mask).filter(|(_, m)| **m) {
        if out.len() == capacity {
            break;
        }
        out.push(*byte);
    }
    out
}

/// First masked position, if any.
pub fn first_masked(mask: &[bool]) -> Option<usize> {
    mask.iter().position(|m| *m)
}

/// `out[i] = input[start + i]` for `i < length` (and in range), default otherwise.
pub fn select_subarray<T: Copy + Default>(input: &[T], start: usize, length: usize, capacity: usize) -> Vec<T> {
    (0..capacity)
        .map(|i| {
            if i < length {
                start
                    .checked_add(i)
                    .and_then(|idx| input.get(idx))
                    .copied()
                    .unwrap_or_default()
            } else {
                T::default()
            }
        })
        .collect()
}
