//! Numeric helpers shared by timelines and their clients

/// Wrap `value` into the half-open range `[min, max)`
///
/// A degenerate range returns `min`.
pub fn wrap(min: f32, max: f32, value: f32) -> f32 {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return min;
    }
    let wrapped = (value - min).rem_euclid(range);
    // rem_euclid can round up to `range` for tiny negative inputs
    if wrapped >= range {
        min
    } else {
        min + wrapped
    }
}

/// Wrap a signed index into `[0, len)`
pub fn wrap_index(len: usize, index: isize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as isize) as usize
}

/// Round `value` to the nearest multiple of `step`
///
/// A non-positive step leaves the value untouched.
pub fn snap(step: f32, value: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}
