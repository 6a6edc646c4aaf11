/// Clamp `value` into `[min, max]`. A NaN input collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(value))
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse of `lerp`. Returns 0 for a degenerate interval.
pub fn inv_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    (value - a) / (b - a)
}

/// Cubic Hermite ramp from 0 at `edge0` to 1 at `edge1`.
pub fn smooth_step(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = clamp(inv_lerp(edge0, edge1, x), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
