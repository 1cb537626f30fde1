//! 1D gradient noise for lateral wobble
//!
//! Smooth, continuous and stateless: the same `x` always yields the same value,
//! so a bubble's wobble depends only on session time and its own phase offset.

/// Integer hash to a gradient in [-1, 1]
#[inline]
fn gradient(i: i32) -> f32 {
    let mut h = i as u32;
    h = h.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    (h & 0xffff) as f32 / 32767.5 - 1.0
}

/// Quintic fade curve
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Gradient noise in [-1, 1]; zero at every integer lattice point
pub fn noise1(x: f32) -> f32 {
    let i0 = x.floor();
    let t = x - i0;
    let i0 = i0 as i32;
    let g0 = gradient(i0) * t;
    let g1 = gradient(i0.wrapping_add(1)) * (t - 1.0);
    // Max magnitude of the blend is 0.5, rescale to the full range
    ((g0 + (g1 - g0) * fade(t)) * 2.0).clamp(-1.0, 1.0)
}
