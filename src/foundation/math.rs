/// Weighted mix `(src * m + dst * (255 - m)) / 255`, rounded.
pub(crate) fn mask_mix(src: u8, dst: u8, m: u8) -> u8 {
    let m = u16::from(m);
    let num = u32::from(src) * u32::from(m) + u32::from(dst) * u32::from(255 - m);
    ((num + 127) / 255) as u8
}

/// ITU-R 601-2 luma transform.
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114;
    ((y + 500) / 1000) as u8
}

/// Linear interpolation `a + alpha * (b - a)`, truncated toward zero and clamped.
///
/// Evaluated in single precision, so an alpha accumulated from tween steps lands
/// on the endpoint colors. `alpha` outside `[0, 1]` extrapolates.
pub(crate) fn lerp_u8(a: u8, b: u8, alpha: f64) -> u8 {
    let a = f32::from(a);
    let v = a + alpha as f32 * (f32::from(b) - a);
    v.trunc().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
