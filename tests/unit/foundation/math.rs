use super::*;

#[test]
fn mask_mix_endpoints() {
    assert_eq!(mask_mix(200, 10, 255), 200);
    assert_eq!(mask_mix(200, 10, 0), 10);
    assert_eq!(mask_mix(255, 0, 128), 128);
}

#[test]
fn luma_of_primaries() {
    assert_eq!(luma(255, 255, 255), 255);
    assert_eq!(luma(0, 0, 0), 0);
    assert_eq!(luma(255, 0, 0), 76);
    assert_eq!(luma(0, 255, 0), 150);
    assert_eq!(luma(0, 0, 255), 29);
}

#[test]
fn lerp_truncates_and_clamps() {
    assert_eq!(lerp_u8(255, 0, 0.5), 127);
    assert_eq!(lerp_u8(0, 255, 0.5), 127);
    assert_eq!(lerp_u8(10, 20, 0.0), 10);
    assert_eq!(lerp_u8(10, 20, 1.0), 20);
    assert_eq!(lerp_u8(0, 200, 2.0), 255);
    assert_eq!(lerp_u8(100, 200, -2.0), 0);
}

#[test]
fn lerp_absorbs_accumulated_step_error() {
    let mut alpha = 0.0;
    for _ in 0..10 {
        alpha += 0.1;
    }
    assert!(alpha < 1.0);
    assert_eq!(lerp_u8(0, 255, alpha), 255);
    assert_eq!(lerp_u8(200, 0, alpha), 0);

    let back = 1.0 - alpha;
    assert!(back > 0.0);
    assert_eq!(lerp_u8(6, 0, back), 6);
}
