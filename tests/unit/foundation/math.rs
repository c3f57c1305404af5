use super::*;

#[test]
fn premultiply_zeroes_transparent_and_keeps_opaque() {
    let mut px = [10u8, 20, 30, 0, 40, 50, 60, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [0, 0, 0, 0, 40, 50, 60, 255]);
}

#[test]
fn unpremultiply_inverts_half_alpha_within_one_step() {
    let original = [200u8, 100, 50, 128];
    let mut px = original;
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    for c in 0..3 {
        assert!((i16::from(px[c]) - i16::from(original[c])).abs() <= 1);
    }
    assert_eq!(px[3], 128);
}
