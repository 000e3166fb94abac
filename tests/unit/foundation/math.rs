use super::*;

#[test]
fn fnv_matches_the_reference_vector() {
    let mut h = Fnv1a64::new();
    h.write_bytes(b"a");
    assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn fnv_str_terminator_separates_fields() {
    let mut a = Fnv1a64::new();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn segment_distance_clamps_to_endpoints() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(10.0, 0.0);
    assert_eq!(closest_on_segment(Point::new(5.0, 3.0), a, b), Point::new(5.0, 0.0));
    assert_eq!(closest_on_segment(Point::new(-4.0, 3.0), a, b), a);
    assert_eq!(closest_on_segment(Point::new(2.0, 2.0), a, a), a);
}

#[test]
fn smoothstep_and_angle_delta() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
    let d = angle_delta(3.0, -3.0);
    assert!(d > 0.0 && d < 0.3);
    assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < 1e-12);
}
