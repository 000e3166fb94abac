use super::*;

#[test]
fn derived_streams_are_reproducible_and_distinct() {
    let mut a = EffectRng::derive(7, "ember", 0);
    let mut b = EffectRng::derive(7, "ember", 0);
    let mut c = EffectRng::derive(7, "ember", 1);
    let xs: Vec<f64> = (0..8).map(|_| a.unit()).collect();
    let ys: Vec<f64> = (0..8).map(|_| b.unit()).collect();
    let zs: Vec<f64> = (0..8).map(|_| c.unit()).collect();
    assert_eq!(xs, ys);
    assert_ne!(xs, zs);
}

#[test]
fn ranges_stay_in_bounds() {
    let mut r = EffectRng::new(1);
    for _ in 0..1000 {
        let u = r.unit();
        assert!((0.0..1.0).contains(&u));
        let s = r.signed(4.0);
        assert!((-2.0..2.0).contains(&s));
        let v = r.range(3.0, 5.0);
        assert!((3.0..5.0).contains(&v));
        assert!(r.index(3) < 3);
    }
    assert_eq!(r.range(2.0, 2.0), 2.0);
    assert_eq!(r.index(0), 0);
    assert!(r.pick::<u8>(&[]).is_none());
}

#[test]
fn shuffle_keeps_elements() {
    let mut r = EffectRng::new(99);
    let mut v: Vec<u32> = (0..50).collect();
    r.shuffle(&mut v);
    let mut sorted = v.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..50).collect::<Vec<_>>());
}
