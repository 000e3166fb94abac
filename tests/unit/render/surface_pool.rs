use super::*;

#[test]
fn pool_honors_bucket_cap() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: 1 << 30,
        max_surfaces_per_bucket: 1,
    });
    let a = p.borrow(8, 8).unwrap();
    let b = p.borrow(8, 8).unwrap();
    p.release(a);
    p.release(b);
    let st = p.stats();
    assert_eq!(st.retained_surfaces, 1);
    assert_eq!(st.alloc_surfaces, 2);
}

#[test]
fn pool_honors_global_byte_cap() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: 8 * 8 * 4,
        max_surfaces_per_bucket: 8,
    });
    let a = p.borrow(8, 8).unwrap();
    let b = p.borrow(8, 8).unwrap();
    p.release(a);
    p.release(b);
    let st = p.stats();
    assert_eq!(st.retained_bytes, 8 * 8 * 4);
    assert_eq!(st.retained_surfaces, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn reuse_avoids_allocation_and_clear_drops() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    let a = p.borrow(4, 4).unwrap();
    p.release(a);
    let _b = p.borrow(4, 4).unwrap();
    assert_eq!(p.stats().alloc_surfaces, 1);
    p.clear();
    assert_eq!(p.stats().retained_bytes, 0);
    assert!(p.borrow(70_000, 1).is_err());
}
