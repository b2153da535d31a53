use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in [Ease::Linear, Ease::OutCubic] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(3.0), 1.0);
    }
}

#[test]
fn out_cubic_decelerates() {
    let a = Ease::OutCubic.apply(0.25);
    let b = Ease::OutCubic.apply(0.5);
    let c = Ease::OutCubic.apply(0.75);
    assert!(a < b && b < c);
    assert!(a - 0.0 > c - b);
    assert_eq!(b, 0.875);
}

#[test]
fn lerp_follows_curve() {
    assert_eq!(Ease::OutCubic.lerp(592.0, 432.0, 0.0), 592.0);
    assert_eq!(Ease::OutCubic.lerp(592.0, 432.0, 1.0), 432.0);
    assert_eq!(Ease::Linear.lerp(0.0, 10.0, 0.5), 5.0);
}
