use super::*;

#[test]
fn walks_the_primary_sextants() {
    assert_eq!(cycle_color(Rgb8::new(255, 0, 0), 5), Rgb8::new(255, 5, 0));
    assert_eq!(cycle_color(Rgb8::new(255, 255, 0), 5), Rgb8::new(250, 255, 0));
    assert_eq!(cycle_color(Rgb8::new(0, 255, 0), 5), Rgb8::new(0, 255, 5));
    assert_eq!(cycle_color(Rgb8::new(0, 255, 255), 5), Rgb8::new(0, 250, 255));
    assert_eq!(cycle_color(Rgb8::new(0, 0, 255), 5), Rgb8::new(5, 0, 255));
    assert_eq!(cycle_color(Rgb8::new(255, 0, 255), 5), Rgb8::new(255, 0, 250));
}

#[test]
fn grays_are_fixed_points() {
    let gray = Rgb8::new(90, 90, 90);
    assert_eq!(cycle_color(gray, 3), gray);
}

#[test]
fn full_cycle_returns_to_start_and_preserves_extremes() {
    let start = Rgb8::new(200, 40, 40);
    let mut cyc = ColorCycler::new(start, 1);
    // Hexagon perimeter is 6 * (hi - lo) unit steps.
    let period = 6 * (200 - 40);
    for _ in 0..period - 1 {
        let c = cyc.advance();
        assert_eq!(c.r.max(c.g).max(c.b), 200);
        assert_eq!(c.r.min(c.g).min(c.b), 40);
        assert_ne!(c, start);
    }
    assert_eq!(cyc.advance(), start);
}

#[test]
fn overshoot_clamps_to_the_extreme() {
    assert_eq!(cycle_color(Rgb8::new(255, 253, 0), 10), Rgb8::new(255, 255, 0));
}
