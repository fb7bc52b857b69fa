use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 100.0)
}

fn point(law: MotionLaw, seed: u64) -> MotionPoint {
    let mut rng = StdRng::seed_from_u64(seed);
    MotionPoint::new(bounds(), law, MotionSpeed::Default, Rgb8::new(255, 0, 0), &mut rng)
}

fn advance(p: &mut MotionPoint, steps: usize) {
    for _ in 0..steps {
        p.move_point();
    }
}

#[test]
fn bounce_flips_at_right_edge_on_next_step() {
    let mut p = point(MotionLaw::Bounce, 1);
    p.set_position(Point::new(200.0, 50.0));
    p.set_velocity(Vec2::new(4.0, 1.0));
    assert_eq!(p.life(), 0);
    p.move_point();
    assert_eq!(p.velocity().x, -4.0);
    p.move_point();
    assert_eq!(p.position().x, 200.0);
}

#[test]
fn bounce_reflects_into_the_interior_at_left_and_top() {
    let mut p = point(MotionLaw::Bounce, 2);
    p.set_position(Point::new(2.0, 1.0));
    p.set_velocity(Vec2::new(-3.0, -2.0));
    p.move_point();
    assert_eq!(p.velocity(), Vec2::new(3.0, 2.0));
    // Already heading inward: no further flip.
    p.move_point();
    assert_eq!(p.velocity(), Vec2::new(3.0, 2.0));
}

#[test]
fn bounce_never_starts_at_rest() {
    for seed in 0..200 {
        let p = point(MotionLaw::Bounce, seed);
        assert_ne!(p.velocity().x, 0.0);
        assert_ne!(p.velocity().y, 0.0);
        assert!(p.velocity().x.abs() <= 5.0 && p.velocity().y.abs() <= 5.0);
    }
}

#[test]
fn alpha_stays_in_range_at_window_boundaries() {
    let life = 100;
    for law in MotionLaw::ALL {
        for fade in [AlphaFade::None, AlphaFade::Linear, AlphaFade::Logarithmic] {
            let mut p = point(law, 3);
            p.set_alpha_fade(fade);
            p.set_life(life);
            p.set_fade_in(10);
            p.set_fade_out(20);
            let mut rng = StdRng::seed_from_u64(4);
            for _ in 0..=(life + 5) {
                let a = p.alpha_level(&mut rng);
                if fade == AlphaFade::None {
                    assert_eq!(a, 255);
                }
                p.move_point();
            }
        }
    }
}

#[test]
fn linear_fade_ramps_in_and_out() {
    let mut p = point(MotionLaw::None, 5);
    p.set_alpha_fade(AlphaFade::Linear);
    p.set_life(100);
    p.set_fade_in(10);
    p.set_fade_out(20);
    let mut rng = StdRng::seed_from_u64(0);

    let mut at = |p: &mut MotionPoint, step: i64| {
        while p.steps() < step {
            p.move_point();
        }
        p.alpha_level(&mut rng)
    };
    assert_eq!(at(&mut p, 0), 0);
    assert_eq!(at(&mut p, 9), (9 * 255 / 10) as u8);
    assert_eq!(at(&mut p, 10), 128);
    assert_eq!(at(&mut p, 80), 128);
    assert_eq!(at(&mut p, 81), 255 - 255 / 20);
    assert_eq!(at(&mut p, 100), 0);
    assert_eq!(at(&mut p, 101), 0);
}

#[test]
fn zoom_alpha_ramps_with_steps_and_saturates() {
    let mut p = point(MotionLaw::Zoom, 6);
    p.set_alpha_fade(AlphaFade::Linear);
    let mut rng = StdRng::seed_from_u64(0);
    advance(&mut p, 20);
    assert_eq!(p.alpha_level(&mut rng), 60);
    advance(&mut p, 80);
    assert_eq!(p.alpha_level(&mut rng), 255);
}

#[test]
fn directional_alpha_follows_speed() {
    let mut p = point(MotionLaw::FromTop, 7);
    p.set_alpha_fade(AlphaFade::Linear);
    p.set_velocity(Vec2::new(1.0, 4.0));
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(p.alpha_level(&mut rng), 102);
    p.set_velocity(Vec2::new(1.0, -2.5));
    // Ties round to even.
    assert_eq!(p.alpha_level(&mut rng), 51);
}

#[test]
fn fade_out_without_window_keeps_base_level() {
    let mut p = point(MotionLaw::None, 8);
    p.set_alpha_fade(AlphaFade::Linear);
    p.set_life(5);
    advance(&mut p, 10);
    assert_eq!(p.alpha_level(&mut StdRng::seed_from_u64(0)), 128);
}

#[test]
fn alive_until_steps_pass_life() {
    let mut p = point(MotionLaw::None, 9);
    p.set_life(10);
    advance(&mut p, 10);
    assert!(p.is_alive());
    p.move_point();
    assert!(!p.is_alive());

    let mut immortal = point(MotionLaw::None, 9);
    advance(&mut immortal, 10_000);
    assert!(immortal.is_alive());
}

#[test]
fn visibility_is_strict() {
    let mut p = point(MotionLaw::None, 10);
    p.set_position(Point::new(100.0, 50.0));
    assert!(p.is_visible());
    for edge in [
        Point::new(0.0, 50.0),
        Point::new(200.0, 50.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
    ] {
        p.set_position(edge);
        assert!(!p.is_visible(), "{edge:?}");
    }
}

#[test]
fn rotate_traces_a_periodic_circle() {
    let mut p = point(MotionLaw::Rotate, 11);
    assert_eq!(p.rotation_precision(), 2);
    let r = p.rotation_radius();
    assert!((2.0..100.0).contains(&r));
    let c = bounds().center();
    let period = (60 + p.rotation_offset()) as usize;

    let mut first = Vec::new();
    for _ in 0..period {
        p.move_point();
        assert!(((p.position() - c).hypot() - r).abs() < 1e-9);
        first.push(p.position());
    }
    for expected in first {
        p.move_point();
        assert!((p.position() - expected).hypot() < 1e-9);
    }
}

#[test]
fn rotation_precision_is_clamped() {
    let mut p = point(MotionLaw::Rotate, 12);
    let mut rng = StdRng::seed_from_u64(1);
    p.set_rotation_precision(0, &mut rng);
    assert_eq!(p.rotation_precision(), 1);
    assert!(p.rotation_offset() < 30);
    p.set_rotation_precision(99, &mut rng);
    assert_eq!(p.rotation_precision(), 10);
    assert!(p.rotation_offset() < 300);
}

#[test]
fn directional_points_enter_on_their_edge() {
    for seed in 0..50 {
        let p = point(MotionLaw::FromLeft, seed);
        assert_eq!(p.position().x, 0.0);
        let q = point(MotionLaw::FromRight, seed);
        assert_eq!(q.position().x, 200.0);
        let r = point(MotionLaw::FromTop, seed);
        assert_eq!(r.position().y, 0.0);
        let s = point(MotionLaw::FromBottom, seed);
        assert_eq!(s.position().y, 100.0);
        for v in [p.velocity(), q.velocity(), r.velocity(), s.velocity()] {
            assert!((1.0..10.0).contains(&v.x) && (1.0..10.0).contains(&v.y));
        }
    }
}

#[test]
fn from_left_and_top_move_along_their_axis() {
    let mut p = point(MotionLaw::FromLeft, 13);
    let start = p.position();
    let v = p.velocity();
    advance(&mut p, 3);
    assert_eq!(p.position(), Point::new(start.x + 3.0 * v.x, start.y));

    let mut p = point(MotionLaw::FromTop, 13);
    let start = p.position();
    let v = p.velocity();
    advance(&mut p, 3);
    assert_eq!(p.position(), Point::new(start.x, start.y + 3.0 * v.y));
}

#[test]
fn from_right_and_bottom_cancel_their_velocity() {
    for law in [MotionLaw::FromRight, MotionLaw::FromBottom] {
        let mut p = point(law, 14);
        let start = p.position();
        advance(&mut p, 5);
        assert_eq!(p.position(), start);
    }
    let mut p = point(MotionLaw::FromRight, 14);
    p.move_point();
    assert_eq!(p.velocity().x, 0.0);
    let mut p = point(MotionLaw::FromBottom, 14);
    p.move_point();
    assert_eq!(p.velocity().y, 0.0);
}

#[test]
fn snow_keeps_drifting_past_the_edge() {
    let mut p = point(MotionLaw::Snow, 15);
    let v = p.velocity();
    assert!((1.0..5.0).contains(&v.x) && (1.0..5.0).contains(&v.y));
    p.set_position(Point::new(199.0, 10.0));
    advance(&mut p, 3);
    assert_eq!(p.velocity(), v);
    assert!(p.position().x > 200.0);
}

#[test]
fn zoom_starts_away_from_center_and_accelerates() {
    let mut p = point(MotionLaw::Zoom, 16);
    let c = p.center();
    let start = p.position();
    assert_eq!(p.velocity(), (start - c) / 2.0);

    let v = p.velocity();
    p.move_point();
    let expected_x = start.x + ((v.x + 10.0) / 10.0) * sign(v.x) - 1.0;
    assert!((p.position().x - expected_x).abs() < 1e-9);
}

#[test]
fn life_variance_is_capped_by_life() {
    let mut p = point(MotionLaw::None, 17);
    let mut rng = StdRng::seed_from_u64(2);
    p.set_life(10);
    p.set_life_variance(50, &mut rng);
    assert_eq!(p.life_variance(), 10);
    assert!((0..20).contains(&p.life()));
}

#[test]
fn life_variance_near_the_limit_does_not_overflow() {
    let mut p = point(MotionLaw::None, 17);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        p.set_life(i64::MAX);
        p.set_life_variance(i64::MAX, &mut rng);
        assert_eq!(p.life_variance(), i64::MAX);
        assert!(p.life() >= 0);
    }
}

#[test]
fn long_fade_in_ramps_without_overflow() {
    let mut p = point(MotionLaw::None, 5);
    let mut rng = StdRng::seed_from_u64(0);
    p.set_alpha_fade(AlphaFade::Linear);
    p.set_fade_in(i64::MAX);
    p.steps = i64::MAX / 2;
    assert_eq!(p.alpha_level(&mut rng), 127);
    p.steps = i64::MAX - 1;
    assert_eq!(p.alpha_level(&mut rng), 254);
}

#[test]
fn ellipse_is_centered_on_whole_pixels() {
    let mut p = point(MotionLaw::None, 18);
    p.set_position(Point::new(10.7, 20.2));
    assert_eq!(p.ellipse(4), Rect::new(8.0, 18.0, 12.0, 22.0));
}

#[test]
fn color_cycles_only_when_enabled() {
    let mut p = point(MotionLaw::None, 19);
    p.move_point();
    assert_eq!(p.color(), Rgb8::new(255, 0, 0));
    p.set_cycle_color(true);
    p.move_point();
    assert_eq!(p.color(), Rgb8::new(255, 1, 0));
}

#[test]
fn parses_law_names() {
    assert_eq!("bounce".parse::<MotionLaw>().unwrap(), MotionLaw::Bounce);
    assert_eq!("From-Left".parse::<MotionLaw>().unwrap(), MotionLaw::FromLeft);
    assert!("sideways".parse::<MotionLaw>().is_err());
    assert_eq!(MotionSpeed::Warp.value(), 40);
}

#[test]
fn same_seed_same_point() {
    assert_eq!(point(MotionLaw::Rotate, 20), point(MotionLaw::Rotate, 20));
}
