use super::*;
use crate::foundation::core::Point;
use crate::motion::point::AlphaFade;

fn area() -> Rect {
    Rect::new(0.0, 0.0, 320.0, 240.0)
}

fn filled(seed: u64, law: MotionLaw, n: usize) -> MotionPointCollection {
    let mut c = MotionPointCollection::new(seed);
    for _ in 0..n {
        c.spawn(area(), law, MotionSpeed::Default, Rgb8::WHITE);
    }
    c
}

#[test]
fn same_seed_spawns_same_points() {
    let a = filled(9, MotionLaw::Bounce, 20);
    let b = filled(9, MotionLaw::Bounce, 20);
    assert_eq!(a.len(), 20);
    assert!(a.iter().eq(b.iter()));

    let c = filled(10, MotionLaw::Bounce, 20);
    assert!(!a.iter().eq(c.iter()));
}

#[test]
fn spawned_points_share_the_generator() {
    let c = filled(1, MotionLaw::Snow, 2);
    assert_ne!(c.get(0).unwrap().position(), c.get(1).unwrap().position());
}

#[test]
fn step_all_advances_every_point() {
    let mut c = filled(2, MotionLaw::Rotate, 5);
    c.step_all();
    c.step_all();
    assert!(c.iter().all(|p| p.steps() == 2));
}

#[test]
fn cull_drops_dead_and_escaped_points() {
    let mut c = filled(3, MotionLaw::None, 3);
    let mortal = c.get_mut(0).unwrap();
    mortal.set_life(1);
    mortal.set_position(Point::new(50.0, 50.0));
    c.get_mut(1).unwrap().set_position(Point::new(-5.0, 10.0));
    c.get_mut(2).unwrap().set_position(Point::new(100.0, 100.0));
    c.step_all();
    assert_eq!(c.cull(), 1);
    c.step_all();
    assert_eq!(c.cull(), 1);
    assert_eq!(c.len(), 1);
    assert_eq!(c.get(0).unwrap().position().x, 100.0);
}

#[test]
fn remove_and_clear() {
    let mut c = filled(4, MotionLaw::Zoom, 3);
    assert!(c.remove(7).is_none());
    assert!(c.remove(0).is_some());
    assert_eq!(c.len(), 2);
    c.clear();
    assert!(c.is_empty());
}

#[test]
fn alpha_uses_the_shared_generator() {
    let mut c = filled(5, MotionLaw::Snow, 1);
    c.get_mut(0).unwrap().set_alpha_fade(AlphaFade::Linear);
    for _ in 0..20 {
        let a = c.alpha_level(0).unwrap();
        assert!((50..255).contains(&a));
    }
    assert!(c.alpha_level(3).is_none());

    let (points, rng) = c.parts_mut();
    assert!(points[0].alpha_level(rng) >= 50);
}
