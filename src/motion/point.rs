//! Single particle under one of several motion laws.

use crate::foundation::core::{Point, Rect, Rgb8, Vec2};
use crate::foundation::error::SpiroError;
use crate::foundation::math::{rand_range, sign};
use crate::paint::cycle::cycle_color;
use rand::Rng;
use std::str::FromStr;

/// Base rotation precision unit; the effective precision is `precision * ROT_UNIT`.
const ROT_UNIT: i64 = 30;

/// How a point moves on each step.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MotionLaw {
    #[default]
    None,
    Bounce,
    Zoom,
    Rotate,
    Snow,
    FromLeft,
    FromRight,
    FromTop,
    FromBottom,
}

impl MotionLaw {
    pub const ALL: [MotionLaw; 9] = [
        MotionLaw::None,
        MotionLaw::Bounce,
        MotionLaw::Zoom,
        MotionLaw::Rotate,
        MotionLaw::Snow,
        MotionLaw::FromLeft,
        MotionLaw::FromRight,
        MotionLaw::FromTop,
        MotionLaw::FromBottom,
    ];

    /// `true` for the laws that enter from an edge of the origin bounds.
    pub fn is_directional(self) -> bool {
        matches!(
            self,
            MotionLaw::FromLeft | MotionLaw::FromRight | MotionLaw::FromTop | MotionLaw::FromBottom
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            MotionLaw::None => "none",
            MotionLaw::Bounce => "bounce",
            MotionLaw::Zoom => "zoom",
            MotionLaw::Rotate => "rotate",
            MotionLaw::Snow => "snow",
            MotionLaw::FromLeft => "from_left",
            MotionLaw::FromRight => "from_right",
            MotionLaw::FromTop => "from_top",
            MotionLaw::FromBottom => "from_bottom",
        }
    }
}

impl FromStr for MotionLaw {
    type Err = SpiroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        MotionLaw::ALL
            .into_iter()
            .find(|l| l.name() == norm)
            .ok_or_else(|| SpiroError::validation(format!("unknown motion law '{s}'")))
    }
}

/// Speed tier; the discriminant is the tier's scalar.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MotionSpeed {
    VerySlow = 2,
    Slow = 5,
    #[default]
    Default = 10,
    Fast = 20,
    VeryFast = 30,
    Warp = 40,
}

impl MotionSpeed {
    pub fn value(self) -> i64 {
        self as i64
    }
}

/// Alpha fade policy.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlphaFade {
    /// Always fully opaque.
    #[default]
    None,
    Linear,
    /// Currently ramps the same way as [`AlphaFade::Linear`].
    Logarithmic,
}

/// A particle with position, velocity, lifecycle and fade state.
///
/// Randomness is drawn from a generator passed in by the caller, normally the one owned by a
/// [`MotionPointCollection`](crate::motion::collection::MotionPointCollection).
#[derive(Clone, Debug, PartialEq)]
pub struct MotionPoint {
    pos: Point,
    vel: Vec2,
    center: Point,
    origin: Rect,
    draw: Rect,
    law: MotionLaw,
    speed: MotionSpeed,
    color: Rgb8,
    cycle_color: bool,
    bubble: bool,
    fade: AlphaFade,
    life: i64,
    life_variance: i64,
    fade_in: i64,
    fade_out: i64,
    rot_prec: i64,
    rot_offset: i64,
    radius: f64,
    steps: i64,
}

impl MotionPoint {
    /// Place a new point inside `origin` according to `law`.
    ///
    /// Directional laws start on their entry edge with a speed of `1..10` on both axes; the
    /// other laws start at a random position inside `origin`.
    pub fn new(
        origin: Rect,
        law: MotionLaw,
        speed: MotionSpeed,
        color: Rgb8,
        rng: &mut impl Rng,
    ) -> Self {
        let mut p = Self {
            pos: Point::ZERO,
            vel: Vec2::ZERO,
            center: origin.center(),
            origin,
            draw: origin,
            law,
            speed,
            color,
            cycle_color: false,
            bubble: false,
            fade: AlphaFade::None,
            life: 0,
            life_variance: 0,
            fade_in: 0,
            fade_out: 0,
            rot_prec: ROT_UNIT,
            rot_offset: 0,
            radius: 0.0,
            steps: 0,
        };

        let (left, right) = (origin.x0 as i64, origin.x1 as i64);
        let (top, bottom) = (origin.y0 as i64, origin.y1 as i64);

        if law.is_directional() {
            p.pos = match law {
                MotionLaw::FromLeft => Point::new(origin.x0, rand_range(rng, top, bottom) as f64),
                MotionLaw::FromRight => Point::new(origin.x1, rand_range(rng, top, bottom) as f64),
                MotionLaw::FromTop => Point::new(rand_range(rng, left, right) as f64, origin.y0),
                _ => Point::new(rand_range(rng, left, right) as f64, origin.y1),
            };
            p.vel = Vec2::new(
                rand_range(rng, 1, 10) as f64,
                rand_range(rng, 1, 10) as f64,
            );
            return p;
        }

        p.pos = Point::new(
            rand_range(rng, left, right) as f64,
            rand_range(rng, top, bottom) as f64,
        );
        match law {
            MotionLaw::Zoom => {
                p.vel = (p.pos - p.center) / 2.0;
            }
            MotionLaw::Bounce => {
                let mut axis = |pos: f64, mid: f64| {
                    let v = (rand_range(rng, 0, 10) - 5) as f64;
                    if v != 0.0 {
                        v
                    } else if sign(mid - pos) != 0.0 {
                        sign(mid - pos)
                    } else {
                        1.0
                    }
                };
                let vx = axis(p.pos.x, p.center.x);
                let vy = axis(p.pos.y, p.center.y);
                p.vel = Vec2::new(vx, vy);
            }
            MotionLaw::Snow => {
                p.vel = Vec2::new(rand_range(rng, 1, 5) as f64, rand_range(rng, 1, 5) as f64);
            }
            MotionLaw::Rotate => {
                p.set_rotation_precision(2, rng);
                p.radius = rand_range(rng, 2, (origin.width() / 2.0) as i64) as f64;
                p.rot_offset = rand_range(rng, 0, p.rot_prec * 2);
            }
            _ => {}
        }
        p
    }

    /// Advance one step under the point's motion law.
    pub fn move_point(&mut self) {
        self.steps += 1;
        let d = self.draw;
        match self.law {
            MotionLaw::None => {}
            MotionLaw::Bounce => {
                self.pos.x += self.vel.x;
                if self.pos.x >= d.x1 {
                    self.vel.x = -self.vel.x.abs();
                } else if self.pos.x <= d.x0 {
                    self.vel.x = self.vel.x.abs();
                }
                self.pos.y += self.vel.y;
                if self.pos.y >= d.y1 {
                    self.vel.y = -self.vel.y.abs();
                } else if self.pos.y <= d.y0 {
                    self.vel.y = self.vel.y.abs();
                }
            }
            MotionLaw::Snow => {
                // Reapplies the velocity's own sign, so the drift never reverses.
                self.pos.x += self.vel.x;
                if self.pos.x >= d.x1 {
                    self.vel.x *= sign(self.vel.x);
                }
                self.pos.y += self.vel.y;
                if self.pos.y >= d.x1 || self.pos.y <= d.x0 {
                    self.vel.y *= sign(self.vel.y);
                }
            }
            MotionLaw::Zoom => {
                let ramp = (self.steps / 10).max(1) as f64;
                let s = self.speed.value() as f64;
                self.pos.x += ((self.vel.x + s) / 10.0) * (ramp * sign(self.vel.x)) - 1.0;
                self.pos.y += ((self.vel.y + s) / 10.0) * (ramp * sign(self.vel.y)) - 1.0;
            }
            MotionLaw::Rotate => {
                let period = self.rot_prec + self.rot_offset;
                let mut t = self.steps + self.rot_offset;
                if t > period {
                    t = (t - 1) % period + 1;
                }
                let a = std::f64::consts::PI * t as f64 / (period / 2) as f64;
                let c = d.center();
                self.pos = Point::new(c.x + self.radius * a.sin(), c.y + self.radius * a.cos());
            }
            MotionLaw::FromLeft => self.pos.x += self.vel.x,
            MotionLaw::FromTop => self.pos.y += self.vel.y,
            // Velocity is cancelled against itself; the point stays where it entered.
            MotionLaw::FromRight => self.vel.x -= self.vel.x,
            MotionLaw::FromBottom => self.vel.y -= self.vel.y,
        }
        if self.cycle_color {
            self.color = cycle_color(self.color, 1);
        }
    }

    /// Opacity for the current step, in `0..=255`.
    ///
    /// Snow draws a random base level from `rng`; the other laws do not touch it.
    pub fn alpha_level(&self, rng: &mut impl Rng) -> u8 {
        if self.fade == AlphaFade::None {
            return u8::MAX;
        }
        let mut alpha: i64 = match self.law {
            MotionLaw::Zoom => self.steps.saturating_mul(3),
            MotionLaw::Snow => rand_range(rng, 50, 255),
            MotionLaw::FromTop | MotionLaw::FromBottom => {
                (self.vel.y.abs().round_ties_even() as i64).saturating_mul(255) / 10
            }
            MotionLaw::FromLeft | MotionLaw::FromRight => {
                (self.vel.x.abs().round_ties_even() as i64).saturating_mul(255) / 10
            }
            _ => 128,
        };

        if self.steps < self.fade_in {
            alpha = (i128::from(self.steps) * 255 / i128::from(self.fade_in)) as i64;
        } else if self.fade_out > 0 && self.life > 0 && self.steps > self.life - self.fade_out {
            let into = self.steps - (self.life - self.fade_out);
            alpha = 255 - into.saturating_mul(255) / self.fade_out;
        }
        alpha.clamp(0, 255) as u8
    }

    /// `false` once a life span is set and the step count has passed it.
    pub fn is_alive(&self) -> bool {
        !(self.life > 0 && self.steps > self.life)
    }

    /// Strictly inside the draw bounds.
    pub fn is_visible(&self) -> bool {
        let d = self.draw;
        self.pos.x > d.x0 && self.pos.x < d.x1 && self.pos.y > d.y0 && self.pos.y < d.y1
    }

    /// Square of side `diameter` around the point, on whole-pixel coordinates.
    pub fn ellipse(&self, diameter: i64) -> Rect {
        let half = diameter / 2;
        let x = (self.pos.x - half as f64) as i64 as f64;
        let y = (self.pos.y - half as f64) as i64 as f64;
        Rect::new(x, y, x + diameter as f64, y + diameter as f64)
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn set_position(&mut self, pos: Point) {
        self.pos = pos;
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Center of the origin bounds.
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn origin_bounds(&self) -> Rect {
        self.origin
    }

    pub fn draw_bounds(&self) -> Rect {
        self.draw
    }

    pub fn set_draw_bounds(&mut self, bounds: Rect) {
        self.draw = bounds;
    }

    pub fn law(&self) -> MotionLaw {
        self.law
    }

    pub fn set_law(&mut self, law: MotionLaw) {
        self.law = law;
    }

    pub fn speed(&self) -> MotionSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: MotionSpeed) {
        self.speed = speed;
    }

    pub fn color(&self) -> Rgb8 {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb8) {
        self.color = color;
    }

    pub fn cycles_color(&self) -> bool {
        self.cycle_color
    }

    pub fn set_cycle_color(&mut self, on: bool) {
        self.cycle_color = on;
    }

    /// Carried for hosts that render bubble-style motion; not used by [`Self::move_point`].
    pub fn bubble(&self) -> bool {
        self.bubble
    }

    pub fn set_bubble(&mut self, on: bool) {
        self.bubble = on;
    }

    pub fn alpha_fade(&self) -> AlphaFade {
        self.fade
    }

    pub fn set_alpha_fade(&mut self, fade: AlphaFade) {
        self.fade = fade;
    }

    /// Steps taken so far.
    pub fn steps(&self) -> i64 {
        self.steps
    }

    /// Life span in steps; `0` is immortal.
    pub fn life(&self) -> i64 {
        self.life
    }

    /// Negative spans are stored as `0`.
    pub fn set_life(&mut self, life: i64) {
        self.life = life.max(0);
    }

    pub fn life_variance(&self) -> i64 {
        self.life_variance
    }

    /// Cap the variance at the current life span and jitter the span by up to that much.
    pub fn set_life_variance(&mut self, variance: i64, rng: &mut impl Rng) {
        let var = variance.clamp(0, self.life);
        self.life_variance = var;
        let offset = rand_range(rng, 0, var.saturating_mul(2));
        self.life = (self.life - var).saturating_add(offset).max(0);
    }

    pub fn fade_in(&self) -> i64 {
        self.fade_in
    }

    pub fn set_fade_in(&mut self, steps: i64) {
        self.fade_in = steps.max(0);
    }

    pub fn fade_out(&self) -> i64 {
        self.fade_out
    }

    pub fn set_fade_out(&mut self, steps: i64) {
        self.fade_out = steps.max(0);
    }

    /// Rotation precision in `1..=10`.
    pub fn rotation_precision(&self) -> i64 {
        self.rot_prec / ROT_UNIT
    }

    /// Clamp `precision` to `1..=10` and pick a new random rotation offset.
    pub fn set_rotation_precision(&mut self, precision: i64, rng: &mut impl Rng) {
        self.rot_prec = precision.clamp(1, 10) * ROT_UNIT;
        self.rot_offset = rand_range(rng, 0, self.rot_prec);
    }

    pub fn rotation_offset(&self) -> i64 {
        self.rot_offset
    }

    pub fn set_rotation_offset(&mut self, offset: i64) {
        self.rot_offset = offset.max(0);
    }

    pub fn rotation_radius(&self) -> f64 {
        self.radius
    }

    pub fn set_rotation_radius(&mut self, radius: f64) {
        self.radius = radius;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/point.rs"]
mod tests;
