//! Hue-wheel color cycling for the curve pens.

use crate::foundation::core::Rgb8;

/// Advance `c` one step around the hue hexagon.
///
/// The brightest and darkest channel values are preserved; the remaining channel walks
/// red → yellow → green → cyan → blue → magenta → red, `step` units at a time. Grays (all channels
/// equal) are fixed points.
pub fn cycle_color(c: Rgb8, step: u8) -> Rgb8 {
    let (mut r, mut g, mut b) = (i16::from(c.r), i16::from(c.g), i16::from(c.b));
    let hi = r.max(g).max(b);
    let lo = r.min(g).min(b);
    if hi == lo {
        return c;
    }
    let s = i16::from(step);

    if r == hi && b == lo && g < hi {
        g = (g + s).min(hi);
    } else if g == hi && b == lo && r > lo {
        r = (r - s).max(lo);
    } else if g == hi && r == lo && b < hi {
        b = (b + s).min(hi);
    } else if b == hi && r == lo && g > lo {
        g = (g - s).max(lo);
    } else if b == hi && g == lo && r < hi {
        r = (r + s).min(hi);
    } else if r == hi && g == lo && b > lo {
        b = (b - s).max(lo);
    }

    Rgb8::new(r as u8, g as u8, b as u8)
}

/// A pen color that advances around the hue wheel once per curve step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorCycler {
    color: Rgb8,
    step: u8,
}

impl ColorCycler {
    /// Start cycling from `color`, moving `step` channel units per call to [`Self::advance`].
    pub fn new(color: Rgb8, step: u8) -> Self {
        Self { color, step }
    }

    /// Current color.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Move to the next color and return it.
    pub fn advance(&mut self) -> Rgb8 {
        self.color = cycle_color(self.color, self.step);
        self.color
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/cycle.rs"]
mod tests;
