use crate::foundation::core::{FrameRGBA, Point, Rect, Rgb8};
use crate::foundation::error::{SpiroError, SpiroResult};
use crate::foundation::math::{approx_eq, deg_to_rad, rand_range};
use crate::paint::cycle::ColorCycler;
use crate::render::state::{RenderState, StateCell};
use crate::render::surface::Surface;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Last iteration of a shape; stepping past it starts a new shape.
pub const I_MAX: u32 = 20_000;
/// Smallest rolling-circle radius.
pub const B_MIN: i64 = 5;
/// Largest rolling-circle radius.
pub const B_MAX: i64 = 200;
/// Radius and pen-offset scale of the companion trail.
pub const P2_OFFSET: f64 = 1.4;
/// Iteration at which the current position is saved and the shape counts as finished.
pub const SAVE_ITERATION: u32 = 400;
/// Hue-wheel units the pen colors advance per step.
pub const PEN_COLOR_STEP: u8 = 1;

/// Shape parameters of a hypotrochoid.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveParams {
    /// Fixed (outer) circle radius.
    pub ra: f64,
    /// Rolling (inner) circle radius.
    pub rb: f64,
    /// Pen offset from the rolling circle's center.
    pub ch: f64,
}

impl CurveParams {
    /// Check `ra > rb`, `rb ∈ [B_MIN, B_MAX]` and `ch ∈ [B_MIN/2, rb + B_MAX]`.
    pub fn validate(&self) -> SpiroResult<()> {
        let Self { ra, rb, ch } = *self;
        if !(ra.is_finite() && rb.is_finite() && ch.is_finite()) {
            return Err(SpiroError::validation("curve parameters must be finite"));
        }
        if ra <= rb {
            return Err(SpiroError::validation(format!(
                "outer radius {ra} must exceed inner radius {rb}"
            )));
        }
        if rb < B_MIN as f64 || rb > B_MAX as f64 {
            return Err(SpiroError::validation(format!(
                "inner radius {rb} outside [{B_MIN}, {B_MAX}]"
            )));
        }
        let ch_min = (B_MIN / 2) as f64;
        if ch < ch_min || ch > rb + B_MAX as f64 {
            return Err(SpiroError::validation(format!(
                "pen offset {ch} outside [{ch_min}, {}]",
                rb + B_MAX as f64
            )));
        }
        Ok(())
    }
}

/// Positions of the main trail and its companion at one iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TracePoints {
    /// Main hypotrochoid point.
    pub p1: Point,
    /// Phase-shifted companion point.
    pub p2: Point,
}

/// Evaluate both trails at iteration `i` (degrees).
///
/// The main trail is the classic hypotrochoid. The companion uses `rb·P2_OFFSET` and
/// `ch·P2_OFFSET`, with its rolling term lagging one degree behind.
pub fn trace(params: CurveParams, center: Point, i: i64) -> TracePoints {
    let CurveParams { ra, rb, ch } = params;
    let t = deg_to_rad(i);
    let ot = deg_to_rad(i - 1);

    let d1 = ra - rb;
    let x1 = center.x + (d1 * t.cos() + ch * ((d1 / rb) * t).cos());
    let y1 = center.y + (d1 * t.sin() + ch * ((d1 / rb) * t).sin());

    let rb2 = rb * P2_OFFSET;
    let ch2 = ch * P2_OFFSET;
    let d2 = ra - rb2;
    let x2 = center.x + (d2 * t.cos() + ch2 * ((d2 / rb2) * ot).cos());
    let y2 = center.y + (d2 * t.sin() + ch2 * ((d2 / rb2) * ot).sin());

    TracePoints {
        p1: Point::new(x1, y1),
        p2: Point::new(x2, y2),
    }
}

/// Center and usable radius derived from a surface's bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveGeometry {
    /// Drawing center.
    pub center: Point,
    /// 90% of half the shorter side, truncated to whole pixels.
    pub usable_radius: i64,
}

impl CurveGeometry {
    /// Derive geometry from `bounds`; rejects surfaces too small to hold a shape.
    pub fn from_bounds(bounds: Rect) -> SpiroResult<Self> {
        let w = bounds.width().max(0.0) as i64;
        let h = bounds.height().max(0.0) as i64;
        let usable_radius = ((w.min(h) / 2) as f64 * 0.9) as i64;
        if usable_radius < B_MIN + 2 {
            return Err(SpiroError::validation(format!(
                "surface {w}x{h} is too small for a curve (usable radius {usable_radius})"
            )));
        }
        Ok(Self {
            center: Point::new(bounds.x0 + (w / 2) as f64, bounds.y0 + (h / 2) as f64),
            usable_radius,
        })
    }

    /// Draw new parameters: `ra` first, then `rb < ra`, then `ch`.
    pub fn random_params(&self, rng: &mut StdRng) -> CurveParams {
        let ra_lo = ((self.usable_radius as f64 * 0.2) as i64).max(B_MIN + 1);
        let ra = rand_range(rng, ra_lo, self.usable_radius);
        let rb = rand_range(rng, B_MIN, B_MAX.min(ra));
        let ch = rand_range(rng, B_MIN / 2, rb + B_MAX);
        CurveParams {
            ra: ra as f64,
            rb: rb as f64,
            ch: ch as f64,
        }
    }
}

/// Tunables of a [`CurveEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveOpts {
    /// Per-axis tolerance for detecting a return to the starting point.
    pub closure_epsilon: f64,
    /// Color the surface is cleared to on every new shape.
    pub background: Rgb8,
}

impl Default for CurveOpts {
    fn default() -> Self {
        Self {
            closure_epsilon: 1e-9,
            background: Rgb8::BLACK,
        }
    }
}

/// Result of one [`CurveEngine::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// First iteration of a shape: the starting point was recorded.
    Seeded,
    /// Position recorded without drawing.
    Positioned,
    /// Both trail segments were drawn.
    Drawn,
    /// Segments were drawn and a trail returned to its starting point; the shape is complete.
    Closed,
}

/// Curve state carried by paint notifications.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PaintSnapshot {
    /// Main trail x.
    pub x1: f64,
    /// Main trail y.
    pub y1: f64,
    /// Companion trail x.
    pub x2: f64,
    /// Companion trail y.
    pub y2: f64,
    /// Iteration counter (degrees).
    pub iteration: u32,
    /// Iteration in radians.
    pub theta: f64,
    /// Outer radius.
    pub ra: f64,
    /// Inner radius.
    pub rb: f64,
    /// Pen offset.
    pub ch: f64,
}

/// Steps a two-trail hypotrochoid across a [`Surface`], one segment per call.
pub struct CurveEngine {
    geometry: CurveGeometry,
    opts: CurveOpts,
    state: Arc<StateCell>,
    rng: StdRng,

    params: CurveParams,
    i: u32,
    fresh: bool,
    t: f64,
    ot: f64,
    current: TracePoints,
    last: TracePoints,
    start: TracePoints,
    saved: TracePoints,
    finished: bool,

    pen1: ColorCycler,
    pen2: ColorCycler,
    pending_capture: Option<FrameRGBA>,
}

impl CurveEngine {
    /// Create an engine for a surface with `bounds`, drawing its first shape from `rng`.
    pub fn new(
        bounds: Rect,
        opts: CurveOpts,
        mut rng: StdRng,
        state: Arc<StateCell>,
    ) -> SpiroResult<Self> {
        if !(opts.closure_epsilon.is_finite() && opts.closure_epsilon >= 0.0) {
            return Err(SpiroError::validation(
                "closure epsilon must be finite and >= 0",
            ));
        }
        let geometry = CurveGeometry::from_bounds(bounds)?;
        let params = geometry.random_params(&mut rng);
        let pen1 = ColorCycler::new(Rgb8::random(&mut rng), PEN_COLOR_STEP);
        let pen2 = ColorCycler::new(Rgb8::random(&mut rng), PEN_COLOR_STEP);
        Ok(Self {
            geometry,
            opts,
            state,
            rng,
            params,
            i: 1,
            fresh: true,
            t: 0.0,
            ot: 0.0,
            current: TracePoints::default(),
            last: TracePoints::default(),
            start: TracePoints::default(),
            saved: TracePoints::default(),
            finished: false,
            pen1,
            pen2,
            pending_capture: None,
        })
    }

    /// Current shape parameters.
    pub fn params(&self) -> CurveParams {
        self.params
    }

    /// Replace the shape parameters, keeping the iteration counter.
    pub fn set_params(&mut self, params: CurveParams) -> SpiroResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Center and usable radius in use.
    pub fn geometry(&self) -> CurveGeometry {
        self.geometry
    }

    /// Iteration counter; the next step evaluates this value when a shape was just started.
    pub fn iteration(&self) -> u32 {
        self.i
    }

    /// Current angle and the one-degree-lagged companion angle, in radians.
    pub fn angles(&self) -> (f64, f64) {
        (self.t, self.ot)
    }

    /// Current trail positions.
    pub fn position(&self) -> TracePoints {
        self.current
    }

    /// Starting positions of the current shape.
    pub fn start_position(&self) -> TracePoints {
        self.start
    }

    /// Positions saved at [`SAVE_ITERATION`], reloaded by the next reset.
    pub fn saved_position(&self) -> TracePoints {
        self.saved
    }

    /// `true` once the current shape reached [`SAVE_ITERATION`].
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current pen colors.
    pub fn pen_colors(&self) -> (Rgb8, Rgb8) {
        (self.pen1.color(), self.pen2.color())
    }

    /// Snapshot for paint notifications.
    pub fn snapshot(&self) -> PaintSnapshot {
        PaintSnapshot {
            x1: self.current.p1.x,
            y1: self.current.p1.y,
            x2: self.current.p2.x,
            y2: self.current.p2.y,
            iteration: self.i,
            theta: self.t,
            ra: self.params.ra,
            rb: self.params.rb,
            ch: self.params.ch,
        }
    }

    /// Capture requested by the last reset, if any.
    pub fn take_capture(&mut self) -> Option<FrameRGBA> {
        self.pending_capture.take()
    }

    /// Adopt new surface bounds after a device reset.
    pub fn rebind(&mut self, bounds: Rect) -> SpiroResult<()> {
        self.geometry = CurveGeometry::from_bounds(bounds)?;
        Ok(())
    }

    /// Advance one iteration and draw the resulting segments.
    pub fn step(&mut self, surface: &mut dyn Surface) -> SpiroResult<StepOutcome> {
        self.state.set(RenderState::RenderInProgress);

        if self.fresh {
            self.fresh = false;
        } else {
            self.i += 1;
            if self.i > I_MAX {
                self.reset(surface)?;
                self.fresh = false;
            }
        }

        let i = i64::from(self.i);
        self.t = deg_to_rad(i);
        self.ot = deg_to_rad(i - 1);
        let pts = trace(self.params, self.geometry.center, i);
        self.current = pts;

        let outcome = if self.i == 1 {
            self.start = pts;
            StepOutcome::Seeded
        } else if self.i <= 2 {
            StepOutcome::Positioned
        } else {
            surface.draw_line(self.last.p1, pts.p1, self.pen1.color())?;
            surface.draw_line(self.last.p2, pts.p2, self.pen2.color())?;
            if self.returned_to_start(pts) {
                StepOutcome::Closed
            } else {
                StepOutcome::Drawn
            }
        };

        self.last = pts;

        if self.i == SAVE_ITERATION {
            self.state.set(RenderState::NotReady);
            self.saved = pts;
            self.finished = true;
        }

        self.pen1.advance();
        self.pen2.advance();
        Ok(outcome)
    }

    /// Start a new shape.
    ///
    /// Reloads the position saved by the previous shape, draws new parameters, queues a capture
    /// when the previous shape was finished, and clears the surface.
    #[tracing::instrument(skip_all, fields(from_iteration = self.i))]
    pub fn reset(&mut self, surface: &mut dyn Surface) -> SpiroResult<()> {
        self.state.set(RenderState::NotReady);
        self.current = self.saved;

        self.params = self.geometry.random_params(&mut self.rng);
        self.i = 1;
        self.fresh = true;

        if self.finished {
            self.pending_capture = surface.snapshot();
            self.finished = false;
            tracing::debug!(
                captured = self.pending_capture.is_some(),
                "finished shape queued for capture"
            );
        }
        surface.clear(self.opts.background)?;

        tracing::debug!(
            ra = self.params.ra,
            rb = self.params.rb,
            ch = self.params.ch,
            "new shape"
        );
        Ok(())
    }

    fn returned_to_start(&self, pts: TracePoints) -> bool {
        let eps = self.opts.closure_epsilon;
        approx_eq(pts.p1.x, self.start.p1.x, eps)
            || approx_eq(pts.p1.y, self.start.p1.y, eps)
            || approx_eq(pts.p2.x, self.start.p2.x, eps)
            || approx_eq(pts.p2.y, self.start.p2.y, eps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/engine.rs"]
mod tests;
