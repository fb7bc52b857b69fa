//! Spiralific draws endlessly changing spirograph curves and simulates simple particle motion.
//!
//! - A [`Spirograph`] render loop drives a [`CurveEngine`] on its own thread, drawing onto any
//!   [`Surface`] handed out by a [`DeviceProvider`].
//! - [`MotionPoint`]s move under one of several [`MotionLaw`]s with a birth/fade/death lifecycle,
//!   grouped in a [`MotionPointCollection`] that owns their random source.
#![forbid(unsafe_code)]

mod foundation;

pub mod curve;
pub mod motion;
pub mod paint;
pub mod render;
pub mod session;

pub use crate::foundation::core::{FrameRGBA, Point, Rect, Rgb8, Vec2};
pub use crate::foundation::error::{SpiroError, SpiroResult};

pub use crate::curve::engine::{CurveEngine, CurveGeometry, CurveOpts, CurveParams, StepOutcome};
pub use crate::motion::collection::MotionPointCollection;
pub use crate::motion::point::{AlphaFade, MotionLaw, MotionPoint, MotionSpeed};
pub use crate::paint::cycle::{ColorCycler, cycle_color};
pub use crate::render::capture::{CaptureDispatcher, CaptureSink, PngDirSink};
pub use crate::render::pixmap::{PixmapCanvas, PixmapDevice, PixmapSurface};
pub use crate::render::state::{RenderState, StateCell};
pub use crate::render::surface::{AlwaysVisible, DeviceProvider, Surface, VisibilityOracle};
pub use crate::session::config::EngineOpts;
pub use crate::session::observer::{NoopObserver, PaintSnapshot, RenderObserver, TracingObserver};
pub use crate::session::render_loop::{Spirograph, wait_for_visibility};
pub use crate::session::screens::ScreenSet;
