use crate::foundation::core::{FrameRGBA, Point, Rect, Rgb8};
use crate::foundation::error::SpiroResult;

/// A drawable target that curve segments are rendered onto.
///
/// Implementations own their device resources; dropping the surface releases them.
pub trait Surface: Send {
    /// Drawable area in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgb8) -> SpiroResult<()>;

    /// Draw a one-pixel line segment from `from` to `to`.
    fn draw_line(&mut self, from: Point, to: Point, color: Rgb8) -> SpiroResult<()>;

    /// Copy the current contents, if the surface supports read-back.
    fn snapshot(&self) -> Option<FrameRGBA> {
        None
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn clear(&mut self, color: Rgb8) -> SpiroResult<()> {
        (**self).clear(color)
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb8) -> SpiroResult<()> {
        (**self).draw_line(from, to, color)
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        (**self).snapshot()
    }
}

/// Acquires the surface a render loop draws on.
///
/// Called once at construction and again for every device-context reset. The previous surface is
/// always dropped before the next one is acquired.
pub trait DeviceProvider: Send + 'static {
    /// Surface type handed out by this provider.
    type Surface: Surface + 'static;

    /// Acquire a fresh surface.
    fn acquire(&mut self) -> SpiroResult<Self::Surface>;
}

/// Answers whether the target surface is currently shown.
pub trait VisibilityOracle: Send + Sync + 'static {
    /// `true` while the surface is visible.
    fn is_visible(&self) -> bool;
}

impl<F> VisibilityOracle for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn is_visible(&self) -> bool {
        self()
    }
}

/// Oracle for targets that are always shown, such as offscreen buffers.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysVisible;

impl VisibilityOracle for AlwaysVisible {
    fn is_visible(&self) -> bool {
        true
    }
}
