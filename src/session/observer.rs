use crate::foundation::error::SpiroError;

pub use crate::curve::engine::PaintSnapshot;

/// Lifecycle notifications raised by a render loop.
///
/// Callbacks run on the render thread (or on the controlling thread for `shutting_down`), so
/// they should return quickly. All methods default to no-ops.
pub trait RenderObserver: Send + Sync + 'static {
    /// Before each curve step.
    fn paint_start(&self, _snapshot: &PaintSnapshot) {}

    /// After each successful curve step.
    fn paint_complete(&self, _snapshot: &PaintSnapshot) {}

    /// A fault ended initialization or the render session.
    fn fault(&self, _error: &SpiroError) {}

    /// Stop was requested.
    fn shutting_down(&self) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RenderObserver for NoopObserver {}

/// Observer that forwards notifications to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RenderObserver for TracingObserver {
    fn paint_complete(&self, s: &PaintSnapshot) {
        tracing::trace!(iteration = s.iteration, x1 = s.x1, y1 = s.y1, "painted");
    }

    fn fault(&self, error: &SpiroError) {
        tracing::error!(%error, "render fault");
    }

    fn shutting_down(&self) {
        tracing::info!("render loop shutting down");
    }
}
