use crate::foundation::error::SpiroResult;
use crate::render::surface::DeviceProvider;
use crate::session::render_loop::Spirograph;

/// One render loop per display, driven together.
pub struct ScreenSet<P: DeviceProvider> {
    screens: Vec<Spirograph<P>>,
}

impl<P: DeviceProvider> Default for ScreenSet<P> {
    fn default() -> Self {
        Self {
            screens: Vec::new(),
        }
    }
}

impl<P: DeviceProvider> ScreenSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, screen: Spirograph<P>) {
        self.screens.push(screen);
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spirograph<P>> {
        self.screens.iter()
    }

    /// Start every loop. Loops that failed to initialize are skipped with a warning; the first
    /// other start error is returned after all loops were attempted.
    pub fn start_all(&mut self) -> SpiroResult<()> {
        let mut first = None;
        for (idx, s) in self.screens.iter_mut().enumerate() {
            if s.state().is_terminal() {
                tracing::warn!(screen = idx, state = ?s.state(), "skipping screen");
                continue;
            }
            if let Err(e) = s.start() {
                tracing::error!(screen = idx, error = %e, "screen failed to start");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    pub fn pause_all(&self) {
        for s in &self.screens {
            s.pause();
        }
    }

    pub fn resume_all(&self) {
        for s in &self.screens {
            s.resume();
        }
    }

    /// Reset every live loop, returning the first error.
    pub fn reset_all(&mut self) -> SpiroResult<()> {
        let mut first = None;
        for s in self.screens.iter_mut().filter(|s| !s.state().is_terminal()) {
            if let Err(e) = s.reset() {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Stop every loop and release its surface.
    pub fn stop_all(&mut self) {
        for s in &mut self.screens {
            s.stop();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/screens.rs"]
mod tests;
