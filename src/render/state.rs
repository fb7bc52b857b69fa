use std::sync::atomic::{AtomicU8, Ordering};

/// Phase of a render session, as exposed to observers.
///
/// The loop normally cycles `Ready → RenderInProgress → RenderSuccess → Ready`; only
/// `RenderError` and `ShuttingDown` end it. There is no transition table: any component may set
/// any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum RenderState {
    /// Idle: paused, or waiting on a pending capture.
    NoActivity = 0,
    /// Acquiring the device/surface and waiting for it to become visible.
    InitializingDevice = 1,
    /// Between steps, ready to draw.
    Ready = 2,
    /// Inside a curve step.
    RenderInProgress = 3,
    /// A step just completed.
    RenderSuccess = 4,
    /// A fault ended the session.
    RenderError = 5,
    /// Shape parameters or saved positions are being changed.
    NotReady = 6,
    /// Stop was requested.
    ShuttingDown = 7,
}

impl RenderState {
    /// Numeric status code of this state.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Self::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::NoActivity,
            1 => Self::InitializingDevice,
            2 => Self::Ready,
            3 => Self::RenderInProgress,
            4 => Self::RenderSuccess,
            5 => Self::RenderError,
            6 => Self::NotReady,
            7 => Self::ShuttingDown,
            _ => return None,
        })
    }

    /// `true` for the states that end a render session.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::RenderError | Self::ShuttingDown)
    }
}

/// Lock-free cell holding a [`RenderState`], shared between the render thread and controllers.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    /// Create a cell holding `state`.
    pub fn new(state: RenderState) -> Self {
        Self(AtomicU8::new(state.code()))
    }

    /// Current state.
    pub fn get(&self) -> RenderState {
        RenderState::from_code(self.0.load(Ordering::Acquire)).unwrap_or(RenderState::RenderError)
    }

    /// Replace the current state.
    pub fn set(&self, state: RenderState) {
        self.0.store(state.code(), Ordering::Release);
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(RenderState::NoActivity)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/state.rs"]
mod tests;
