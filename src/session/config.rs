use crate::curve::engine::CurveOpts;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{SpiroError, SpiroResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Interval between visibility polls while waiting for the surface to be shown.
pub const VISIBILITY_POLL: Duration = Duration::from_millis(200);
/// How long to wait for the surface to become visible before failing.
pub const VISIBILITY_TIMEOUT: Duration = Duration::from_secs(15);
/// Liveness bound on stopping the render thread and on pause acknowledgements.
pub const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(15);
/// Poll interval while paused or waiting on a capture.
pub const IDLE_POLL: Duration = Duration::from_millis(10);

/// Render loop configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Frame-rate cap. `None` or `Some(0)` draws as fast as possible.
    pub fps_limit: Option<u32>,
    /// Color the surface is cleared to.
    pub background: Rgb8,
    /// Per-axis tolerance for detecting a closed loop.
    pub closure_epsilon: f64,
    /// Pause after a closed loop before the next shape, in milliseconds.
    pub closure_pause_ms: u64,
    /// Seed for reproducible shapes; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Directory for PNG captures of finished shapes.
    pub capture_dir: Option<PathBuf>,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            fps_limit: Some(120),
            background: Rgb8::BLACK,
            closure_epsilon: CurveOpts::default().closure_epsilon,
            closure_pause_ms: 5000,
            seed: None,
            capture_dir: None,
        }
    }
}

impl EngineOpts {
    /// Parse options from JSON.
    pub fn from_reader(r: impl Read) -> SpiroResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| SpiroError::serde(format!("parse engine options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SpiroResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SpiroError::validation(format!("open engine options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges.
    pub fn validate(&self) -> SpiroResult<()> {
        if !(self.closure_epsilon.is_finite() && self.closure_epsilon >= 0.0) {
            return Err(SpiroError::validation(
                "closure_epsilon must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Frame budget implied by the fps cap.
    pub fn frame_budget(&self) -> Option<Duration> {
        match self.fps_limit {
            Some(fps) if fps > 0 => Some(Duration::from_millis(u64::from(1000 / fps))),
            _ => None,
        }
    }

    /// Pause applied after a closed loop.
    pub fn closure_pause(&self) -> Duration {
        Duration::from_millis(self.closure_pause_ms)
    }

    /// Curve-engine tunables.
    pub fn curve_opts(&self) -> CurveOpts {
        CurveOpts {
            closure_epsilon: self.closure_epsilon,
            background: self.background,
        }
    }

    /// Random generator for a new engine.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
