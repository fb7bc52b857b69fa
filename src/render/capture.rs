//! Screen-capture persistence.
//!
//! Captures are written on a short-lived background thread. Failures are logged and swallowed:
//! a capture never affects the render session that requested it.

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{SpiroError, SpiroResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Destination for completed shapes.
pub trait CaptureSink: Send + Sync + 'static {
    /// Persist `frame`, returning where it was written.
    fn save(&self, frame: &FrameRGBA) -> SpiroResult<PathBuf>;
}

/// Writes captures as sequentially numbered PNG files in one directory.
///
/// File names are `spiralific000.png`, `spiralific001.png`, ... where the number is the count of
/// `spiral*.png` files already present.
#[derive(Clone, Debug)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    /// Sink writing into `dir` (created on first save).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the next capture would be written to.
    pub fn next_path(&self) -> SpiroResult<PathBuf> {
        let n = count_existing(&self.dir)?;
        Ok(self.dir.join(format!("spiralific{n:03}.png")))
    }
}

impl CaptureSink for PngDirSink {
    fn save(&self, frame: &FrameRGBA) -> SpiroResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SpiroError::capture(format!("create capture dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.next_path()?;
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| SpiroError::capture(format!("write png '{}': {e}", path.display())))?;
        Ok(path)
    }
}

fn count_existing(dir: &Path) -> SpiroResult<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let entries = std::fs::read_dir(dir).map_err(|e| {
        SpiroError::capture(format!("read capture dir '{}': {e}", dir.display()))
    })?;
    let mut n = 0;
    for entry in entries {
        let entry = entry.map_err(|e| SpiroError::capture(format!("read dir entry: {e}")))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("spiral") && name.ends_with(".png") && entry.path().is_file() {
            n += 1;
        }
    }
    Ok(n)
}

/// Runs captures off the render thread and exposes whether one is still pending.
pub struct CaptureDispatcher {
    sink: Option<Arc<dyn CaptureSink>>,
    pending: Arc<AtomicBool>,
}

impl CaptureDispatcher {
    /// Dispatcher for `sink`; with `None`, capture requests are dropped.
    pub fn new(sink: Option<Arc<dyn CaptureSink>>) -> Self {
        Self {
            sink,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `true` while a dispatched capture has not finished.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Start writing `frame` in the background.
    ///
    /// Returns `false` when there is no sink or the worker thread could not be spawned.
    pub fn dispatch(&self, frame: FrameRGBA) -> bool {
        let Some(sink) = self.sink.clone() else {
            tracing::debug!("capture requested without a sink; dropped");
            return false;
        };
        self.pending.store(true, Ordering::Release);
        let pending = Arc::clone(&self.pending);
        let spawned = std::thread::Builder::new()
            .name("spiralific-capture".to_owned())
            .spawn(move || {
                match sink.save(&frame) {
                    Ok(path) => tracing::info!(path = %path.display(), "saved capture"),
                    Err(e) => tracing::warn!(error = %e, "capture failed"),
                }
                pending.store(false, Ordering::Release);
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to spawn capture thread");
            self.pending.store(false, Ordering::Release);
            return false;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/capture.rs"]
mod tests;
