use super::*;
use crate::foundation::error::SpiroError;
use crate::render::pixmap::{PixmapDevice, PixmapSurface};
use crate::render::state::RenderState;
use crate::render::surface::AlwaysVisible;
use crate::session::config::EngineOpts;
use crate::session::observer::NoopObserver;
use std::sync::Arc;

enum Maybe {
    Ok(PixmapDevice),
    Broken,
}

impl DeviceProvider for Maybe {
    type Surface = PixmapSurface;

    fn acquire(&mut self) -> SpiroResult<PixmapSurface> {
        match self {
            Maybe::Ok(d) => d.acquire(),
            Maybe::Broken => Err(SpiroError::device("no adapter")),
        }
    }
}

fn screen(dev: Maybe) -> Spirograph<Maybe> {
    let opts = EngineOpts {
        fps_limit: Some(200),
        seed: Some(5),
        ..EngineOpts::default()
    };
    Spirograph::new(dev, AlwaysVisible, opts, Arc::new(NoopObserver))
}

#[test]
fn drives_all_live_screens_and_skips_failed_ones() {
    let mut set = ScreenSet::new();
    assert!(set.is_empty());
    set.push(screen(Maybe::Ok(PixmapDevice::new(120, 90).unwrap())));
    set.push(screen(Maybe::Broken));
    set.push(screen(Maybe::Ok(PixmapDevice::new(90, 120).unwrap())));
    assert_eq!(set.len(), 3);

    set.start_all().unwrap();
    let running: Vec<bool> = set.iter().map(Spirograph::is_running).collect();
    assert_eq!(running, vec![true, false, true]);

    set.pause_all();
    assert!(set.iter().all(Spirograph::is_paused));
    set.resume_all();
    set.reset_all().unwrap();
    assert!(!set.iter().any(Spirograph::is_paused));

    set.stop_all();
    assert!(set.iter().all(|s| s.state() == RenderState::ShuttingDown));
    assert!(!set.iter().any(Spirograph::is_running));
}
