//! Background render loop driving a [`CurveEngine`].
//!
//! Control calls travel to the render thread over a command channel and are only consumed
//! between curve steps, so a step is never interrupted. `pause` returns once the render thread
//! has acknowledged; `stop` is cooperative and bounded by [`STOP_JOIN_TIMEOUT`].

use crate::curve::engine::{CurveEngine, StepOutcome};
use crate::foundation::error::{SpiroError, SpiroResult};
use crate::render::capture::{CaptureDispatcher, CaptureSink, PngDirSink};
use crate::render::state::{RenderState, StateCell};
use crate::render::surface::{DeviceProvider, Surface, VisibilityOracle};
use crate::session::config::{
    EngineOpts, IDLE_POLL, STOP_JOIN_TIMEOUT, VISIBILITY_POLL, VISIBILITY_TIMEOUT,
};
use crate::session::observer::RenderObserver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

enum Command {
    Pause { ack: SyncSender<()> },
    Resume,
    Reset { ack: SyncSender<SpiroResult<()>> },
    ResetDevice { ack: SyncSender<SpiroResult<()>> },
    Stop,
}

/// Why the render thread left its loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopExit {
    Shutdown,
    Hidden,
    Fault,
}

enum Flow {
    Continue,
    Exit(LoopExit),
}

#[derive(Debug, Default)]
struct Shared {
    shutdown: AtomicBool,
    paused: AtomicBool,
    running: AtomicBool,
}

struct Control {
    tx: Sender<Command>,
    done: Receiver<()>,
    handle: JoinHandle<()>,
}

/// A curve engine rendering onto one surface from a dedicated thread.
///
/// Construction acquires the surface and waits for it to become visible. Initialization faults
/// are reported to the observer and leave the loop in [`RenderState::RenderError`]; such a loop
/// refuses to start.
pub struct Spirograph<P: DeviceProvider> {
    state: Arc<StateCell>,
    shared: Arc<Shared>,
    observer: Arc<dyn RenderObserver>,
    idle: Option<Worker<P>>,
    control: Option<Control>,
    stopped: bool,
}

impl<P: DeviceProvider> Spirograph<P> {
    /// Initialize a render loop on the surface handed out by `provider`.
    ///
    /// Captures go to a [`PngDirSink`] when `opts.capture_dir` is set.
    pub fn new(
        provider: P,
        oracle: impl VisibilityOracle,
        opts: EngineOpts,
        observer: Arc<dyn RenderObserver>,
    ) -> Self {
        let sink = opts
            .capture_dir
            .clone()
            .map(|dir| Arc::new(PngDirSink::new(dir)) as Arc<dyn CaptureSink>);
        Self::with_capture_sink(provider, oracle, opts, observer, sink)
    }

    /// Like [`Self::new`], with an explicit capture sink.
    pub fn with_capture_sink(
        provider: P,
        oracle: impl VisibilityOracle,
        opts: EngineOpts,
        observer: Arc<dyn RenderObserver>,
        sink: Option<Arc<dyn CaptureSink>>,
    ) -> Self {
        let state = Arc::new(StateCell::new(RenderState::InitializingDevice));
        let shared = Arc::new(Shared::default());
        let idle = match Worker::init(
            provider,
            Arc::new(oracle),
            opts,
            Arc::clone(&observer),
            Arc::clone(&state),
            Arc::clone(&shared),
            CaptureDispatcher::new(sink),
        ) {
            Ok(worker) => {
                state.set(RenderState::Ready);
                Some(worker)
            }
            Err(e) => {
                tracing::error!(error = %e, "render loop initialization failed");
                observer.fault(&e);
                state.set(RenderState::RenderError);
                None
            }
        };
        Self {
            state,
            shared,
            observer,
            idle,
            control: None,
            stopped: false,
        }
    }

    /// Current render state.
    pub fn state(&self) -> RenderState {
        self.state.get()
    }

    /// Numeric code of the current render state.
    pub fn status_code(&self) -> u8 {
        self.state.get().code()
    }

    /// `true` while a pause is in effect.
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// `true` while the render thread is inside its loop.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Spawn the render thread.
    pub fn start(&mut self) -> SpiroResult<()> {
        if self.control.is_some() {
            return Err(SpiroError::validation("render loop already started"));
        }
        let worker = self.idle.take().ok_or_else(|| {
            SpiroError::device("render loop is not initialized (see the reported fault)")
        })?;

        let (tx, rx) = mpsc::channel();
        let (done_tx, done) = mpsc::sync_channel(1);
        self.shared.running.store(true, Ordering::Release);
        let handle = std::thread::Builder::new()
            .name("spiralific-render".to_owned())
            .spawn(move || {
                let _guard = RunningGuard {
                    shared: Arc::clone(&worker.shared),
                    done: done_tx,
                };
                worker.run(rx);
            })
            .map_err(|e| {
                self.shared.running.store(false, Ordering::Release);
                SpiroError::render(format!("spawn render thread: {e}"))
            })?;
        self.control = Some(Control { tx, done, handle });
        Ok(())
    }

    /// Pause rendering.
    ///
    /// Returns once the render thread acknowledges, which it only does between steps.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::Release);
        let Some(ctl) = &self.control else {
            return;
        };
        let (ack, ack_rx) = mpsc::sync_channel(1);
        if ctl.tx.send(Command::Pause { ack }).is_err() {
            return;
        }
        if ack_rx.recv_timeout(STOP_JOIN_TIMEOUT).is_err() && self.is_running() {
            tracing::warn!("render thread did not acknowledge pause");
        }
    }

    /// Resume after [`Self::pause`].
    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::Release);
        if let Some(ctl) = &self.control {
            let _ = ctl.tx.send(Command::Resume);
        }
    }

    /// Start a new shape, then resume.
    pub fn reset(&mut self) -> SpiroResult<()> {
        self.round_trip(|ack| Command::Reset { ack }, Worker::reset_shape)
    }

    /// Release and reacquire the surface, start a new shape, then resume.
    pub fn reset_device_context(&mut self) -> SpiroResult<()> {
        self.round_trip(|ack| Command::ResetDevice { ack }, Worker::reset_device)
    }

    fn round_trip(
        &mut self,
        make: impl FnOnce(SyncSender<SpiroResult<()>>) -> Command,
        direct: impl FnOnce(&mut Worker<P>) -> SpiroResult<()>,
    ) -> SpiroResult<()> {
        if let Some(ctl) = &self.control {
            let (ack, ack_rx) = mpsc::sync_channel(1);
            ctl.tx
                .send(make(ack))
                .map_err(|_| SpiroError::render("render thread has exited"))?;
            return match ack_rx.recv_timeout(STOP_JOIN_TIMEOUT) {
                Ok(r) => r,
                Err(_) => Err(SpiroError::render("render thread did not respond")),
            };
        }

        let worker = self
            .idle
            .as_mut()
            .ok_or_else(|| SpiroError::device("render loop is not initialized"))?;
        let r = direct(worker);
        self.shared.paused.store(false, Ordering::Release);
        if let Err(e) = &r {
            worker.fail(e);
            self.idle = None;
        }
        r
    }

    /// Stop rendering and release the surface.
    ///
    /// The render thread finishes its current step and exits; the join is bounded by
    /// [`STOP_JOIN_TIMEOUT`].
    pub fn stop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.state.set(RenderState::ShuttingDown);
        if !self.stopped {
            self.stopped = true;
            self.observer.shutting_down();
        }
        self.idle = None;

        let Some(ctl) = self.control.take() else {
            return;
        };
        let _ = ctl.tx.send(Command::Stop);
        match ctl.done.recv_timeout(STOP_JOIN_TIMEOUT) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if ctl.handle.join().is_err() {
                    tracing::error!("render thread panicked");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    timeout = ?STOP_JOIN_TIMEOUT,
                    "render thread did not stop in time; detaching"
                );
            }
        }
        // The thread may have finished a step after the first store.
        self.state.set(RenderState::ShuttingDown);
    }
}

impl<P: DeviceProvider> Drop for Spirograph<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

struct RunningGuard {
    shared: Arc<Shared>,
    done: SyncSender<()>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        let _ = self.done.try_send(());
    }
}

/// Poll `oracle` until it reports visible, failing after `timeout`.
pub fn wait_for_visibility(
    oracle: &dyn VisibilityOracle,
    poll: Duration,
    timeout: Duration,
) -> SpiroResult<()> {
    let start = Instant::now();
    while !oracle.is_visible() {
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(SpiroError::visibility(format!(
                "surface did not become visible within {timeout:?}"
            )));
        }
        std::thread::sleep(poll.min(timeout - elapsed));
    }
    Ok(())
}

struct Worker<P: DeviceProvider> {
    provider: P,
    oracle: Arc<dyn VisibilityOracle>,
    surface: Option<P::Surface>,
    engine: CurveEngine,
    capture: CaptureDispatcher,
    opts: EngineOpts,
    observer: Arc<dyn RenderObserver>,
    state: Arc<StateCell>,
    shared: Arc<Shared>,
    reset_pending: bool,
}

impl<P: DeviceProvider> Worker<P> {
    fn init(
        mut provider: P,
        oracle: Arc<dyn VisibilityOracle>,
        opts: EngineOpts,
        observer: Arc<dyn RenderObserver>,
        state: Arc<StateCell>,
        shared: Arc<Shared>,
        capture: CaptureDispatcher,
    ) -> SpiroResult<Self> {
        opts.validate()?;
        let mut surface = provider.acquire()?;
        surface.clear(opts.background)?;
        wait_for_visibility(&*oracle, VISIBILITY_POLL, VISIBILITY_TIMEOUT)?;

        let mut engine = CurveEngine::new(
            surface.bounds(),
            opts.curve_opts(),
            opts.rng(),
            Arc::clone(&state),
        )?;
        engine.reset(&mut surface)?;

        Ok(Self {
            provider,
            oracle,
            surface: Some(surface),
            engine,
            capture,
            opts,
            observer,
            state,
            shared,
            reset_pending: false,
        })
    }

    fn run(mut self, rx: Receiver<Command>) {
        tracing::info!(fps_limit = ?self.opts.fps_limit, "render loop started");
        let exit = self.render(&rx);
        if exit == LoopExit::Shutdown {
            self.state.set(RenderState::ShuttingDown);
        }
        tracing::info!(?exit, "render loop exited");
    }

    fn render(&mut self, rx: &Receiver<Command>) -> LoopExit {
        loop {
            loop {
                match rx.try_recv() {
                    Ok(cmd) => {
                        if let Flow::Exit(e) = self.apply(cmd) {
                            return e;
                        }
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => return LoopExit::Shutdown,
                }
            }
            if self.shutting_down() {
                return LoopExit::Shutdown;
            }
            if !self.oracle.is_visible() {
                return LoopExit::Hidden;
            }

            self.state.set(RenderState::Ready);
            let snapshot = self.engine.snapshot();
            let frame_start = Instant::now();

            while self.shared.paused.load(Ordering::Acquire) || self.capture.is_pending() {
                self.state.set(RenderState::NoActivity);
                if let Flow::Exit(e) = self.wait(rx, IDLE_POLL) {
                    return e;
                }
            }
            if self.shutting_down() {
                return LoopExit::Shutdown;
            }

            if self.reset_pending {
                self.reset_pending = false;
                if let Err(e) = self.reset_shape() {
                    self.fail(&e);
                    return LoopExit::Fault;
                }
            }

            self.observer.paint_start(&snapshot);
            let outcome = match self.step() {
                Ok(o) => o,
                Err(e) => {
                    self.fail(&e);
                    return LoopExit::Fault;
                }
            };
            self.state.set(RenderState::RenderSuccess);
            self.observer.paint_complete(&self.engine.snapshot());

            if outcome == StepOutcome::Closed {
                tracing::debug!(iteration = self.engine.iteration(), "shape closed");
                if let Flow::Exit(e) = self.wait(rx, self.opts.closure_pause()) {
                    return e;
                }
                self.reset_pending = true;
            }

            if let Some(budget) = self.opts.frame_budget() {
                let delay = budget.saturating_sub(frame_start.elapsed());
                if !delay.is_zero()
                    && let Flow::Exit(e) = self.wait(rx, delay)
                {
                    return e;
                }
            }
        }
    }

    fn shutting_down(&self) -> bool {
        self.shared.shutdown.load(Ordering::Acquire)
    }

    /// Sleep up to `timeout`, handling any commands that arrive meanwhile.
    fn wait(&mut self, rx: &Receiver<Command>, timeout: Duration) -> Flow {
        let deadline = Instant::now() + timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Flow::Continue;
            }
            match rx.recv_timeout(deadline - now) {
                Ok(cmd) => {
                    if let Flow::Exit(e) = self.apply(cmd) {
                        return Flow::Exit(e);
                    }
                    if self.shutting_down() {
                        return Flow::Exit(LoopExit::Shutdown);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Flow::Continue,
                Err(RecvTimeoutError::Disconnected) => return Flow::Exit(LoopExit::Shutdown),
            }
        }
    }

    fn apply(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Pause { ack } => {
                self.shared.paused.store(true, Ordering::Release);
                self.state.set(RenderState::NoActivity);
                let _ = ack.send(());
                Flow::Continue
            }
            Command::Resume => {
                self.shared.paused.store(false, Ordering::Release);
                Flow::Continue
            }
            Command::Reset { ack } => {
                self.reset_pending = false;
                let r = self.reset_shape();
                self.finish_control(r, ack)
            }
            Command::ResetDevice { ack } => {
                self.reset_pending = false;
                let r = self.reset_device();
                self.finish_control(r, ack)
            }
            Command::Stop => Flow::Exit(LoopExit::Shutdown),
        }
    }

    fn finish_control(&mut self, r: SpiroResult<()>, ack: SyncSender<SpiroResult<()>>) -> Flow {
        self.shared.paused.store(false, Ordering::Release);
        match r {
            Ok(()) => {
                let _ = ack.send(Ok(()));
                Flow::Continue
            }
            Err(e) => {
                self.fail(&e);
                let _ = ack.send(Err(e));
                Flow::Exit(LoopExit::Fault)
            }
        }
    }

    fn step(&mut self) -> SpiroResult<StepOutcome> {
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| SpiroError::device("no surface acquired"))?;
        let outcome = self.engine.step(surface)?;
        self.dispatch_capture();
        Ok(outcome)
    }

    fn reset_shape(&mut self) -> SpiroResult<()> {
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| SpiroError::device("no surface acquired"))?;
        self.engine.reset(surface)?;
        self.dispatch_capture();
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    fn reset_device(&mut self) -> SpiroResult<()> {
        self.state.set(RenderState::InitializingDevice);
        // Release before reacquiring.
        self.surface = None;
        let mut surface = self.provider.acquire()?;
        surface.clear(self.opts.background)?;
        wait_for_visibility(&*self.oracle, VISIBILITY_POLL, VISIBILITY_TIMEOUT)?;
        self.engine.rebind(surface.bounds())?;
        self.surface = Some(surface);
        self.reset_shape()?;
        self.state.set(RenderState::Ready);
        Ok(())
    }

    fn dispatch_capture(&mut self) {
        if let Some(frame) = self.engine.take_capture() {
            self.capture.dispatch(frame);
        }
    }

    fn fail(&self, e: &SpiroError) {
        tracing::error!(error = %e, "render fault");
        self.observer.fault(e);
        self.state.set(RenderState::RenderError);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_loop.rs"]
mod tests;
