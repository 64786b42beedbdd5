//! Threaded controller for hosted targets.
//!
//! [`StripController`] owns a strip, runs the [`AnimationEngine`] on its own OS
//! thread and exposes the power/brightness controls. Firmware without `std`
//! builds the same arrangement from [`AnimationEngine::run`] inside a task.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::colors::Rgb;
use crate::engine::{AnimationEngine, AnimationMode, EngineConfig};
use crate::mailbox::Mailbox;
use crate::power::PowerState;
use crate::surface::{PixelSurface, SharedStrip, Strip};

/// Name given to the engine thread.
const THREAD_NAME: &str = "led-strip";

/// [`DelayNs`] backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Errors that can occur during controller operations.
#[derive(Debug)]
pub enum ControllerError {
    /// The engine thread could not be created.
    Spawn(std::io::Error),
}

impl core::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControllerError::Spawn(err) => write!(f, "failed to spawn engine thread: {}", err),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControllerError::Spawn(err) => Some(err),
        }
    }
}

/// State shared with the engine thread.
struct Shared<S: PixelSurface> {
    strip: Mutex<Strip<S>>,
    mailbox: Arc<Mailbox>,
    mode: AtomicU8,
}

struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Runs the animation engine for one strip on a dedicated thread.
///
/// Producers post command codes through [`post_command`](Self::post_command)
/// or a [`mailbox`](Self::mailbox) handle cloned to other threads. The
/// power/brightness setters and direct color writes take the strip lock for a
/// single write-and-show, so they never interleave with a frame.
pub struct StripController<S: PixelSurface + Send + 'static> {
    shared: Arc<Shared<S>>,
    config: EngineConfig,
    power: PowerState,
    worker: Option<Worker>,
}

impl<S: PixelSurface + Send + 'static> StripController<S> {
    /// Creates a stopped controller with the default engine timing.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, EngineConfig::DEFAULT)
    }

    /// Creates a stopped controller.
    pub fn with_config(surface: S, config: EngineConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                strip: Mutex::new(Strip::new(surface)),
                mailbox: Arc::new(Mailbox::new()),
                mode: AtomicU8::new(AnimationMode::Cyclic.into()),
            }),
            config,
            power: PowerState::new(),
            worker: None,
        }
    }

    /// Prepares the surface and shows an all-off frame.
    pub fn init(&mut self) {
        self.shared.strip.with_strip(|strip| strip.begin());
        info!("strip initialised");
    }

    /// Spawns the engine thread. Does nothing if it is already running.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.worker.is_some() {
            return Ok(());
        }

        let running = Arc::new(AtomicBool::new(true));
        let shared = Arc::clone(&self.shared);
        let flag = Arc::clone(&running);
        let config = self.config;

        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || run_engine(&shared, &flag, config))
            .map_err(ControllerError::Spawn)?;

        self.worker = Some(Worker { running, handle });
        info!("engine started");
        Ok(())
    }

    /// Stops the engine thread and waits for it to exit. Does nothing if it is
    /// not running. No frame is rendered after this returns.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        worker.running.store(false, Ordering::Release);
        if worker.handle.join().is_err() {
            warn!("engine thread panicked");
        }
        info!("engine stopped");
    }

    /// Returns true while the engine thread is running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Posts a command code for the engine. Dropped if one is already pending.
    pub fn post_command(&self, code: u32) {
        if let Err(err) = self.shared.mailbox.post(code) {
            debug!("command {} dropped, mailbox busy", err.rejected);
        }
    }

    /// Handle for producers on other threads.
    pub fn mailbox(&self) -> Arc<Mailbox> {
        Arc::clone(&self.shared.mailbox)
    }

    /// Mode last reported by the engine thread.
    pub fn mode(&self) -> AnimationMode {
        AnimationMode::from_raw(self.shared.mode.load(Ordering::Acquire))
    }

    /// Switches the light on or off. See [`PowerState::set_power`].
    pub fn set_power(&mut self, enabled: bool) {
        self.power.set_power(&self.shared.strip, enabled);
    }

    /// Sets the brightness. See [`PowerState::set_brightness`].
    pub fn set_brightness(&mut self, brightness: u8) {
        self.power.set_brightness(&self.shared.strip, brightness);
    }

    /// Stored power state.
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Writes one pixel at a brightness percentage without showing it.
    pub fn set_color(&self, index: usize, color: Rgb, brightness: u8) {
        self.shared
            .strip
            .with_strip(|strip| strip.set_color(index, color, brightness));
    }

    /// Shows the current frame buffer, interrupting a breathing slice if needed.
    pub fn show(&self) {
        self.shared.strip.with_strip(|strip| strip.show_now());
    }

    /// Runs `f` with the surface while holding the strip lock.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.shared.strip.with_strip(|strip| f(strip.surface()))
    }
}

impl<S: PixelSurface + Send + 'static> Drop for StripController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_engine<S: PixelSurface>(shared: &Shared<S>, running: &AtomicBool, config: EngineConfig) {
    let mut delay = StdDelay;
    let mut engine = AnimationEngine::new(&shared.mailbox, config);

    engine.startup(&mut delay);
    shared.mode.store(engine.mode().into(), Ordering::Release);

    while running.load(Ordering::Acquire) {
        engine.step(&shared.strip, &mut delay);
        shared.mode.store(engine.mode().into(), Ordering::Release);
    }
}
