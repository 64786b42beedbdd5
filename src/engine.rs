//! Animation engine: the color-wheel render loop and its command handling.
//!
//! Provides [`AnimationEngine`], which runs bursts of wheel frames on a shared
//! strip, drains the [`Mailbox`] every frame and switches between the cyclic
//! animation and a solid palette color. Pauses between frames are spent in the
//! [`BreathingModulator`] rather than idling.

use embedded_hal::delay::DelayNs;

use crate::breathing::{BreathingConfig, BreathingModulator};
use crate::colors::{FULL_BRIGHTNESS, wheel};
use crate::command::Command;
use crate::mailbox::Mailbox;
use crate::surface::SharedStrip;

/// Frames in one pass over the color wheel.
pub const FRAMES_PER_CYCLE: u16 = 256;

/// What the engine is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AnimationMode {
    /// Color wheel running across the strip.
    #[default]
    Cyclic = 0,
    /// A palette color on pixel 0, wheel stopped.
    Solid = 1,
}

impl AnimationMode {
    /// Decodes the value produced by `u8::from(mode)`. Unknown values map to `Cyclic`.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => AnimationMode::Solid,
            _ => AnimationMode::Cyclic,
        }
    }
}

impl From<AnimationMode> for u8 {
    fn from(mode: AnimationMode) -> Self {
        mode as u8
    }
}

/// Engine timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Pause after every frame, and per idle iteration in `Solid`.
    pub frame_pause_ms: u32,
    /// Delay before the first notification at startup.
    pub settle_ms: u32,
    /// Short yield after every burst and idle iteration.
    pub yield_ms: u32,
    /// Breathing oscillator used for the pauses.
    pub breathing: BreathingConfig,
}

impl EngineConfig {
    /// 20 ms frame pause, 10 ms settle, 1 ms yield, default breathing.
    pub const DEFAULT: Self = Self {
        frame_pause_ms: 20,
        settle_ms: 10,
        yield_ms: 1,
        breathing: BreathingConfig::DEFAULT,
    };

    /// Sets the pause after each frame.
    #[must_use]
    pub const fn with_frame_pause(mut self, frame_pause_ms: u32) -> Self {
        self.frame_pause_ms = frame_pause_ms;
        self
    }

    /// Sets the startup settle delay.
    #[must_use]
    pub const fn with_settle(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Sets the yield after bursts and idle iterations.
    #[must_use]
    pub const fn with_yield(mut self, yield_ms: u32) -> Self {
        self.yield_ms = yield_ms;
        self
    }

    /// Sets the breathing oscillator.
    #[must_use]
    pub const fn with_breathing(mut self, breathing: BreathingConfig) -> Self {
        self.breathing = breathing;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of one [`AnimationEngine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// A wheel frame at this position was shown.
    Rendered(u8),
    /// A frame was shown, then a palette command cut the burst short.
    Interrupted(u32),
    /// Solid mode; the step was spent breathing.
    Idle,
}

/// Drives the strip from one scheduled context.
///
/// Call [`startup`](Self::startup) once, then [`step`](Self::step) in a loop,
/// or hand everything to [`run`](Self::run). Producers only ever touch the
/// mailbox.
pub struct AnimationEngine<'m> {
    mailbox: &'m Mailbox,
    config: EngineConfig,
    mode: AnimationMode,
    frame: u16,
    breathing: BreathingModulator,
}

impl<'m> AnimationEngine<'m> {
    /// Creates an engine in `Cyclic` mode at the start of a burst.
    pub fn new(mailbox: &'m Mailbox, config: EngineConfig) -> Self {
        Self {
            mailbox,
            config,
            mode: AnimationMode::Cyclic,
            frame: 0,
            breathing: BreathingModulator::new(config.breathing),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// Wheel position of the next frame in the current burst.
    pub fn position(&self) -> u8 {
        self.frame as u8
    }

    /// Returns true if the next step starts a new burst (and drains the mailbox first).
    pub fn at_cycle_start(&self) -> bool {
        self.frame == 0
    }

    /// Breathing oscillator state.
    pub fn breathing(&self) -> &BreathingModulator {
        &self.breathing
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Waits for the scheduler to settle, then queues the initial resume
    /// notification and enters `Cyclic`.
    ///
    /// A command already waiting in the mailbox wins over the resume code; it
    /// is handled on the first step.
    pub fn startup<D: DelayNs>(&mut self, delay: &mut D) {
        delay.delay_ms(self.config.settle_ms);
        if !self.mailbox.try_post(Command::RESUME_CODE) {
            debug!("startup notification skipped, a command is already pending");
        }
        self.mode = AnimationMode::Cyclic;
        self.frame = 0;
    }

    /// Applies a command code. Returns true if it interrupts the animation.
    ///
    /// A palette code shows its color on pixel 0 at full brightness and enters
    /// `Solid`. Any other code enters `Cyclic` without touching the strip.
    pub fn handle<A: SharedStrip>(&mut self, strip: &A, code: u32) -> bool {
        match Command::from_code(code) {
            Command::Palette(color) => {
                strip.with_strip(|strip| {
                    strip.set_color(0, color.rgb(), FULL_BRIGHTNESS);
                    strip.show();
                });
                if self.mode != AnimationMode::Solid {
                    debug!("solid {:?} on code {}", color, code);
                }
                self.mode = AnimationMode::Solid;
                true
            }
            Command::Resume => {
                if self.mode != AnimationMode::Cyclic {
                    debug!("resuming wheel on code {}", code);
                }
                self.mode = AnimationMode::Cyclic;
                false
            }
        }
    }

    /// Runs one unit of work.
    ///
    /// At the start of a burst the mailbox is drained first. In `Cyclic` one
    /// frame is rendered and shown, the mailbox is drained again, and the frame
    /// pause is spent breathing unless a palette command interrupted the burst.
    /// In `Solid` the whole step is one breathing pause.
    pub fn step<A, D>(&mut self, strip: &A, delay: &mut D) -> Step
    where
        A: SharedStrip,
        D: DelayNs,
    {
        if self.at_cycle_start() {
            if let Some(code) = self.mailbox.try_take() {
                self.handle(strip, code);
            }
        }

        match self.mode {
            AnimationMode::Cyclic => self.render_frame(strip, delay),
            AnimationMode::Solid => {
                self.breathing
                    .pause(strip, delay, self.config.frame_pause_ms);
                delay.delay_ms(self.config.yield_ms);
                Step::Idle
            }
        }
    }

    /// Runs the engine forever. Meant as the body of a dedicated task.
    pub fn run<A, D>(&mut self, strip: &A, delay: &mut D) -> !
    where
        A: SharedStrip,
        D: DelayNs,
    {
        self.startup(delay);
        loop {
            self.step(strip, delay);
        }
    }

    fn render_frame<A, D>(&mut self, strip: &A, delay: &mut D) -> Step
    where
        A: SharedStrip,
        D: DelayNs,
    {
        let position = self.frame as u8;
        strip.with_strip(|strip| {
            strip.fill_with(|index| wheel((index as u8).wrapping_add(position)));
            strip.show();
        });

        if let Some(code) = self.mailbox.try_take() {
            if self.handle(strip, code) {
                self.frame = 0;
                delay.delay_ms(self.config.yield_ms);
                return Step::Interrupted(code);
            }
        }

        self.breathing
            .pause(strip, delay, self.config.frame_pause_ms);

        self.frame += 1;
        if self.frame == FRAMES_PER_CYCLE {
            trace!("wheel cycle complete");
            self.frame = 0;
            delay.delay_ms(self.config.yield_ms);
        }

        Step::Rendered(position)
    }
}
