//! Breathing modulator: pulses the strip's data line between frames.

use embedded_hal::delay::DelayNs;

use crate::surface::SharedStrip;

/// Brightness resolution the oscillator step is derived from.
const RESOLUTION_STEPS: u8 = 100;

/// Default oscillator step: one of 100 steps across 0-255.
const DEFAULT_STEP: u8 = 255 / RESOLUTION_STEPS;

/// Oscillator and timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreathingConfig {
    /// Lowest level; the line never goes fully dark while breathing.
    pub min_level: u8,
    /// Highest level.
    pub max_level: u8,
    /// Level change per sub-step.
    pub step: u8,
    /// Number of slices each pause is split into. Zero is treated as one.
    pub sub_steps: u8,
}

impl BreathingConfig {
    /// Levels 4 to 200 in steps of 2, two slices per pause.
    pub const DEFAULT: Self = Self {
        min_level: DEFAULT_STEP * 2,
        max_level: 200,
        step: DEFAULT_STEP,
        sub_steps: 2,
    };

    /// Sets the level bounds.
    #[must_use]
    pub const fn with_range(mut self, min_level: u8, max_level: u8) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    /// Sets the level change per slice.
    #[must_use]
    pub const fn with_step(mut self, step: u8) -> Self {
        self.step = step;
        self
    }

    /// Sets how many slices a pause is split into.
    #[must_use]
    pub const fn with_sub_steps(mut self, sub_steps: u8) -> Self {
        self.sub_steps = sub_steps;
        self
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Direction of the triangle wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Rising,
    Falling,
}

/// Triangle-wave level oscillator driving the released data line.
///
/// The oscillator state lives in the instance and carries over from one pause
/// to the next, so consecutive pauses form one continuous breathing pattern.
#[derive(Debug, Clone)]
pub struct BreathingModulator {
    config: BreathingConfig,
    level: u8,
    direction: Direction,
}

impl BreathingModulator {
    /// Creates a modulator at level 0, rising.
    pub const fn new(config: BreathingConfig) -> Self {
        Self {
            config,
            level: 0,
            direction: Direction::Rising,
        }
    }

    /// Current level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Current direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Active configuration.
    pub fn config(&self) -> &BreathingConfig {
        &self.config
    }

    /// Moves the oscillator one step and returns the new level.
    ///
    /// Bounces at the configured bounds: reaching `max_level` clamps and turns
    /// down, reaching `min_level` clamps and turns up.
    pub fn advance(&mut self) -> u8 {
        let BreathingConfig {
            min_level,
            max_level,
            step,
            ..
        } = self.config;

        self.level = match self.direction {
            Direction::Rising => self.level.saturating_add(step),
            Direction::Falling => self.level.saturating_sub(step),
        };

        if self.level >= max_level {
            self.level = max_level;
            self.direction = Direction::Falling;
        } else if self.level <= min_level {
            self.level = min_level;
            self.direction = Direction::Rising;
        }

        self.level
    }

    /// Spends `duration_ms` breathing on the data line.
    ///
    /// For each sub-step, takes the line for raw output (again, if an
    /// immediate show reclaimed it), advances the oscillator, drives the new
    /// level and sleeps `duration_ms / sub_steps`. The line is forced to zero
    /// and handed back to the pixel protocol at the end. Strip access is taken
    /// per sub-step and released before every sleep.
    pub fn pause<A, D>(&mut self, strip: &A, delay: &mut D, duration_ms: u32)
    where
        A: SharedStrip,
        D: DelayNs,
    {
        let sub_steps = self.config.sub_steps.max(1);
        let slice_ms = duration_ms / u32::from(sub_steps);

        for _ in 0..sub_steps {
            let level = self.advance();
            strip.with_strip(|strip| {
                strip.release_line();
                strip.write_level(level);
            });
            delay.delay_ms(slice_ms);
        }

        strip.with_strip(|strip| strip.restore_line());
    }
}

impl Default for BreathingModulator {
    fn default() -> Self {
        Self::new(BreathingConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::vec::Vec;

    #[test]
    fn default_config_uses_hundred_step_resolution() {
        let config = BreathingConfig::default();
        assert_eq!(config.step, 2);
        assert_eq!(config.min_level, 4);
        assert_eq!(config.max_level, 200);
        assert_eq!(config.sub_steps, 2);
    }

    #[test]
    fn first_step_is_clamped_to_floor() {
        let mut breathing = BreathingModulator::default();
        assert_eq!(breathing.advance(), 4);
        assert_eq!(breathing.direction(), Direction::Rising);
        assert_eq!(breathing.advance(), 6);
    }

    #[test]
    fn level_bounces_between_bounds() {
        let mut breathing = BreathingModulator::default();
        let levels: Vec<u8> = (0..300).map(|_| breathing.advance()).collect();

        assert!(levels.iter().all(|&level| (4..=200).contains(&level)));

        // 4, 6, ..., 200 is 99 values; the peak is the 99th advance
        assert_eq!(levels[98], 200);
        assert_eq!(levels[99], 198);
        // back down to the floor after another 98 steps
        assert_eq!(levels[196], 4);
        assert_eq!(levels[197], 6);
    }

    #[test]
    fn step_never_overflows_near_u8_max() {
        let config = BreathingConfig::DEFAULT.with_range(10, 255).with_step(100);
        let mut breathing = BreathingModulator::new(config);

        assert_eq!(breathing.advance(), 100);
        assert_eq!(breathing.advance(), 200);
        assert_eq!(breathing.advance(), 255);
        assert_eq!(breathing.direction(), Direction::Falling);
        assert_eq!(breathing.advance(), 155);
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut a = BreathingModulator::default();
        let b = BreathingModulator::default();

        a.advance();
        a.advance();

        assert_eq!(a.level(), 6);
        assert_eq!(b.level(), 0);
    }
}
