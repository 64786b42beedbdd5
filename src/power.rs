//! Power and brightness controls applied directly to the strip.

use crate::colors::{COLOR_OFF, FULL_BRIGHTNESS, WHITE};
use crate::surface::SharedStrip;

/// Brightness used until `set_brightness` is called.
pub const DEFAULT_BRIGHTNESS: u8 = 50;

/// Stored power switch and brightness.
///
/// Both setters act on pixel 0 immediately and independently of the animation
/// engine; neither starts nor stops it. The frame is sent even while a
/// breathing pause holds the data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerState {
    /// Whether the light is switched on.
    pub enabled: bool,
    /// Brightness percentage, 0-100.
    pub brightness: u8,
}

impl PowerState {
    /// Off, at [`DEFAULT_BRIGHTNESS`].
    pub const fn new() -> Self {
        Self {
            enabled: false,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    /// Switches the light. Turning it off blanks pixel 0 and shows the frame.
    pub fn set_power<A: SharedStrip>(&mut self, strip: &A, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            strip.with_strip(|strip| {
                strip.set_color(0, COLOR_OFF, 0);
                strip.show_now();
            });
        }
    }

    /// Stores a brightness (clamped to 100). While on, pixel 0 shows white at
    /// that brightness right away.
    pub fn set_brightness<A: SharedStrip>(&mut self, strip: &A, brightness: u8) {
        let brightness = brightness.min(FULL_BRIGHTNESS);
        self.brightness = brightness;
        if self.enabled {
            strip.with_strip(|strip| {
                strip.set_color(0, WHITE, brightness);
                strip.show_now();
            });
        }
    }
}

impl Default for PowerState {
    fn default() -> Self {
        Self::new()
    }
}
