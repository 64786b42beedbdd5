//! Color helpers: the wheel, the command palette and integer brightness scaling.
//!
//! Every color in this crate is an 8-bit `palette::Srgb<u8>`, which is what
//! addressable strips consume directly.

use palette::Srgb;

/// 8-bit RGB color as written to the strip.
pub type Rgb = Srgb<u8>;

/// All channels off.
pub const COLOR_OFF: Rgb = Srgb::new(0, 0, 0);

/// Full white, used for brightness previews.
pub const WHITE: Rgb = Srgb::new(255, 255, 255);

/// Brightness percentage that leaves a color untouched.
pub const FULL_BRIGHTNESS: u8 = 100;

/// Width of one band of the color wheel.
const BAND: u8 = 85;

/// Maps a wheel position to a hue on the red → green → blue → red cycle.
///
/// The position is inverted and split into three 85-wide bands with linear
/// ramps of slope 3, so neighbouring positions never differ by more than 3 on
/// any channel (the 255 → 0 wrap included).
///
/// ```
/// # use rgb_strip_animator::colors::wheel;
/// # use palette::Srgb;
/// assert_eq!(wheel(0), Srgb::new(255, 0, 0));
/// assert_eq!(wheel(170), Srgb::new(0, 0, 255));
/// ```
pub const fn wheel(position: u8) -> Rgb {
    let pos = 255 - position;
    if pos < BAND {
        Srgb::new(255 - pos * 3, 0, pos * 3)
    } else if pos < 2 * BAND {
        let pos = pos - BAND;
        Srgb::new(0, pos * 3, 255 - pos * 3)
    } else {
        let pos = pos - 2 * BAND;
        Srgb::new(pos * 3, 255 - pos * 3, 0)
    }
}

/// Scales one channel by a brightness percentage.
///
/// Two integer steps, both truncating: the percentage is first mapped onto
/// 0-255, then applied to the channel. The result differs from
/// `channel * brightness / 100` (255 at 50% gives 127).
/// Brightness above 100 is clamped.
#[inline]
pub const fn scale_channel(channel: u8, brightness: u8) -> u8 {
    let brightness = if brightness > FULL_BRIGHTNESS {
        FULL_BRIGHTNESS
    } else {
        brightness
    };
    let scaled = brightness as u16 * 255 / 100;
    (channel as u16 * scaled / 255) as u8
}

/// Scales all three channels with [`scale_channel`].
#[inline]
pub const fn scale(color: Rgb, brightness: u8) -> Rgb {
    Srgb::new(
        scale_channel(color.red, brightness),
        scale_channel(color.green, brightness),
        scale_channel(color.blue, brightness),
    )
}

/// Named entries of the solid-color palette, in command order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaletteColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
}

/// The fixed solid-color table. Command code `n` in 1..=7 selects entry `n - 1`.
pub const PALETTE: [Rgb; 7] = [
    Srgb::new(255, 0, 0),
    Srgb::new(255, 140, 0),
    Srgb::new(255, 255, 0),
    Srgb::new(0, 255, 0),
    Srgb::new(0, 128, 128),
    Srgb::new(0, 0, 255),
    Srgb::new(128, 0, 128),
];

impl PaletteColor {
    /// All entries, in table order.
    pub const ALL: [PaletteColor; 7] = [
        PaletteColor::Red,
        PaletteColor::Orange,
        PaletteColor::Yellow,
        PaletteColor::Green,
        PaletteColor::Cyan,
        PaletteColor::Blue,
        PaletteColor::Purple,
    ];

    /// Position in [`PALETTE`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up an entry by table position.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// The RGB value of this entry.
    pub const fn rgb(self) -> Rgb {
        PALETTE[self.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_follows_each_band_formula() {
        // pos = 255 - position; band 1 covers pos 0..85
        assert_eq!(wheel(255), Srgb::new(255, 0, 0));
        assert_eq!(wheel(245), Srgb::new(225, 0, 30));
        // band 2 covers pos 85..170
        assert_eq!(wheel(170), Srgb::new(0, 0, 255));
        assert_eq!(wheel(100), Srgb::new(0, 210, 45));
        // band 3 covers pos 170..=255
        assert_eq!(wheel(85), Srgb::new(0, 255, 0));
        assert_eq!(wheel(0), Srgb::new(255, 0, 0));
        assert_eq!(wheel(40), Srgb::new(135, 120, 0));
    }

    #[test]
    fn wheel_has_no_jump_larger_than_one_slope_step() {
        for position in 0..=255u8 {
            let a = wheel(position);
            let b = wheel(position.wrapping_add(1));
            assert!(a.red.abs_diff(b.red) <= 3, "red jump at {}", position);
            assert!(a.green.abs_diff(b.green) <= 3, "green jump at {}", position);
            assert!(a.blue.abs_diff(b.blue) <= 3, "blue jump at {}", position);
        }
    }

    #[test]
    fn wheel_keeps_one_channel_dark() {
        for position in 0..=255u8 {
            let c = wheel(position);
            assert!(c.red == 0 || c.green == 0 || c.blue == 0);
        }
    }

    #[test]
    fn scale_channel_matches_two_step_truncation() {
        let table: [(u8, u8, u8); 10] = [
            (255, 100, 255),
            (255, 50, 127),
            (255, 0, 0),
            (128, 50, 63),
            (100, 50, 49),
            (200, 33, 65),
            (1, 99, 0),
            (10, 100, 10),
            (140, 50, 69),
            (255, 1, 2),
        ];
        for (channel, brightness, expected) in table {
            assert_eq!(
                scale_channel(channel, brightness),
                expected,
                "scale_channel({}, {})",
                channel,
                brightness
            );
        }
    }

    #[test]
    fn scale_channel_clamps_brightness() {
        assert_eq!(scale_channel(200, 250), 200);
        assert_eq!(scale(WHITE, 101), WHITE);
    }

    #[test]
    fn palette_entries_match_named_colors() {
        assert_eq!(PaletteColor::Orange.rgb(), Srgb::new(255, 140, 0));
        assert_eq!(PaletteColor::Cyan.rgb(), Srgb::new(0, 128, 128));
        assert_eq!(PaletteColor::from_index(6), Some(PaletteColor::Purple));
        assert_eq!(PaletteColor::from_index(7), None);
    }
}
