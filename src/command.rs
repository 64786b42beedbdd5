//! Decoding of the numeric command codes carried by the mailbox.

use crate::colors::PaletteColor;

/// Meaning of a command code.
///
/// Codes 1..=7 select a palette entry. Every other code, 0 included, asks the
/// engine to resume (or keep) the cyclic animation; no code is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Show a solid palette color on pixel 0 and stop cycling.
    Palette(PaletteColor),
    /// Resume the color-wheel animation.
    Resume,
}

impl Command {
    /// Code producers post to resume the animation.
    pub const RESUME_CODE: u32 = 0;

    /// Decodes a raw code.
    pub const fn from_code(code: u32) -> Self {
        match code {
            1..=7 => match PaletteColor::from_index(code as usize - 1) {
                Some(color) => Command::Palette(color),
                None => Command::Resume,
            },
            _ => Command::Resume,
        }
    }

    /// Canonical code for this command.
    pub const fn code(self) -> u32 {
        match self {
            Command::Palette(color) => color.index() as u32 + 1,
            Command::Resume => Self::RESUME_CODE,
        }
    }
}

impl From<u32> for Command {
    fn from(code: u32) -> Self {
        Command::from_code(code)
    }
}

impl From<Command> for u32 {
    fn from(command: Command) -> Self {
        command.code()
    }
}

impl From<PaletteColor> for Command {
    fn from(color: PaletteColor) -> Self {
        Command::Palette(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_codes_map_to_table_order() {
        assert_eq!(Command::from_code(1), Command::Palette(PaletteColor::Red));
        assert_eq!(Command::from_code(3), Command::Palette(PaletteColor::Yellow));
        assert_eq!(Command::from_code(7), Command::Palette(PaletteColor::Purple));
    }

    #[test]
    fn out_of_range_codes_resume() {
        for code in [0, 8, 99, u32::MAX] {
            assert_eq!(Command::from_code(code), Command::Resume);
        }
    }

    #[test]
    fn code_inverts_decoding_for_palette_entries() {
        for color in PaletteColor::ALL {
            let command = Command::from(color);
            assert_eq!(Command::from_code(command.code()), command);
        }
        assert_eq!(u32::from(Command::Resume), 0);
    }
}
