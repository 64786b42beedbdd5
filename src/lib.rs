#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`PixelSurface`**: Trait to implement for your strip driver (frame buffer, flush, raw pin output)
//! - **`Strip`**: Adapter that bounds-checks writes, scales brightness and owns the data-line token
//! - **`SharedStrip`**: Lock abstraction the engine and the power controls share the strip through
//! - **`Mailbox`**: Single-slot, non-overwriting command channel
//! - **`AnimationEngine`**: Color-wheel render loop switching between `Cyclic` and `Solid`
//! - **`BreathingModulator`**: Triangle-wave level written to the data line between frames
//! - **`PowerState`**: Power switch and brightness applied to pixel 0
//! - **`StripController`** (`std`): Runs the engine on its own thread
//!
//! Colors are 8-bit `Srgb<u8>` values. Brightness is a percentage (0-100) applied
//! with two truncating integer steps, see [`colors::scale_channel`].

mod fmt;

pub mod breathing;
pub mod colors;
pub mod command;
pub mod engine;
pub mod mailbox;
pub mod power;
pub mod surface;

#[cfg(feature = "std")]
pub mod controller;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub use breathing::{BreathingConfig, BreathingModulator, Direction};
pub use colors::{COLOR_OFF, PALETTE, PaletteColor, Rgb, WHITE, wheel};
pub use command::Command;
pub use engine::{AnimationEngine, AnimationMode, EngineConfig, FRAMES_PER_CYCLE, Step};
pub use mailbox::{Mailbox, MailboxFull};
pub use power::{DEFAULT_BRIGHTNESS, PowerState};
pub use surface::{LineOwner, PixelSurface, SharedStrip, Strip};

#[cfg(feature = "std")]
pub use controller::{ControllerError, StdDelay, StripController};
