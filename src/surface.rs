//! Pixel surface abstraction and the strip adapter built on top of it.
//!
//! The hardware driver implements [`PixelSurface`]. The crate never talks to it
//! directly; everything goes through [`Strip`], which bounds-checks pixel
//! writes, applies brightness and arbitrates the data line between the pixel
//! protocol and raw analog output.

use core::cell::RefCell;

use crate::colors::{self, COLOR_OFF, Rgb};

/// Trait for abstracting an addressable LED strip driver.
///
/// Implement this for your hardware (RMT, SPI, PIO, bit-banged GPIO). The data
/// pin is used by two protocols: the pixel protocol for `flush`, and a plain
/// analog/PWM output between `release_for_raw_output` and
/// `restore_protocol_output`. The strip adapter guarantees those two never
/// overlap.
pub trait PixelSurface {
    /// Number of pixels on the strip.
    fn len(&self) -> usize;

    /// Prepares the driver. Called once by [`Strip::begin`].
    fn begin(&mut self) {}

    /// Stores a color in the frame buffer. `index` is always in bounds.
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Transmits the whole frame buffer to the strip.
    fn flush(&mut self);

    /// Detaches the data pin from the pixel protocol so raw levels can be written.
    fn release_for_raw_output(&mut self);

    /// Reattaches the data pin to the pixel protocol.
    fn restore_protocol_output(&mut self);

    /// Drives the released data pin at an analog level (0 = off).
    fn write_raw_level(&mut self, level: u8);
}

/// Which protocol currently owns the data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineOwner {
    /// The pixel protocol; frames can be flushed.
    Protocol,
    /// Raw analog output; flushes are deferred until the line is restored.
    Raw,
}

/// Strip adapter around a [`PixelSurface`].
///
/// Holds the line ownership token. While the line is [`LineOwner::Raw`], frame
/// buffer writes still land but `show` only marks the frame as pending; it is
/// transmitted as soon as the line is restored. `show_now` takes the line back
/// instead of waiting.
pub struct Strip<S: PixelSurface> {
    surface: S,
    owner: LineOwner,
    flush_pending: bool,
}

impl<S: PixelSurface> Strip<S> {
    /// Wraps a surface. The line starts out owned by the pixel protocol.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            owner: LineOwner::Protocol,
            flush_pending: false,
        }
    }

    /// Prepares the surface and shows an all-off frame.
    pub fn begin(&mut self) {
        self.surface.begin();
        self.clear();
        self.show();
    }

    /// Number of pixels on the strip.
    pub fn len(&self) -> usize {
        self.surface.len()
    }

    /// Returns true if the strip has no pixels.
    pub fn is_empty(&self) -> bool {
        self.surface.len() == 0
    }

    /// Writes one pixel. Out-of-range indices are ignored.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) {
        if index >= self.surface.len() {
            trace!("ignoring pixel {} on a strip of {}", index, self.surface.len());
            return;
        }
        self.surface.set_pixel(index, color);
    }

    /// Writes one pixel scaled by a brightness percentage (0-100).
    pub fn set_color(&mut self, index: usize, color: Rgb, brightness: u8) {
        self.set_pixel(index, colors::scale(color, brightness));
    }

    /// Writes every pixel from a per-index color function.
    pub fn fill_with(&mut self, mut color_at: impl FnMut(usize) -> Rgb) {
        for index in 0..self.surface.len() {
            self.surface.set_pixel(index, color_at(index));
        }
    }

    /// Turns every pixel off in the frame buffer.
    pub fn clear(&mut self) {
        self.fill_with(|_| COLOR_OFF);
    }

    /// Transmits the frame buffer, or defers it while the line is released.
    pub fn show(&mut self) {
        match self.owner {
            LineOwner::Protocol => self.surface.flush(),
            LineOwner::Raw => self.flush_pending = true,
        }
    }

    /// Transmits the frame buffer right away, taking the line back from raw
    /// output first if it is released.
    ///
    /// A breathing pause in progress picks the line up again on its next slice.
    pub fn show_now(&mut self) {
        if self.owner == LineOwner::Raw {
            self.surface.write_raw_level(0);
            self.surface.restore_protocol_output();
            self.owner = LineOwner::Protocol;
        }
        self.flush_pending = false;
        self.surface.flush();
    }

    /// Current owner of the data line.
    pub fn owner(&self) -> LineOwner {
        self.owner
    }

    /// Returns true if a frame is waiting for the line to be restored.
    pub fn is_flush_pending(&self) -> bool {
        self.flush_pending
    }

    /// Hands the data line to raw analog output.
    pub fn release_line(&mut self) {
        if self.owner == LineOwner::Raw {
            return;
        }
        self.surface.release_for_raw_output();
        self.owner = LineOwner::Raw;
    }

    /// Drives the released line. Ignored while the pixel protocol owns it.
    pub fn write_level(&mut self, level: u8) {
        if self.owner != LineOwner::Raw {
            warn!("raw level {} rejected, line is owned by the pixel protocol", level);
            return;
        }
        self.surface.write_raw_level(level);
    }

    /// Turns the raw output off and hands the line back to the pixel protocol.
    ///
    /// The level is forced to zero first so the switch does not flash. A frame
    /// deferred while the line was released is transmitted here.
    pub fn restore_line(&mut self) {
        if self.owner == LineOwner::Protocol {
            return;
        }
        self.surface.write_raw_level(0);
        self.surface.restore_protocol_output();
        self.owner = LineOwner::Protocol;

        if self.flush_pending {
            self.flush_pending = false;
            self.surface.flush();
        }
    }

    /// Returns a reference to the wrapped surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns a mutable reference to the wrapped surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwraps the surface.
    pub fn into_inner(self) -> S {
        self.surface
    }
}

/// Serialized access to a [`Strip`] shared between the engine and the
/// power/brightness controls.
///
/// The engine holds access for one frame or one pause slice at a time and
/// never across a delay.
pub trait SharedStrip {
    /// The wrapped surface type.
    type Surface: PixelSurface;

    /// Runs `f` with exclusive access to the strip.
    fn with_strip<R>(&self, f: impl FnOnce(&mut Strip<Self::Surface>) -> R) -> R;
}

/// Single-context sharing, e.g. a bare-metal main loop.
impl<S: PixelSurface> SharedStrip for RefCell<Strip<S>> {
    type Surface = S;

    fn with_strip<R>(&self, f: impl FnOnce(&mut Strip<S>) -> R) -> R {
        let mut strip = self.borrow_mut();
        f(&mut *strip)
    }
}

/// Sharing between firmware tasks and interrupt handlers.
impl<S: PixelSurface> SharedStrip for critical_section::Mutex<RefCell<Strip<S>>> {
    type Surface = S;

    fn with_strip<R>(&self, f: impl FnOnce(&mut Strip<S>) -> R) -> R {
        critical_section::with(|cs| {
            let mut strip = self.borrow_ref_mut(cs);
            f(&mut *strip)
        })
    }
}

/// Sharing between OS threads. A poisoned lock is recovered.
#[cfg(feature = "std")]
impl<S: PixelSurface> SharedStrip for std::sync::Mutex<Strip<S>> {
    type Surface = S;

    fn with_strip<R>(&self, f: impl FnOnce(&mut Strip<S>) -> R) -> R {
        let mut strip = self.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut *strip)
    }
}
