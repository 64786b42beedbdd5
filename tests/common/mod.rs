//! Shared test infrastructure for rgb-strip-animator integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use rgb_strip_animator::{COLOR_OFF, PixelSurface, Rgb, Strip};

// ============================================================================
// Mock Surface
// ============================================================================

/// Calls made on the surface, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Flush,
    Release,
    Level(u8),
    Restore,
}

/// Mock strip driver that keeps a frame buffer, the last transmitted frame
/// and a log of pin operations.
pub struct MockSurface<const N: usize> {
    buffer: [Rgb; N],
    shown: [Rgb; N],
    raw_output: bool,
    pub begun: bool,
    pub flush_count: usize,
    /// Flushes or raw writes issued while the other protocol owned the pin.
    pub violations: usize,
    events: heapless::Vec<SurfaceEvent, 256>,
}

impl<const N: usize> MockSurface<N> {
    pub fn new() -> Self {
        Self {
            buffer: [COLOR_OFF; N],
            shown: [COLOR_OFF; N],
            raw_output: false,
            begun: false,
            flush_count: 0,
            violations: 0,
            events: heapless::Vec::new(),
        }
    }

    /// Color last transmitted for a pixel.
    pub fn shown(&self, index: usize) -> Rgb {
        self.shown[index]
    }

    /// Color currently in the frame buffer.
    pub fn buffered(&self, index: usize) -> Rgb {
        self.buffer[index]
    }

    pub fn shown_frame(&self) -> &[Rgb] {
        &self.shown
    }

    pub fn is_raw_output(&self) -> bool {
        self.raw_output
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Raw levels written, in order.
    pub fn levels(&self) -> heapless::Vec<u8, 256> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Level(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, event: SurfaceEvent) {
        let _ = self.events.push(event);
    }
}

impl<const N: usize> PixelSurface for MockSurface<N> {
    fn len(&self) -> usize {
        N
    }

    fn begin(&mut self) {
        self.begun = true;
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        self.buffer[index] = color;
    }

    fn flush(&mut self) {
        if self.raw_output {
            self.violations += 1;
        }
        self.shown = self.buffer;
        self.flush_count += 1;
        self.record(SurfaceEvent::Flush);
    }

    fn release_for_raw_output(&mut self) {
        self.raw_output = true;
        self.record(SurfaceEvent::Release);
    }

    fn restore_protocol_output(&mut self) {
        self.raw_output = false;
        self.record(SurfaceEvent::Restore);
    }

    fn write_raw_level(&mut self, level: u8) {
        if !self.raw_output {
            self.violations += 1;
        }
        self.record(SurfaceEvent::Level(level));
    }
}

/// Strip shared through a `RefCell`, as on a single-context firmware loop.
pub type TestStrip<const N: usize> = RefCell<Strip<MockSurface<N>>>;

pub fn test_strip<const N: usize>() -> TestStrip<N> {
    RefCell::new(Strip::new(MockSurface::new()))
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Delay that returns immediately and accumulates the requested time.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}
