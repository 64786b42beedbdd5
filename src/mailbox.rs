//! Single-slot command mailbox between producers and the animation engine.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Error returned when a value is already waiting in the mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MailboxFull {
    /// The value that was not posted.
    pub rejected: u32,
}

impl core::fmt::Display for MailboxFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "mailbox already holds an unconsumed command, {} was not posted",
            self.rejected
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MailboxFull {}

/// Holds at most one pending command code.
///
/// Posting never overwrites: while a value is pending, further posts fail and
/// the caller decides whether to retry. Neither side ever blocks. The engine
/// drains the slot once per frame, so contention lasts at most one frame.
///
/// `Mailbox::new` is `const`, so a mailbox can live in a `static` and be shared
/// between firmware tasks.
pub struct Mailbox {
    slot: Channel<CriticalSectionRawMutex, u32, 1>,
}

impl Mailbox {
    /// Creates an empty mailbox.
    pub const fn new() -> Self {
        Self {
            slot: Channel::new(),
        }
    }

    /// Stores `value` if the slot is empty.
    pub fn post(&self, value: u32) -> Result<(), MailboxFull> {
        self.slot
            .try_send(value)
            .map_err(|_| MailboxFull { rejected: value })
    }

    /// Stores `value` if the slot is empty. Returns `false` when it was not.
    pub fn try_post(&self, value: u32) -> bool {
        self.post(value).is_ok()
    }

    /// Removes and returns the pending value, if any.
    pub fn try_take(&self) -> Option<u32> {
        self.slot.try_receive().ok()
    }

    /// Returns true if a value is waiting to be taken.
    pub fn is_pending(&self) -> bool {
        !self.slot.is_empty()
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}
