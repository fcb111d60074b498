//! Process identifiers
//!
//! Identifiers live in `[PID_MIN, PID_MAX]`. Two values below that range
//! are reserved: `Pid::INVALID` means "no process" and `Pid::BOOTUP` is the
//! parentless process created at bootstrap.

use core::fmt;

/// Smallest identifier handed out by `alloc`.
pub const PID_MIN: u32 = 2;

/// Largest identifier handed out by `alloc`.
pub const PID_MAX: u32 = 32767;

/// Default number of slots in the process table.
pub const PROCS_MAX: usize = 128;

/// Process ID type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u32);

impl Pid {
    /// "No process". Never allocated.
    pub const INVALID: Pid = Pid(0);

    /// The first process, created at bootstrap with no parent.
    pub const BOOTUP: Pid = Pid(1);

    /// Create a Pid from a raw value
    pub const fn from_u32(val: u32) -> Self {
        Pid(val)
    }

    /// Get the raw ID value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// True for the two reserved values.
    pub const fn is_reserved(&self) -> bool {
        self.0 == Self::INVALID.0 || self.0 == Self::BOOTUP.0
    }

    /// Slot index in a table of `capacity` slots.
    pub(crate) const fn slot(&self, capacity: usize) -> usize {
        self.0 as usize % capacity
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pid> for u32 {
    fn from(pid: Pid) -> u32 {
        pid.0
    }
}
