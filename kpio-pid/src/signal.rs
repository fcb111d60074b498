//! Signal numbers
//!
//! The process table keeps one pending signal per process as a plain
//! number. Only the signals listed here can be posted; delivery is done
//! elsewhere.

use crate::error::{PidError, Result};

// ─── Signal numbers (BSD layout) ────────────────────────────────────

pub const SIGHUP: u8 = 1;
pub const SIGINT: u8 = 2;
pub const SIGKILL: u8 = 9;
pub const SIGTERM: u8 = 15;
pub const SIGSTOP: u8 = 17;
pub const SIGCONT: u8 = 19;
pub const SIGWINCH: u8 = 28;
pub const SIGINFO: u8 = 29;

/// Signal numbers are `0..NSIG`.
pub const NSIG: usize = 32;

/// Signals that may be posted with `set_signal`.
pub const SUPPORTED: [u8; 8] = [
    SIGHUP, SIGINT, SIGKILL, SIGTERM, SIGSTOP, SIGCONT, SIGWINCH, SIGINFO,
];

/// True for 0 ("no signal") and every signal in [`SUPPORTED`].
pub fn is_supported(signo: i32) -> bool {
    if signo == 0 {
        return true;
    }
    if signo < 0 || signo as usize >= NSIG {
        return false;
    }
    SUPPORTED.contains(&(signo as u8))
}

/// Validate a signal number before it is stored.
pub(crate) fn check(signo: i32) -> Result<u8> {
    if is_supported(signo) {
        Ok(signo as u8)
    } else {
        Err(PidError::NotSupported)
    }
}
