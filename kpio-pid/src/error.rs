//! Process lifecycle error types

/// Errno values the syscall layer hands back to user space.
pub mod errno {
    pub const ESRCH: i32 = 3;
    pub const EAGAIN: i32 = 11;
    pub const EINVAL: i32 = 22;
    pub const EDEADLK: i32 = 35;
    /// Recognized but unimplemented request
    pub const EUNIMP: i32 = 38;
}

/// All recoverable errors produced by the process table.
///
/// Internal consistency violations are not represented here; they panic.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidError {
    /// Every slot is occupied
    #[error("process table is full")]
    OutOfIdentifiers,

    /// Reserved or out-of-range identifier
    #[error("invalid target process id")]
    InvalidTarget,

    /// Identifier is not live in the table
    #[error("no such process")]
    NoSuchProcess,

    /// A process tried to wait for itself
    #[error("process cannot wait for itself")]
    SelfWait,

    /// The target was detached; its status is no longer observable
    #[error("process is detached")]
    AlreadyDetached,

    /// Caller is not the target's parent
    #[error("caller is not the parent of the target process")]
    NotParent,

    /// Unrecognized signal number
    #[error("signal not supported")]
    NotSupported,
}

impl PidError {
    /// Map each variant to the errno returned by the syscall layer.
    ///
    /// `NotParent` and `AlreadyDetached` share `EINVAL`, which is what
    /// user space has always seen for both.
    pub fn errno(&self) -> i32 {
        match self {
            Self::OutOfIdentifiers => errno::EAGAIN,
            Self::InvalidTarget | Self::AlreadyDetached | Self::NotParent => errno::EINVAL,
            Self::NoSuchProcess => errno::ESRCH,
            Self::SelfWait => errno::EDEADLK,
            Self::NotSupported => errno::EUNIMP,
        }
    }
}

/// Result type for process table operations
pub type Result<T> = core::result::Result<T, PidError>;
