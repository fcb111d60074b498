//! KPIO Process Identity and Lifecycle
//!
//! Hands out process identifiers, tracks who created whom, and implements
//! the exit/join/detach protocol that lets one process collect another's
//! exit status exactly once.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          syscall layer (fork/wait/...)        │
//! ├──────────────────────────────────────────────┤
//! │  ProcessTable  (one spin lock)                │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────────┐  │
//! │  │  table   │ │ manager  │ │    signal    │  │
//! │  │ alloc    │ │ exit     │ │ set / get    │  │
//! │  │ unalloc  │ │ join     │ │              │  │
//! │  │          │ │ detach   │ │              │  │
//! │  └────┬─────┘ └────┬─────┘ └──────────────┘  │
//! │       └──── slots[pid % capacity] ────┘       │
//! │            ProcessRecord + WaitChannel        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `pid`: identifier type and reserved values
//! - `config`: table sizing
//! - `record`: per-process state and the children registry
//! - `table`: slot storage and allocation
//! - `manager`: exit/join/detach
//! - `signal`: signal numbers accepted by `set_signal`
//! - `wait`: broadcast wait channel used by `join`
//! - `global`: the boot-time table handle

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod global;
pub mod manager;
pub mod pid;
pub mod record;
pub mod signal;
pub mod table;
pub mod wait;

pub use config::{ConfigError, TableConfig};
pub use error::{PidError, Result};
pub use manager::{JoinStatus, WaitFlags};
pub use pid::{Pid, PID_MAX, PID_MIN, PROCS_MAX};
pub use record::Lifecycle;
pub use table::{ProcessInfo, ProcessTable};

/// Re-exported so callers can name their relax strategy without a direct
/// `spin` dependency.
pub use spin::relax::{RelaxStrategy, Spin};
