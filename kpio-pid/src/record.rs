//! Process Records
//!
//! One record per live identifier. Records are owned by their table slot
//! and only ever touched with the table lock held.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::pid::Pid;
use crate::wait::WaitChannel;

/// Exit status stored by `unalloc` so a never-run record still satisfies
/// the destruction checks.
pub const UNALLOC_STATUS: i32 = 0xdead;

/// Where a record is in the exit/detach rendezvous.
///
/// `Exited` plus detached is never stored: whichever of `exit` and
/// `detach` arrives second reclaims the record in the same critical
/// section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Running, status still wanted by the parent
    Running,
    /// Running, parent forfeited the status
    Detached,
    /// Terminated with the given status, waiting to be reaped
    Exited(i32),
}

/// Identifiers of the processes a record created.
///
/// Append-only. Entries may name processes that were already reclaimed
/// (or whose id now belongs to someone else), so they are always looked up
/// again before use.
#[derive(Debug, Default, Clone)]
pub struct ChildRegistry {
    pids: Vec<Pid>,
}

impl ChildRegistry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self { pids: Vec::new() }
    }

    /// Record a newly created child.
    pub fn push(&mut self, pid: Pid) {
        self.pids.push(pid);
    }

    /// True if `pid` was ever recorded as a child.
    pub fn contains(&self, pid: Pid) -> bool {
        self.pids.contains(&pid)
    }

    /// Number of children ever recorded.
    pub fn len(&self) -> usize {
        self.pids.len()
    }

    /// True if no child was ever recorded.
    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// Children in creation order.
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.pids.iter().copied()
    }
}

/// Per-process lifecycle state
pub struct ProcessRecord {
    /// Process ID
    pid: Pid,
    /// Parent process ID, `Pid::INVALID` once the link is cut
    parent: Pid,
    /// Who allocated this record; never changes
    creator: Pid,
    /// Exit/detach state
    lifecycle: Lifecycle,
    /// Last posted signal, 0 for none
    signal: u8,
    /// Processes this one created
    children: ChildRegistry,
    /// Joiners sleep here
    wait: Arc<WaitChannel>,
}

impl ProcessRecord {
    pub fn new(pid: Pid, parent: Pid) -> Self {
        debug_assert!(pid != Pid::INVALID);
        Self {
            pid,
            parent,
            creator: parent,
            lifecycle: Lifecycle::Running,
            signal: 0,
            children: ChildRegistry::new(),
            wait: Arc::new(WaitChannel::new()),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn parent(&self) -> Pid {
        self.parent
    }

    pub fn creator(&self) -> Pid {
        self.creator
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_exited(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Exited(_))
    }

    pub fn is_detached(&self) -> bool {
        self.lifecycle == Lifecycle::Detached
    }

    /// Stored status, `None` until exit.
    pub fn exit_status(&self) -> Option<i32> {
        match self.lifecycle {
            Lifecycle::Exited(status) => Some(status),
            _ => None,
        }
    }

    pub fn signal(&self) -> u8 {
        self.signal
    }

    pub fn set_signal(&mut self, signo: u8) {
        self.signal = signo;
    }

    pub fn children(&self) -> &ChildRegistry {
        &self.children
    }

    pub fn add_child(&mut self, pid: Pid) {
        self.children.push(pid);
    }

    pub fn wait_channel(&self) -> &Arc<WaitChannel> {
        &self.wait
    }

    /// Record termination.
    ///
    /// Returns true if the record was already detached and must now be
    /// reclaimed. Panics on a second exit.
    pub fn mark_exited(&mut self, status: i32) -> bool {
        let was_detached = match self.lifecycle {
            Lifecycle::Running => false,
            Lifecycle::Detached => true,
            Lifecycle::Exited(_) => panic!("pid {}: exit called twice", self.pid),
        };
        self.lifecycle = Lifecycle::Exited(status);
        self.parent = Pid::INVALID;
        was_detached
    }

    /// Forfeit the exit status.
    ///
    /// Returns true if the record already exited and must now be
    /// reclaimed. A second detach is left to the caller to reject.
    pub fn mark_detached(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Running => {
                self.lifecycle = Lifecycle::Detached;
                false
            }
            Lifecycle::Exited(_) => {
                self.parent = Pid::INVALID;
                true
            }
            Lifecycle::Detached => panic!("pid {}: detached twice", self.pid),
        }
    }

    /// True once the record is terminated and nobody holds a claim on it.
    pub fn is_reclaimable(&self) -> bool {
        self.is_exited() && self.parent == Pid::INVALID
    }
}

impl core::fmt::Debug for ProcessRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProcessRecord")
            .field("pid", &self.pid)
            .field("parent", &self.parent)
            .field("creator", &self.creator)
            .field("lifecycle", &self.lifecycle)
            .field("signal", &self.signal)
            .field("children", &self.children.len())
            .finish()
    }
}
