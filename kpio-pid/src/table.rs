//! Process Table
//!
//! A fixed number of slots indexed by `pid % capacity`, one record per
//! slot. When the next candidate identifier lands on an occupied slot the
//! identifier is skipped rather than chained; the identifier space is
//! much larger than the slot count, so skipping is cheap.

use alloc::boxed::Box;
use alloc::vec::Vec;
use spin::mutex::{Mutex, MutexGuard};
use spin::relax::{RelaxStrategy, Spin};

use crate::config::{ConfigError, TableConfig};
use crate::error::{PidError, Result};
use crate::pid::Pid;
use crate::record::{Lifecycle, ProcessRecord, UNALLOC_STATUS};

/// Slot storage. Only reachable through the table lock.
pub(crate) struct Slots {
    slots: Box<[Option<ProcessRecord>]>,
    config: TableConfig,
    /// Next candidate identifier
    next_pid: u32,
    /// Number of occupied slots
    nprocs: usize,
}

impl Slots {
    fn new(config: TableConfig) -> Self {
        let mut slots = Vec::with_capacity(config.capacity);
        slots.resize_with(config.capacity, || None);
        Self {
            slots: slots.into_boxed_slice(),
            config,
            next_pid: config.pid_min,
            nprocs: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.nprocs
    }

    /// Look up a live record. A slot holding a different identifier means
    /// `pid` is gone.
    pub(crate) fn get(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.slots[pid.slot(self.capacity())]
            .as_ref()
            .filter(|rec| rec.pid() == pid)
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessRecord> {
        let idx = pid.slot(self.capacity());
        self.slots[idx].as_mut().filter(|rec| rec.pid() == pid)
    }

    /// Put a record in its slot. The slot must be empty.
    fn insert(&mut self, rec: ProcessRecord) {
        let idx = rec.pid().slot(self.capacity());
        assert!(
            self.slots[idx].is_none(),
            "pid {}: slot {} already occupied",
            rec.pid(),
            idx
        );
        self.slots[idx] = Some(rec);
        self.nprocs += 1;
    }

    /// Destroy a terminated, fully disowned record.
    pub(crate) fn remove(&mut self, pid: Pid) -> ProcessRecord {
        let idx = pid.slot(self.capacity());
        let rec = match self.slots[idx].take() {
            Some(rec) if rec.pid() == pid => rec,
            Some(other) => panic!("reclaim pid {}: slot {} holds pid {}", pid, idx, other.pid()),
            None => panic!("reclaim pid {}: slot {} is empty", pid, idx),
        };
        assert!(
            rec.is_reclaimable(),
            "reclaim pid {}: record still claimed ({:?})",
            pid,
            rec
        );
        self.nprocs -= 1;
        log::debug!("pid {} reclaimed", pid);
        rec
    }

    fn inc_next_pid(&mut self) {
        if self.next_pid >= self.config.pid_max {
            self.next_pid = self.config.pid_min;
        } else {
            self.next_pid += 1;
        }
    }

    /// Hand out the next free identifier and link it under `parent`.
    pub(crate) fn alloc(&mut self, parent: Pid) -> Result<Pid> {
        if self.nprocs == self.capacity() {
            log::warn!("pid alloc for {}: table full ({} slots)", parent, self.capacity());
            return Err(PidError::OutOfIdentifiers);
        }
        if self.get(parent).is_none() {
            return Err(PidError::NoSuchProcess);
        }

        // The capacity check above guarantees a free slot, so this only
        // runs long if nprocs is wrong.
        let limit = self.capacity() * 2 + 5;
        let mut steps = 0;
        while self.slots[Pid(self.next_pid).slot(self.capacity())].is_some() {
            assert!(
                steps < limit,
                "pid alloc: no free slot after {} steps with {} of {} in use",
                steps,
                self.nprocs,
                self.capacity()
            );
            steps += 1;
            log::trace!("pid {} collides, skipping", self.next_pid);
            self.inc_next_pid();
        }

        let pid = Pid(self.next_pid);
        self.insert(ProcessRecord::new(pid, parent));
        if let Some(parent_rec) = self.get_mut(parent) {
            parent_rec.add_child(pid);
        }
        self.inc_next_pid();

        log::debug!("pid {} allocated (parent {})", pid, parent);
        Ok(pid)
    }

    fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

/// Read-only copy of a record, taken under the table lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub parent: Pid,
    pub lifecycle: Lifecycle,
    pub signal: u8,
    pub children: usize,
}

impl From<&ProcessRecord> for ProcessInfo {
    fn from(rec: &ProcessRecord) -> Self {
        ProcessInfo {
            pid: rec.pid(),
            parent: rec.parent(),
            lifecycle: rec.lifecycle(),
            signal: rec.signal(),
            children: rec.children().len(),
        }
    }
}

/// The process table.
///
/// One lock covers every slot and every record field. `R` decides what a
/// blocked `join` does while it waits; the kernel supplies a strategy that
/// yields to the scheduler.
pub struct ProcessTable<R = Spin> {
    config: TableConfig,
    slots: Mutex<Slots, R>,
}

impl<R: RelaxStrategy> ProcessTable<R> {
    /// Build the table and create the bootup process.
    pub fn bootstrap(config: TableConfig) -> core::result::Result<Self, ConfigError> {
        config.validate()?;

        let mut slots = Slots::new(config);
        slots.insert(ProcessRecord::new(Pid::BOOTUP, Pid::INVALID));

        log::info!(
            "process table ready: {} slots, pids {}..={}",
            config.capacity,
            config.pid_min,
            config.pid_max
        );

        Ok(Self {
            config,
            slots: Mutex::new(slots),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock()
    }

    /// Allocate an identifier for a new child of `parent`.
    pub fn alloc(&self, parent: Pid) -> Result<Pid> {
        self.lock().alloc(parent)
    }

    /// Undo an `alloc` for a process that never ran.
    ///
    /// Only for error cleanup by the parent that allocated `pid`. Misuse
    /// is a kernel bug and panics.
    pub fn unalloc(&self, caller: Pid, pid: Pid) {
        assert!(self.config.contains(pid), "unalloc: pid {} out of range", pid);
        let mut slots = self.lock();

        let listed = slots
            .get(caller)
            .is_some_and(|parent| parent.children().contains(pid));
        let rec = match slots.get_mut(pid) {
            Some(rec) => rec,
            None => panic!("unalloc: pid {} is not live", pid),
        };
        assert!(!rec.is_exited(), "unalloc: pid {} already exited", pid);
        assert!(
            listed && rec.parent() == caller,
            "unalloc: pid {} is not a child of {}",
            pid,
            caller
        );
        rec.mark_exited(UNALLOC_STATUS);

        slots.remove(pid);
        log::debug!("pid {} unallocated by {}", pid, caller);
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    /// Slot count.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Number of records currently in the table, bootup included.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    /// True if `pid` has a record.
    pub fn contains(&self, pid: Pid) -> bool {
        self.lock().get(pid).is_some()
    }

    /// Copy out one record.
    pub fn snapshot(&self, pid: Pid) -> Option<ProcessInfo> {
        self.lock().get(pid).map(ProcessInfo::from)
    }

    /// Copy out every record, in slot order.
    pub fn processes_snapshot(&self) -> Vec<ProcessInfo> {
        self.lock().iter().map(ProcessInfo::from).collect()
    }

    /// Tear the table down at system shutdown.
    ///
    /// Returns the number of records dropped, bootup included.
    pub fn shutdown(self) -> usize {
        let slots = self.slots.into_inner();
        for rec in slots.iter().filter(|rec| rec.pid() != Pid::BOOTUP) {
            log::warn!("shutdown: pid {} still in table ({:?})", rec.pid(), rec.lifecycle());
        }
        slots.len()
    }
}
