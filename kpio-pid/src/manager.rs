//! Process Lifecycle
//!
//! The exit/join/detach protocol. `exit` and `detach` meet at the
//! record's `Lifecycle`: whichever of the two runs second reclaims the
//! record. `join` only reads the status; it never reclaims.
//!
//! Every check-then-act sequence runs under the table lock, so once
//! `exit` returns every later `join`/`detach` sees the exit, and once
//! `detach` returns every later `join` fails with `AlreadyDetached`.

use alloc::sync::Arc;
use alloc::vec::Vec;
use bitflags::bitflags;
use spin::relax::RelaxStrategy;

use crate::error::{PidError, Result};
use crate::pid::Pid;
use crate::signal;
use crate::table::{ProcessTable, Slots};

bitflags! {
    /// Options for [`ProcessTable::join`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WaitFlags: u32 {
        /// Return `Pending` instead of blocking
        const NOHANG = 0x1;
    }
}

/// Outcome of a successful `join`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStatus {
    /// The target exited with this status
    Exited(i32),
    /// The target is still running and `NOHANG` was given
    Pending,
}

/// Forfeit a record's status and reclaim it if it already exited.
///
/// Wakes joiners so they see the detach.
fn detach_locked(slots: &mut Slots, pid: Pid) {
    let reclaim = match slots.get_mut(pid) {
        Some(rec) => {
            let reclaim = rec.mark_detached();
            rec.wait_channel().broadcast();
            reclaim
        }
        None => return,
    };
    log::debug!("pid {} detached", pid);
    if reclaim {
        slots.remove(pid);
    }
}

/// Best-effort detach of one registry entry during a cascading exit.
///
/// The entry may already be gone, already detached, or the id may now
/// belong to a process someone else created; all of those are skipped.
fn detach_child(slots: &mut Slots, parent: Pid, child: Pid) {
    let eligible = slots
        .get(child)
        .is_some_and(|rec| rec.creator() == parent && !rec.is_detached());
    if eligible {
        detach_locked(slots, child);
    } else {
        log::trace!("cascade from {}: skipping {}", parent, child);
    }
}

impl<R: RelaxStrategy> ProcessTable<R> {
    /// Publish `pid`'s exit status and wake its joiners.
    ///
    /// Called once, by the exiting process. With `cascade_detach` the
    /// process and every child it created are detached as well, so none
    /// of them will ever need a `join`/`detach` to be reclaimed. The
    /// record is reclaimed before returning if it ends up detached.
    ///
    /// Panics if `pid` is not live or has already exited.
    pub fn exit(&self, pid: Pid, status: i32, cascade_detach: bool) {
        let mut slots = self.lock();

        let (mut reclaim, channel, children) = match slots.get_mut(pid) {
            Some(rec) => {
                let reclaim = rec.mark_exited(status);
                let children: Vec<Pid> = if cascade_detach {
                    rec.children().iter().collect()
                } else {
                    Vec::new()
                };
                (reclaim, Arc::clone(rec.wait_channel()), children)
            }
            None => panic!("exit: pid {} is not live", pid),
        };
        log::debug!("pid {} exited with status {}", pid, status);

        if cascade_detach {
            reclaim = true;
            for child in children {
                detach_child(&mut slots, pid, child);
            }
        }

        channel.broadcast();

        if reclaim {
            slots.remove(pid);
        }
    }

    /// Wait for `target` to exit and return its status.
    ///
    /// Blocks unless `flags` contains `NOHANG`, in which case a running
    /// target yields `JoinStatus::Pending`. Several callers may join the
    /// same target; none of them reclaims it.
    ///
    /// If the target disappears while the caller sleeps it was detached
    /// (or its slot reused), and the caller gets `AlreadyDetached`.
    pub fn join(&self, caller: Pid, target: Pid, flags: WaitFlags) -> Result<JoinStatus> {
        if target == caller {
            return Err(PidError::SelfWait);
        }
        if target.is_reserved() || !self.config().contains(target) {
            return Err(PidError::InvalidTarget);
        }

        let mut slots = self.lock();
        let channel = match slots.get(target) {
            Some(rec) => Arc::clone(rec.wait_channel()),
            None => return Err(PidError::NoSuchProcess),
        };

        loop {
            match slots.get(target) {
                Some(rec) if Arc::ptr_eq(rec.wait_channel(), &channel) => {
                    if rec.is_detached() {
                        return Err(PidError::AlreadyDetached);
                    }
                    if let Some(status) = rec.exit_status() {
                        return Ok(JoinStatus::Exited(status));
                    }
                }
                _ => return Err(PidError::AlreadyDetached),
            }

            if flags.contains(WaitFlags::NOHANG) {
                return Ok(JoinStatus::Pending);
            }

            let ticket = channel.ticket();
            drop(slots);
            log::trace!("pid {} waiting on {}", caller, target);
            channel.sleep::<R>(ticket);
            slots = self.lock();
        }
    }

    /// Give up interest in `target`'s exit status.
    ///
    /// Only the parent may detach. If the target already exited it is
    /// reclaimed now; otherwise its own `exit` will reclaim it.
    pub fn detach(&self, caller: Pid, target: Pid) -> Result<()> {
        if target.is_reserved() || !self.config().contains(target) {
            return Err(PidError::InvalidTarget);
        }

        let mut slots = self.lock();
        let rec = slots.get(target).ok_or(PidError::NoSuchProcess)?;
        if rec.is_detached() {
            return Err(PidError::AlreadyDetached);
        }

        // The caller's own registry must list the target, so a process
        // that inherited a reaped parent's pid is not taken for the parent.
        // An exited record has already cut its parent link; fall back to
        // the creator.
        let listed = slots
            .get(caller)
            .is_some_and(|parent| parent.children().contains(target));
        let is_parent =
            listed && (rec.parent() == caller || (rec.is_exited() && rec.creator() == caller));
        if !is_parent {
            return Err(PidError::NotParent);
        }

        detach_locked(&mut slots, target);
        Ok(())
    }

    /// Post a signal number on `pid`. 0 clears it.
    pub fn set_signal(&self, pid: Pid, signo: i32) -> Result<()> {
        let signo = signal::check(signo)?;
        if !self.config().contains(pid) {
            return Err(PidError::NoSuchProcess);
        }

        let mut slots = self.lock();
        match slots.get_mut(pid) {
            Some(rec) if !rec.is_exited() => {
                rec.set_signal(signo);
                log::debug!("pid {}: signal {} posted", pid, signo);
                Ok(())
            }
            _ => Err(PidError::NoSuchProcess),
        }
    }

    /// Last signal posted on `pid`, 0 if none.
    pub fn get_signal(&self, pid: Pid) -> Result<u8> {
        if !self.config().contains(pid) {
            return Err(PidError::NoSuchProcess);
        }

        let slots = self.lock();
        match slots.get(pid) {
            Some(rec) if !rec.is_exited() => Ok(rec.signal()),
            _ => Err(PidError::NoSuchProcess),
        }
    }
}
