//! Per-record wait channel
//!
//! A broadcast-only condition variable for use with the table lock. The
//! waiter samples the generation counter while it still holds the lock,
//! releases the lock, and relaxes until the counter moves. Broadcasts
//! happen with the lock held, so a broadcast issued after the sample
//! cannot be missed.

use core::sync::atomic::{AtomicU64, Ordering};
use spin::relax::RelaxStrategy;

/// Broadcast channel that joiners of one record sleep on.
pub struct WaitChannel {
    generation: AtomicU64,
}

/// Generation observed under the table lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTicket(u64);

impl WaitChannel {
    /// A channel nobody has broadcast on yet.
    pub const fn new() -> Self {
        WaitChannel {
            generation: AtomicU64::new(0),
        }
    }

    /// Sample the channel. Call with the table lock held.
    pub fn ticket(&self) -> WaitTicket {
        WaitTicket(self.generation.load(Ordering::Acquire))
    }

    /// Wake every waiter. Call with the table lock held.
    pub fn broadcast(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Block until a broadcast newer than `ticket`. Call with the table
    /// lock released.
    pub fn sleep<R: RelaxStrategy>(&self, ticket: WaitTicket) {
        while self.ticket() == ticket {
            R::relax();
        }
    }
}

impl Default for WaitChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin::relax::Spin;
    use std::sync::Arc;

    struct Yield;

    impl RelaxStrategy for Yield {
        fn relax() {
            std::thread::yield_now();
        }
    }

    #[test]
    fn test_stale_ticket_returns_immediately() {
        let chan = WaitChannel::new();
        let ticket = chan.ticket();
        chan.broadcast();
        chan.sleep::<Spin>(ticket);
        assert_ne!(chan.ticket(), ticket);
    }

    #[test]
    fn test_broadcast_wakes_all() {
        let chan = Arc::new(WaitChannel::new());
        let ticket = chan.ticket();

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let chan = Arc::clone(&chan);
                std::thread::spawn(move || chan.sleep::<Yield>(ticket))
            })
            .collect();

        std::thread::sleep(std::time::Duration::from_millis(10));
        chan.broadcast();

        for waiter in waiters {
            waiter.join().unwrap();
        }
    }
}
