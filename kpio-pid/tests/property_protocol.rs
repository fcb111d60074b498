//! Properties of the exit/join/detach rendezvous
//!
//! - Single reclamation: whatever order `exit` and `detach` arrive in, the
//!   record disappears exactly when the second one returns.
//! - Self-wait rejection: joining yourself always fails with `SelfWait`.
//! - Status visibility: the status passed to `exit` is what `join` sees.

mod common;

use common::table;
use kpio_pid::{JoinStatus, Pid, PidError, WaitFlags};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn reclaimed_by_second_arrival(exit_first in any::<bool>(), status in any::<i32>()) {
        let table = table();
        let child = table.alloc(Pid::BOOTUP).unwrap();

        if exit_first {
            table.exit(child, status, false);
            prop_assert!(table.contains(child));
            table.detach(Pid::BOOTUP, child).unwrap();
        } else {
            table.detach(Pid::BOOTUP, child).unwrap();
            prop_assert!(table.contains(child));
            table.exit(child, status, false);
        }

        prop_assert!(!table.contains(child));
        prop_assert_eq!(table.live_count(), 1);
        prop_assert_eq!(
            table.detach(Pid::BOOTUP, child),
            Err(PidError::NoSuchProcess)
        );
    }

    #[test]
    fn self_wait_always_rejected(
        raw in 0u32..40_000,
        exited in any::<bool>(),
        nohang in any::<bool>()
    ) {
        let table = table();
        let child = table.alloc(Pid::BOOTUP).unwrap();
        if exited {
            table.exit(child, 0, false);
        }
        let flags = if nohang { WaitFlags::NOHANG } else { WaitFlags::empty() };

        prop_assert_eq!(table.join(child, child, flags), Err(PidError::SelfWait));
        prop_assert_eq!(table.join(Pid(raw), Pid(raw), flags), Err(PidError::SelfWait));
    }

    #[test]
    fn join_sees_exit_status(status in any::<i32>(), observers in 1usize..6) {
        let table = table();
        let child = table.alloc(Pid::BOOTUP).unwrap();
        let others: Vec<Pid> = (0..observers)
            .map(|_| table.alloc(Pid::BOOTUP).unwrap())
            .collect();

        prop_assert_eq!(
            table.join(Pid::BOOTUP, child, WaitFlags::NOHANG),
            Ok(JoinStatus::Pending)
        );
        table.exit(child, status, false);
        for me in others {
            prop_assert_eq!(
                table.join(me, child, WaitFlags::empty()),
                Ok(JoinStatus::Exited(status))
            );
        }
    }
}
