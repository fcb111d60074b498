//! Shared helpers for the integration tests.

#![allow(dead_code)]

use kpio_pid::{ProcessTable, RelaxStrategy, TableConfig};

/// Relax by yielding the host thread, standing in for the kernel's
/// scheduler yield.
pub struct ThreadYield;

impl RelaxStrategy for ThreadYield {
    fn relax() {
        std::thread::yield_now();
    }
}

pub type Table = ProcessTable<ThreadYield>;

/// Default-sized table.
pub fn table() -> Table {
    Table::bootstrap(TableConfig::default()).unwrap()
}

/// Table with `capacity` slots and a range just large enough for it.
pub fn small_table(capacity: usize) -> Table {
    let config = TableConfig::new()
        .with_capacity(capacity)
        .with_range(2, 2 + 4 * capacity as u32);
    Table::bootstrap(config).unwrap()
}
