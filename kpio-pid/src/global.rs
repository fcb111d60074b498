//! Global process table handle
//!
//! The kernel builds exactly one table at boot, before the first `alloc`,
//! and reaches it through [`table`] afterwards.

use spin::Once;

use crate::config::{ConfigError, TableConfig};
use crate::table::ProcessTable;

static PROCESS_TABLE: Once<ProcessTable> = Once::new();

/// Build the global table and its bootup process.
///
/// Panics if called twice.
pub fn init(config: TableConfig) -> Result<&'static ProcessTable, ConfigError> {
    let mut fresh = false;
    let table = PROCESS_TABLE.try_call_once(|| {
        fresh = true;
        ProcessTable::bootstrap(config)
    })?;
    assert!(fresh, "process table initialized twice");
    Ok(table)
}

/// The global table. Panics before [`init`].
pub fn table() -> &'static ProcessTable {
    match PROCESS_TABLE.get() {
        Some(table) => table,
        None => panic!("process table used before init"),
    }
}

/// True once [`init`] has run.
pub fn is_initialized() -> bool {
    PROCESS_TABLE.is_completed()
}
