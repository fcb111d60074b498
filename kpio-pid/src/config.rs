//! Process table configuration
//!
//! Defaults match the kernel's compiled-in limits. A table can be built
//! smaller (tests, constrained targets) as long as the identifier range
//! stays large relative to the slot count.

use crate::pid::{Pid, PID_MAX, PID_MIN, PROCS_MAX};

/// Sizing for a [`ProcessTable`](crate::ProcessTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of slots, and so the maximum number of live records
    pub capacity: usize,
    /// Smallest allocatable identifier
    pub pid_min: u32,
    /// Largest allocatable identifier
    pub pid_max: u32,
}

/// Rejected table configuration.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("table capacity {0} is too small (need room for bootup plus one process)")]
    CapacityTooSmall(usize),

    #[error("pid_min {0} overlaps the reserved identifiers")]
    ReservedOverlap(u32),

    #[error("empty identifier range {min}..={max}")]
    EmptyRange { min: u32, max: u32 },

    #[error("identifier range of {range} ids is too small for {capacity} slots")]
    RangeTooSmall { range: u64, capacity: usize },
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            capacity: PROCS_MAX,
            pid_min: PID_MIN,
            pid_max: PID_MAX,
        }
    }

    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub const fn with_range(mut self, pid_min: u32, pid_max: u32) -> Self {
        self.pid_min = pid_min;
        self.pid_max = pid_max;
        self
    }

    /// Number of identifiers in `[pid_min, pid_max]`.
    pub const fn range_len(&self) -> u64 {
        if self.pid_max < self.pid_min {
            0
        } else {
            (self.pid_max - self.pid_min) as u64 + 1
        }
    }

    /// True if `pid` is something `alloc` could hand out.
    pub const fn contains(&self, pid: Pid) -> bool {
        pid.0 >= self.pid_min && pid.0 <= self.pid_max
    }

    /// Check the sizing rules.
    ///
    /// The range must hold at least `2 * capacity` identifiers: any window
    /// of that many allocation steps then contains a run of `capacity`
    /// consecutive ids, which touches every slot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < 2 {
            return Err(ConfigError::CapacityTooSmall(self.capacity));
        }
        if self.pid_min <= Pid::BOOTUP.0 {
            return Err(ConfigError::ReservedOverlap(self.pid_min));
        }
        if self.pid_min > self.pid_max {
            return Err(ConfigError::EmptyRange {
                min: self.pid_min,
                max: self.pid_max,
            });
        }
        let range = self.range_len();
        if range < 2 * self.capacity as u64 {
            return Err(ConfigError::RangeTooSmall {
                range,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TableConfig::default();
        assert_eq!(config.capacity, PROCS_MAX);
        assert_eq!(config.range_len(), (PID_MAX - PID_MIN + 1) as u64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_contains() {
        let config = TableConfig::new().with_range(2, 100);
        assert!(!config.contains(Pid::INVALID));
        assert!(!config.contains(Pid::BOOTUP));
        assert!(config.contains(Pid(2)));
        assert!(config.contains(Pid(100)));
        assert!(!config.contains(Pid(101)));
    }

    #[test]
    fn test_rejects_tiny_capacity() {
        let config = TableConfig::new().with_capacity(1);
        assert_eq!(config.validate(), Err(ConfigError::CapacityTooSmall(1)));
    }

    #[test]
    fn test_rejects_reserved_range() {
        let config = TableConfig::new().with_range(1, 100);
        assert_eq!(config.validate(), Err(ConfigError::ReservedOverlap(1)));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let config = TableConfig::new().with_range(50, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyRange { min: 50, max: 10 })
        );
    }

    #[test]
    fn test_rejects_short_range() {
        let config = TableConfig::new().with_capacity(8).with_range(2, 16);
        assert_eq!(
            config.validate(),
            Err(ConfigError::RangeTooSmall {
                range: 15,
                capacity: 8
            })
        );
        assert!(TableConfig::new()
            .with_capacity(8)
            .with_range(2, 17)
            .validate()
            .is_ok());
    }
}
