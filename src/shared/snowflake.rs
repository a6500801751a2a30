//! Snowflake ID Generator
//!
//! Time-ordered 64-bit identifiers for every stored row. Ordering by id is
//! ordering by creation time, which message and feed pagination rely on.
//!
//! ```text
//! 63                     22           12            0
//! +-----------------------+------------+------------+
//! |  ms since epoch (41)  | machine(10)| sequence(12)|
//! +-----------------------+------------+------------+
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// 2025-01-01T00:00:00Z
pub const LINKME_EPOCH: u64 = 1_735_689_600_000;

const MACHINE_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const MACHINE_MASK: u64 = (1 << MACHINE_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    epoch: u64,
    machine_id: u64,
    /// Packed `(timestamp << 12) | sequence` of the last issued id.
    state: AtomicU64,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(machine_id: u64, epoch: u64) -> Self {
        Self {
            epoch,
            machine_id: machine_id & MACHINE_MASK,
            state: AtomicU64::new(0),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        loop {
            let now = self.current_timestamp();
            let last = self.state.load(Ordering::Acquire);
            let last_ts = last >> SEQUENCE_BITS;

            let next = if now > last_ts {
                now << SEQUENCE_BITS
            } else {
                // Same millisecond (or clock went back): bump the sequence on
                // the last timestamp; overflow rolls into the next millisecond.
                last + 1
            };

            if self
                .state
                .compare_exchange(last, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let ts = next >> SEQUENCE_BITS;
                let seq = next & SEQUENCE_MASK;
                let id = (ts.saturating_sub(self.epoch) << (MACHINE_BITS + SEQUENCE_BITS))
                    | (self.machine_id << SEQUENCE_BITS)
                    | seq;
                return id as i64;
            }
        }
    }

    /// Milliseconds since the Unix epoch at which `id` was generated.
    pub fn timestamp_of(&self, id: i64) -> u64 {
        ((id as u64) >> (MACHINE_BITS + SEQUENCE_BITS)) + self.epoch
    }

    fn current_timestamp(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}
