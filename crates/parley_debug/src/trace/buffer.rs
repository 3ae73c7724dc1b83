//! Ring buffer for trace records.

use std::collections::{BTreeMap, VecDeque};

use super::record::{TraceEvent, TraceRecord};

/// Default number of records retained.
pub const DEFAULT_BUFFER_SIZE: usize = 10_000;

/// A fixed-capacity buffer of the most recent trace records.
///
/// When full, the oldest record is discarded. Record ids keep increasing
/// across evictions and clears.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    max_size: usize,
    next_id: u64,
}

impl TraceBuffer {
    /// Creates a buffer holding at most `max_size` records.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
            next_id: 0,
        }
    }

    /// Appends an event, evicting the oldest record if over capacity.
    ///
    /// Returns the assigned record ID.
    pub fn push(&mut self, cycle: u64, timestamp_ns: u64, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.records
            .push_back(TraceRecord::new(id, cycle, timestamp_ns, event));
        while self.records.len() > self.max_size {
            self.records.pop_front();
        }
        id
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// The newest record.
    #[must_use]
    pub fn last(&self) -> Option<&TraceRecord> {
        self.records.back()
    }

    /// Records for one cycle.
    #[must_use]
    pub fn records_for_cycle(&self, cycle: u64) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| r.cycle == cycle).collect()
    }

    /// The most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records.iter().skip(start).collect()
    }

    /// Records of one event type.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.event_type() == event_type)
            .collect()
    }

    /// Summary counts.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        let mut event_counts = BTreeMap::new();
        for record in &self.records {
            *event_counts.entry(record.event_type()).or_insert(0) += 1;
        }
        TraceBufferStats {
            record_count: self.records.len(),
            max_size: self.max_size,
            oldest_cycle: self.records.front().map(|r| r.cycle),
            newest_cycle: self.records.back().map(|r| r.cycle),
            event_counts,
        }
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

/// Statistics about a trace buffer.
#[derive(Clone, Debug)]
pub struct TraceBufferStats {
    /// Number of records currently held.
    pub record_count: usize,
    /// Capacity.
    pub max_size: usize,
    /// Cycle of the oldest record.
    pub oldest_cycle: Option<u64>,
    /// Cycle of the newest record.
    pub newest_cycle: Option<u64>,
    /// Count of each event type.
    pub event_counts: BTreeMap<&'static str, usize>,
}
