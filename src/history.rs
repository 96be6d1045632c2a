// Rolling packet-count history (ring buffer of the last N slices)

use crate::models::HistoryPoint;
use std::collections::VecDeque;

/// Fixed-capacity history, pre-filled so readers never see a partial window.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Creates a full buffer of `capacity` zero-count points stamped `start_timestamp`.
    pub fn new(capacity: usize, start_timestamp: u64) -> Self {
        let points = std::iter::repeat_n(
            HistoryPoint {
                timestamp: start_timestamp,
                packet_count: 0,
            },
            capacity,
        )
        .collect();
        Self { points, capacity }
    }

    /// Appends a point, evicting the oldest when at capacity.
    pub fn push(&mut self, timestamp: u64, packet_count: u64) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(HistoryPoint {
            timestamp,
            packet_count,
        });
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryPoint> {
        self.points.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<HistoryPoint> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
