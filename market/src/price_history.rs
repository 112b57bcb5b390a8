use std::collections::VecDeque;

use crate::types::{OraclePrice, PriceSample};

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Count-bounded price window, ordered oldest to newest.
///
/// Appending beyond `capacity` drops the oldest sample.
#[derive(Clone, Debug)]
pub struct PriceHistory {
    samples: VecDeque<PriceSample>,
    capacity: usize,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PriceHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: PriceSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSample> {
        self.samples.iter()
    }

    /// Lowest and highest price in the window (chart axis bounds).
    pub fn range(&self) -> Option<(&OraclePrice, &OraclePrice)> {
        let first = &self.samples.front()?.price;
        Some(self.samples.iter().fold((first, first), |(lo, hi), s| {
            (
                if s.price < *lo { &s.price } else { lo },
                if s.price > *hi { &s.price } else { hi },
            )
        }))
    }

    pub fn to_vec(&self) -> Vec<PriceSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
