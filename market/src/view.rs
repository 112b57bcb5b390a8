use std::sync::Arc;

use parking_lot::RwLock;

use crate::price_history::PriceHistory;
use crate::types::{MarketSnapshot, PriceSample};

struct MarketState {
    /// Bumped on every loop start and stop; results tagged with an older
    /// generation are discarded.
    generation: u64,
    latest: Option<MarketSnapshot>,
    history: PriceHistory,
    consecutive_failures: u32,
}

/// Latest committed `(fee, price)` plus the bounded price history.
///
/// Cheap to clone. Written only by the refresh loop; readers take a
/// synchronous snapshot and never observe a half-applied tick.
#[derive(Clone)]
pub struct MarketView {
    inner: Arc<RwLock<MarketState>>,
}

impl Default for MarketView {
    fn default() -> Self {
        Self::new(PriceHistory::default().capacity())
    }
}

impl MarketView {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MarketState {
                generation: 0,
                latest: None,
                history: PriceHistory::with_capacity(history_capacity),
                consecutive_failures: 0,
            })),
        }
    }

    pub fn latest(&self) -> Option<MarketSnapshot> {
        self.inner.read().latest.clone()
    }

    pub fn history(&self) -> PriceHistory {
        self.inner.read().history.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.inner.read().consecutive_failures
    }

    /// Drop the latest snapshot and the whole history (session teardown).
    pub fn clear(&self) {
        let mut g = self.inner.write();
        g.latest = None;
        g.history.clear();
        g.consecutive_failures = 0;
    }

    /// Open a new generation, invalidating whatever was running before.
    ///
    /// With `forget_latest` the previous snapshot is dropped so no quote is
    /// computed from a reader that is no longer in use.
    pub(crate) fn begin_generation(&self, forget_latest: bool) -> u64 {
        let mut g = self.inner.write();
        g.generation += 1;
        g.consecutive_failures = 0;
        if forget_latest {
            g.latest = None;
        }
        g.generation
    }

    /// Close `generation` if it is still the current one. Returns whether
    /// anything changed.
    pub(crate) fn retire(&self, generation: u64) -> bool {
        let mut g = self.inner.write();
        if g.generation != generation {
            return false;
        }
        g.generation += 1;
        true
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.inner.read().generation == generation
    }

    /// Apply a successful read. Returns `false` (and changes nothing) when
    /// `generation` has been retired in the meantime.
    pub(crate) fn commit(&self, generation: u64, snapshot: MarketSnapshot) -> bool {
        let mut g = self.inner.write();
        if g.generation != generation {
            return false;
        }
        g.history.push(PriceSample {
            at: snapshot.observed_at,
            price: snapshot.price.clone(),
        });
        g.latest = Some(snapshot);
        g.consecutive_failures = 0;
        true
    }

    /// Count a failed read. `None` when `generation` is stale.
    pub(crate) fn record_failure(&self, generation: u64) -> Option<u32> {
        let mut g = self.inner.write();
        if g.generation != generation {
            return None;
        }
        g.consecutive_failures += 1;
        Some(g.consecutive_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeeBps, OraclePrice};
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    fn snapshot(price: i64) -> MarketSnapshot {
        MarketSnapshot {
            fee_bps: FeeBps::new(30).unwrap(),
            price: OraclePrice::new(BigDecimal::from(price)).unwrap(),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn commit_applies_only_for_current_generation() {
        let view = MarketView::default();
        let g1 = view.begin_generation(false);

        assert!(view.commit(g1, snapshot(100)));
        assert_eq!(view.history().len(), 1);

        let g2 = view.begin_generation(false);
        assert!(!view.commit(g1, snapshot(200)));
        assert_eq!(view.latest().unwrap().price.to_string(), "100");

        assert!(view.commit(g2, snapshot(300)));
        assert_eq!(view.latest().unwrap().price.to_string(), "300");
        assert_eq!(view.history().len(), 2);
    }

    #[test]
    fn retire_is_idempotent_and_scoped() {
        let view = MarketView::default();
        let g1 = view.begin_generation(false);

        assert!(view.retire(g1));
        assert!(!view.retire(g1));
        assert!(!view.commit(g1, snapshot(1)));
        assert!(view.latest().is_none());

        let g2 = view.begin_generation(false);
        // Retiring an old handle must not disturb the new generation.
        assert!(!view.retire(g1));
        assert!(view.is_current(g2));
    }

    #[test]
    fn failures_are_counted_and_reset_by_success() {
        let view = MarketView::default();
        let g = view.begin_generation(false);

        assert_eq!(view.record_failure(g), Some(1));
        assert_eq!(view.record_failure(g), Some(2));
        assert!(view.commit(g, snapshot(5)));
        assert_eq!(view.consecutive_failures(), 0);
        assert_eq!(view.record_failure(g + 1), None);
    }

    #[test]
    fn new_generation_can_forget_latest_but_keeps_history() {
        let view = MarketView::default();
        let g = view.begin_generation(false);
        view.commit(g, snapshot(7));

        view.begin_generation(true);
        assert!(view.latest().is_none());
        assert_eq!(view.history().len(), 1);

        view.clear();
        assert!(view.history().is_empty());
    }
}
