//! Sparse pair-frequency accounting and deterministic merge selection.

use rustc_hash::FxHashMap;

use crate::stream::TokenStream;
use crate::vocab::Pair;

/// Occurrence counts over ordered pairs of adjacent active tokens.
///
/// Conceptually dense over `[0, vocab_size) x [0, vocab_size)` but realized
/// as a hash map, so storage grows only with the pairs actually observed.
/// Counts are zeroed between passes with [`PairCounter::clear`].
#[derive(Debug, Clone, Default)]
pub struct PairCounter {
    counts: FxHashMap<Pair, u64>,
}

impl PairCounter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks the stream's active tokens and increments each adjacent ordered
    /// pair, skipping tombstones.
    ///
    /// A trailing active token with no successor contributes nothing.
    pub fn accumulate(&mut self, stream: &TokenStream) {
        let mut tokens = stream.active_tokens();
        let Some(mut prev) = tokens.next() else {
            return;
        };
        for current in tokens {
            *self.counts.entry((prev, current)).or_insert(0) += 1;
            prev = current;
        }
    }

    /// Occurrence count recorded for `pair` since the last clear.
    #[must_use]
    pub fn count(&self, pair: Pair) -> u64 {
        self.counts.get(&pair).copied().unwrap_or(0)
    }

    /// Number of distinct pairs observed since the last clear.
    #[must_use]
    pub fn distinct_pairs(&self) -> usize {
        self.counts.len()
    }

    /// Resets every count for the next pass.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Selects the most frequent pair, or `None` when the table is exhausted.
    ///
    /// Ties break toward the smallest `b1`, then the smallest `b2` -- the
    /// result of a deterministic ascending scan in which only a strictly
    /// greater count displaces the current best.  The outcome is independent
    /// of hash iteration order.
    #[must_use]
    pub fn best_pair(&self) -> Option<(Pair, u64)> {
        self.counts
            .iter()
            .map(|(&pair, &count)| (pair, count))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }
}
