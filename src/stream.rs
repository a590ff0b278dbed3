//! Per-file token streams and merge-rule application.

use crate::vocab::{MergeRule, TokenId};

/// Mutable sequence of token ids covering one input file, one slot per
/// original byte.
///
/// A slot is either an active token or `None` once its content has been
/// consumed into a merge (a tombstone).  Slots are tombstoned in place; the
/// stream never reallocates during a pass and is rebuilt from raw bytes at
/// the start of the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    slots: Vec<Option<TokenId>>,
}

impl TokenStream {
    /// Widens raw file bytes into token ids.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            slots: bytes.iter().map(|&b| Some(TokenId::from(b))).collect(),
        }
    }

    /// Number of slots, tombstoned or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when the stream has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates the stream's active token ids in order, skipping tombstones.
    pub fn active_tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Applies every committed rule to the stream, in commit order.
    ///
    /// One left-to-right sweep per rule.  A match rewrites the first active
    /// slot to the rule's replacement id and tombstones the second; the sweep
    /// resumes strictly after the tombstoned slot, so a token produced by the
    /// sweep is only reconsidered by later rules or a later pass.  Reaching
    /// the end of the stream while searching for either active position ends
    /// the sweep.
    pub fn apply(&mut self, rules: &[MergeRule]) {
        for rule in rules {
            self.apply_rule(rule);
        }
    }

    // The scan index strictly increases on every branch: i -> j + 1 on a
    // match, i -> j otherwise, with j > i always.
    fn apply_rule(&mut self, rule: &MergeRule) {
        let Some(mut i) = self.next_active(0) else {
            return;
        };
        loop {
            let Some(j) = self.next_active(i + 1) else {
                return;
            };
            if self.slots[i] == Some(rule.b1) && self.slots[j] == Some(rule.b2) {
                self.slots[i] = Some(rule.rep);
                self.slots[j] = None;
                let Some(next) = self.next_active(j + 1) else {
                    return;
                };
                i = next;
            } else {
                i = j;
            }
        }
    }

    /// Index of the first active slot at or after `from`.
    fn next_active(&self, from: usize) -> Option<usize> {
        self.slots
            .get(from..)?
            .iter()
            .position(Option::is_some)
            .map(|offset| from + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(b1: TokenId, b2: TokenId, rep: TokenId) -> MergeRule {
        MergeRule { b1, b2, rep }
    }

    fn active(stream: &TokenStream) -> Vec<TokenId> {
        stream.active_tokens().collect()
    }

    #[test]
    fn from_bytes_widens_every_byte() {
        let stream = TokenStream::from_bytes(&[0, 127, 255]);
        assert_eq!(stream.len(), 3);
        assert_eq!(active(&stream), vec![0, 127, 255]);
    }

    #[test]
    fn apply_merges_adjacent_non_overlapping_pairs() {
        let mut stream = TokenStream::from_bytes(&[97, 97, 97, 97]);
        stream.apply(&[rule(97, 97, 256)]);
        assert_eq!(active(&stream), vec![256, 256]);
        // Slot count is unchanged; merged positions are tombstones.
        assert_eq!(stream.len(), 4);
    }

    #[test]
    fn produced_token_is_not_rematched_within_a_sweep() {
        // (97, 97) -> 256 over three bytes: one merge, the trailing byte
        // survives, and the fresh 256 is not paired again this sweep.
        let mut stream = TokenStream::from_bytes(&[97, 97, 97]);
        stream.apply(&[rule(97, 97, 256)]);
        assert_eq!(active(&stream), vec![256, 97]);
    }

    #[test]
    fn rules_apply_in_commit_order_within_one_pass() {
        let mut stream = TokenStream::from_bytes(&[97, 98, 97, 98]);
        stream.apply(&[rule(97, 98, 256), rule(256, 256, 257)]);
        assert_eq!(active(&stream), vec![257]);
    }

    #[test]
    fn pair_matching_skips_tombstoned_slots() {
        let mut stream = TokenStream::from_bytes(&[97, 98, 99]);
        // First rule tombstones the middle slot's partner; the second rule
        // must pair across the tombstone.
        stream.apply(&[rule(98, 99, 256)]);
        assert_eq!(active(&stream), vec![97, 256]);
        stream.apply(&[rule(97, 256, 257)]);
        assert_eq!(active(&stream), vec![257]);
    }

    #[test]
    fn non_matching_scan_advances_to_the_second_position() {
        // (98, 97) occurs at positions 1-2 only if the scan moves its window
        // one active token at a time after a non-match.
        let mut stream = TokenStream::from_bytes(&[97, 98, 97]);
        stream.apply(&[rule(98, 97, 256)]);
        assert_eq!(active(&stream), vec![97, 256]);
    }

    #[test]
    fn apply_on_empty_or_single_slot_stream_is_a_no_op() {
        let mut empty = TokenStream::from_bytes(&[]);
        empty.apply(&[rule(97, 97, 256)]);
        assert!(empty.is_empty());

        let mut single = TokenStream::from_bytes(&[97]);
        single.apply(&[rule(97, 97, 256)]);
        assert_eq!(active(&single), vec![97]);
    }
}
