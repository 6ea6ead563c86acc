//! The bounded top-K record type and the partial sort used to trim a merged
//! result set down to the requested limit.

use std::cmp::Ordering;

use crate::score::ScoreVector;

/// One successful match, carrying everything needed to rank it, break ties
/// deterministically, and recover its highlight positions in a second pass.
pub struct MatchRecord<H> {
    pub handle: H,
    pub bytes: Vec<u8>,
    pub score: ScoreVector,
}

impl<H> MatchRecord<H> {
    pub fn new(handle: H, bytes: Vec<u8>, score: ScoreVector) -> Self {
        Self { handle, bytes, score }
    }
}

/// Ordering is "better match compares greater", with the candidate's raw
/// bytes as a final, deterministic tiebreaker (lexicographically smaller
/// bytes rank as the better match, so output order doesn't depend on
/// candidate arrival order or thread scheduling).
impl<H> PartialEq for MatchRecord<H> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<H> Eq for MatchRecord<H> {}

impl<H> PartialOrd for MatchRecord<H> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<H> Ord for MatchRecord<H> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score).then_with(|| other.bytes.cmp(&self.bytes))
    }
}

/// Trims `matches` down to its `k` best records (by [`MatchRecord`]'s
/// ordering) and leaves the result sorted best-first. `k == 0` means no
/// limit: only the sort is performed.
///
/// Uses a partial sort (`select_nth_unstable_by`) to find the cut point in
/// expected-linear time, then a full sort only over the retained slice --
/// the merged candidate set from all workers can be large, but the caller
/// only ever wants the head of it.
pub fn truncate_to_top_k<H>(matches: &mut Vec<MatchRecord<H>>, k: usize) {
    if k > 0 && matches.len() > k {
        matches.select_nth_unstable_by(k - 1, |a, b| b.cmp(a));
        matches.truncate(k);
    }
    matches.sort_unstable_by(|a, b| b.cmp(a));
}
