//! The per-match score vector and its total order.
//!
//! Fields are declared in priority order on purpose: the derived [`Ord`]
//! compares struct fields top to bottom, which is exactly the lexicographic
//! priority the matcher needs. Every field is oriented so that a *larger*
//! value is always a *better* match, including the ones that are naturally
//! "smaller is better" (those are pre-negated at construction time) — this
//! keeps the comparison uniform instead of mixing ascending and descending
//! fields.

/// The five-component score attached to every successful match, compared in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ScoreVector {
    /// How many leading matched query code points landed on word-start
    /// boundaries in the candidate. Higher is better.
    pub word_prefix_len: i64,
    /// Negated count of candidate code points between the first and last
    /// matched position that were not themselves matched. Less unmatched
    /// filler is better, hence the negation.
    pub neg_unmatched_len: i64,
    /// Negated index, counted from the right, of the path component
    /// containing the last matched code point. The basename (index zero)
    /// negates to zero and so outranks a hit in any parent directory, whose
    /// negation grows more negative the further from the basename it sits.
    pub neg_part_index_from_end: i64,
    /// Negated component distance to the current file. Closer is better.
    pub neg_path_distance: i64,
    /// Negated position of the first matched code point within its
    /// component. Earlier is better.
    pub neg_prefix_score: i64,
}
