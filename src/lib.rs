#![warn(missing_docs)]

//! A parallel, path-aware fuzzy matcher for interactive fuzzy-finder UIs.
//!
//! `ctrlp-match` scores a query against a stream of candidate strings,
//! ranking filesystem paths the way an editor's file-jump palette should:
//! basename hits beat directory hits, word-start and camelCase boundaries
//! are rewarded, and a known current file can pull nearby paths up the
//! list. Candidates are pulled from a host-supplied [`CandidateSource`]
//! across a small pool of worker threads, each keeping a bounded top-K heap
//! so memory stays flat regardless of how many candidates stream through.
//!
//! The entry point is [`ctrlp_match`]; everything else is exposed for hosts
//! that want to drive the matcher directly against a single candidate
//! (an editor plugin doing incremental re-scoring, for instance) without
//! going through the threaded driver.

/// Byte decoding and case folding.
pub mod strings;

/// Path decomposition and component-wise distance.
pub mod paths;

/// Selecting which slice of a candidate participates in matching.
pub mod substring;

/// The per-match score vector and its total order.
pub mod score;

/// Query construction and the core subsequence-matching algorithm.
pub mod matcher;

/// Turning matched positions into host-facing highlight regex sources.
pub mod highlight;

/// The bounded top-K record type and partial-sort trimming.
pub mod topk;

/// The parallel batched-matching driver.
pub mod driver;

/// The crate's uniform error type.
pub mod error;

pub use driver::{ctrlp_match, CandidateSource, Match, MatchRequest, MatchResponse};
pub use error::Error;
pub use highlight::HighlightMode;
pub use matcher::{parse_invert_delimiter, MatchOutcome, MatchScratch, Matcher, MatcherOpts};
pub use score::ScoreVector;
pub use strings::Encoding;
pub use substring::MatchMode;
