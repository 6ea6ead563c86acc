//! Query construction and the core subsequence-matching algorithm.
//!
//! A [`Matcher`] is built once per search (it owns the parsed query) and then
//! called once per candidate. All of its allocation-heavy state lives in a
//! caller-supplied [`MatchScratch`] so a driver pulling thousands of
//! candidates through one worker thread can reuse the same buffers instead of
//! allocating per candidate.

use crate::error::Error;
use crate::paths;
use crate::score::ScoreVector;
use crate::strings::{self, Encoding};
use crate::substring::Substring;

/// Options that shape how a [`Matcher`] treats candidates, independent of
/// the query text itself.
#[derive(Debug, Clone)]
pub struct MatcherOpts {
    /// Whether candidates are filesystem paths. Turns on path-component
    /// scoring (`neg_part_index_from_end`, current-file distance) and the
    /// query-inversion / component-wise matching modes.
    pub is_path: bool,
    /// Whether a candidate identical to `cur_file` is still eligible. When
    /// `false`, such a candidate is rejected outright rather than scored.
    pub match_cur_file: bool,
    /// Decoding mode applied to both the query and every candidate.
    pub encoding: Encoding,
    /// The path of the file currently open in the host, used for proximity
    /// scoring and the `match_cur_file` exclusion. Bytes, compared exactly
    /// against each candidate before any decoding happens.
    pub cur_file: Option<Vec<u8>>,
}

impl Default for MatcherOpts {
    fn default() -> Self {
        Self {
            is_path: true,
            match_cur_file: true,
            encoding: Encoding::Unicode,
            cur_file: None,
        }
    }
}

/// The parsed, possibly-inverted query, built once per search.
#[derive(Debug, Clone)]
struct Query {
    /// The inverted, decoded query text (kept for diagnostics/tests).
    #[allow(dead_code)]
    raw: String,
    /// Original-case code points. Used for word-boundary scoring even when
    /// matching itself is case-insensitive.
    chars: Vec<char>,
    /// Case-folded code points, same length and alignment as `chars`.
    folded: Vec<char>,
    /// Smart case: matching is case-sensitive iff the query has any
    /// uppercase code point.
    case_sensitive: bool,
    is_path_query: bool,
    /// Per-component original-case code points, populated only when
    /// `is_path_query`.
    components: Vec<Vec<char>>,
    /// Per-component folded code points, aligned with `components`.
    components_folded: Vec<Vec<char>>,
}

/// Splits `raw` on `delimiter` and rejoins the pieces in reverse order. A
/// query with no delimiter configured, or that doesn't contain one, passes
/// through unchanged. This lets a host type a filename-first query
/// (`main.rs/src`) against path-first candidates, or vice versa.
fn invert_query(raw: &str, delimiter: Option<char>) -> String {
    let Some(delim) = delimiter else {
        return raw.to_string();
    };
    if !raw.contains(delim) {
        return raw.to_string();
    }
    let mut parts: Vec<&str> = raw.split(delim).collect();
    parts.reverse();
    let mut out = String::with_capacity(raw.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(delim);
        }
        out.push_str(part);
    }
    out
}

/// Parses a host-supplied inversion delimiter string, which must be empty
/// (no inversion) or exactly one code point.
pub fn parse_invert_delimiter(s: &str) -> Result<Option<char>, Error> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(Error::Config(format!(
            "query_inverting_delimiter must be at most one code point, got {s:?}"
        ))),
    }
}

impl Query {
    fn new(raw_query: &[u8], encoding: Encoding, invert_delimiter: Option<char>) -> Self {
        let mut decoded = String::new();
        strings::decode_into(raw_query, encoding, &mut decoded);
        let inverted = invert_query(&decoded, invert_delimiter);

        let chars: Vec<char> = inverted.chars().collect();
        let case_sensitive = chars.iter().any(|c| c.is_uppercase());
        let folded: Vec<char> = chars.iter().map(|&c| strings::case_fold(c, encoding)).collect();

        let is_path_query = inverted.contains(paths::SEPARATOR);
        let (components, components_folded) = if is_path_query {
            let comps: Vec<Vec<char>> =
                paths::components_of(&inverted).into_iter().map(|s| s.chars().collect()).collect();
            let comps_folded: Vec<Vec<char>> = comps
                .iter()
                .map(|v| v.iter().map(|&c| strings::case_fold(c, encoding)).collect())
                .collect();
            (comps, comps_folded)
        } else {
            (Vec::new(), Vec::new())
        };

        Query {
            raw: inverted,
            chars,
            folded,
            case_sensitive,
            is_path_query,
            components,
            components_folded,
        }
    }

    fn cmp_chars(&self) -> &[char] {
        if self.case_sensitive { &self.chars } else { &self.folded }
    }

    fn cmp_components(&self) -> &[Vec<char>] {
        if self.case_sensitive { &self.components } else { &self.components_folded }
    }
}

/// Reusable buffers for one [`Matcher::match_candidate`] call. Callers
/// processing many candidates (as the driver does) keep one `MatchScratch`
/// per worker and reuse it across the whole stream.
#[derive(Debug, Default)]
pub struct MatchScratch {
    text: String,
    chars: Vec<char>,
    folded: Vec<char>,
}

impl MatchScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The outcome of a successful match: its score, and optionally the byte
/// positions (within the original candidate) of every matched code point.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub score: ScoreVector,
    pub positions: Option<Vec<usize>>,
}

/// A compiled query plus the options that govern how it is applied to
/// candidates.
pub struct Matcher {
    query: Query,
    opts: MatcherOpts,
    cur_file_components: Vec<String>,
}

impl Matcher {
    pub fn new(raw_query: &[u8], opts: MatcherOpts, invert_delimiter: Option<char>) -> Result<Self, Error> {
        let query = Query::new(raw_query, opts.encoding, invert_delimiter);

        let cur_file_text = match &opts.cur_file {
            Some(bytes) => {
                let mut decoded = String::new();
                strings::decode_into(bytes, opts.encoding, &mut decoded);
                Some(decoded)
            }
            None => None,
        };
        let cur_file_components = match (&cur_file_text, opts.is_path) {
            (Some(p), true) => paths::components_of(p).into_iter().map(str::to_owned).collect(),
            _ => Vec::new(),
        };

        Ok(Matcher { query, opts, cur_file_components })
    }

    /// Matches one candidate, optionally recording match positions for
    /// highlight recovery. Returns `None` when the candidate does not match
    /// (including the `match_cur_file == false` exclusion).
    pub fn match_candidate(
        &self,
        full_candidate: &[u8],
        mmode: crate::substring::MatchMode,
        scratch: &mut MatchScratch,
        record_positions: bool,
    ) -> Option<MatchOutcome> {
        if !self.opts.match_cur_file {
            if let Some(cur) = &self.opts.cur_file {
                if cur.as_slice() == full_candidate {
                    return None;
                }
            }
        }

        strings::decode_into(full_candidate, self.opts.encoding, &mut scratch.text);
        scratch.chars.clear();
        scratch.chars.extend(scratch.text.chars());
        if !self.query.case_sensitive {
            scratch.folded.clear();
            scratch
                .folded
                .extend(scratch.chars.iter().map(|&c| strings::case_fold(c, self.opts.encoding)));
        }

        let view: Substring<'_> = crate::substring::view(mmode, &scratch.text);
        let char_start = if view.offset == 0 {
            0
        } else {
            scratch.text[..view.offset].chars().count()
        };
        let char_len = view.text.chars().count();
        let window_chars = &scratch.chars[char_start..char_start + char_len];
        let window_cmp: &[char] = if self.query.case_sensitive {
            window_chars
        } else {
            &scratch.folded[char_start..char_start + char_len]
        };

        let component_bounds = component_char_bounds(view.text);

        let needle_cmp = self.query.cmp_chars();
        let positions = if needle_cmp.is_empty() {
            Some(Vec::new())
        } else if self.query.is_path_query && self.opts.is_path {
            match_path_query(window_cmp, &component_bounds, self.query.cmp_components())
        } else if self.opts.is_path {
            match_flat_with_fallthrough(window_cmp, &component_bounds, needle_cmp)
        } else {
            subsequence_positions(window_cmp, needle_cmp)
        }?;

        if positions.is_empty() {
            return Some(MatchOutcome { score: ScoreVector::default(), positions: record_positions.then(Vec::new) });
        }

        let path_distance = if self.opts.is_path && !self.cur_file_components.is_empty() {
            let candidate_components = paths::components_of(&scratch.text);
            let cur_refs: Vec<&str> = self.cur_file_components.iter().map(String::as_str).collect();
            paths::distance(&candidate_components, &cur_refs)
        } else {
            0
        };

        let score = score_from_positions(window_chars, &positions, &component_bounds, self.opts.is_path, path_distance);

        let reported_positions = if record_positions {
            Some(positions.iter().map(|&p| rebase_to_bytes(view.text, p) + view.offset).collect())
        } else {
            None
        };

        Some(MatchOutcome { score, positions: reported_positions })
    }
}

/// Converts a char-index position within `text` to a byte offset within
/// `text`.
fn rebase_to_bytes(text: &str, char_pos: usize) -> usize {
    text.char_indices().nth(char_pos).map(|(b, _)| b).unwrap_or(text.len())
}

/// Cumulative char-count boundaries of `text`'s path components. Length is
/// `components_of(text).len() + 1`; `bounds[i]..bounds[i+1]` is component
/// `i`'s char range.
fn component_char_bounds(text: &str) -> Vec<usize> {
    let comps = paths::components_of(text);
    let mut bounds = Vec::with_capacity(comps.len() + 1);
    bounds.push(0);
    let mut acc = 0;
    for c in &comps {
        acc += c.chars().count();
        bounds.push(acc);
    }
    bounds
}

fn component_index_for(bounds: &[usize], pos: usize) -> usize {
    for i in 0..bounds.len().saturating_sub(1) {
        if pos < bounds[i + 1] {
            return i;
        }
    }
    bounds.len().saturating_sub(2)
}

/// A word start is index 0 of the matched window, the first code point
/// after a non-alphanumeric (this also covers "index 0 of a path
/// component", since a separator is itself non-alphanumeric), the first
/// letter after a digit, or an uppercase letter following a lowercase one
/// (camelCase).
fn is_word_start(prev: Option<char>, cur: char) -> bool {
    match prev {
        None => true,
        Some(p) => {
            if !p.is_alphanumeric() {
                return true;
            }
            if p.is_numeric() && cur.is_alphabetic() {
                return true;
            }
            if p.is_lowercase() && cur.is_uppercase() {
                return true;
            }
            false
        }
    }
}

/// Plain left-to-right subsequence scan: does `needle` occur as a
/// subsequence of `haystack`? Both slices are expected to already be in
/// whatever case (folded or not) the caller wants compared.
fn subsequence_positions(haystack: &[char], needle: &[char]) -> Option<Vec<usize>> {
    if needle.is_empty() {
        return Some(Vec::new());
    }
    let mut positions = Vec::with_capacity(needle.len());
    let mut ni = 0;
    for (hi, &hc) in haystack.iter().enumerate() {
        if hc == needle[ni] {
            positions.push(hi);
            ni += 1;
            if ni == needle.len() {
                return Some(positions);
            }
        }
    }
    None
}

/// Flat (non-path) query against a path candidate: tries the basename
/// alone first, then grows the search window one component to the left at
/// a time until the query is found as a subsequence or the whole candidate
/// is exhausted. Preferring the smallest (rightmost) window that matches
/// keeps basename hits cheapest and scored best via `neg_part_index_from_end`.
fn match_flat_with_fallthrough(
    haystack: &[char],
    component_bounds: &[usize],
    needle: &[char],
) -> Option<Vec<usize>> {
    let n_components = component_bounds.len().saturating_sub(1);
    if n_components == 0 {
        return None;
    }
    for start_component in (0..n_components).rev() {
        let window_start = component_bounds[start_component];
        if let Some(rel) = subsequence_positions(&haystack[window_start..], needle) {
            return Some(rel.into_iter().map(|p| p + window_start).collect());
        }
    }
    None
}

/// Path-structured query against a path candidate: query components are
/// consumed right to left, each one searched against candidate components
/// from the current cursor leftward. A query component that finds no home
/// before the cursor runs off the start of the candidate fails the whole
/// match — matching does not fall back to ignoring component boundaries.
fn match_path_query(
    haystack: &[char],
    component_bounds: &[usize],
    query_components: &[Vec<char>],
) -> Option<Vec<usize>> {
    let n_components = component_bounds.len().saturating_sub(1);
    if n_components == 0 || query_components.is_empty() {
        return None;
    }

    let mut cursor = n_components as isize - 1;
    let mut all_positions: Vec<usize> = Vec::new();

    for q_comp in query_components.iter().rev() {
        let mut probe = cursor;
        let mut found = None;
        while probe >= 0 {
            let ci = probe as usize;
            let comp_start = component_bounds[ci];
            let comp_end = component_bounds[ci + 1];
            if let Some(rel) = subsequence_positions(&haystack[comp_start..comp_end], q_comp) {
                found = Some((ci, rel.into_iter().map(|p| p + comp_start).collect::<Vec<_>>()));
                break;
            }
            probe -= 1;
        }
        let (ci, mut abs) = found?;
        all_positions.append(&mut abs);
        cursor = ci as isize - 1;
    }

    all_positions.sort_unstable();
    Some(all_positions)
}

/// Computes the full score vector from a successful match's positions.
/// `window_chars` must be the *original-case* decoded window (not folded)
/// so camelCase word-boundary detection sees true case.
fn score_from_positions(
    window_chars: &[char],
    positions: &[usize],
    component_bounds: &[usize],
    is_path: bool,
    path_distance: usize,
) -> ScoreVector {
    let first = positions[0];
    let last = *positions.last().expect("non-empty positions");
    let neg_unmatched_len = -(((last - first + 1) - positions.len()) as i64);

    let mut word_prefix_len = 0i64;
    for &pos in positions {
        let prev = if pos == 0 { None } else { Some(window_chars[pos - 1]) };
        if is_word_start(prev, window_chars[pos]) {
            word_prefix_len += 1;
        } else {
            break;
        }
    }

    let (neg_part_index_from_end, neg_prefix_score) = if is_path && component_bounds.len() > 1 {
        let last_component = component_index_for(component_bounds, last);
        let n = component_bounds.len() - 1;
        let part_index_from_end = (n - 1 - last_component) as i64;

        let first_component = component_index_for(component_bounds, first);
        let local_offset = first - component_bounds[first_component];
        (-part_index_from_end, -(local_offset as i64))
    } else {
        (0, -(first as i64))
    };

    ScoreVector {
        word_prefix_len,
        neg_unmatched_len,
        neg_part_index_from_end,
        neg_path_distance: -(path_distance as i64),
        neg_prefix_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substring::MatchMode;

    fn matcher(query: &str, is_path: bool) -> Matcher {
        Matcher::new(
            query.as_bytes(),
            MatcherOpts { is_path, match_cur_file: true, encoding: Encoding::Unicode, cur_file: None },
            Some('/'),
        )
        .unwrap()
    }

    #[test]
    fn empty_query_matches_everything() {
        let m = matcher("", true);
        let mut scratch = MatchScratch::new();
        let out = m.match_candidate(b"anything.rs", MatchMode::FullLine, &mut scratch, false);
        assert!(out.is_some());
    }

    #[test]
    fn flat_query_matches_basename_over_unrelated_siblings() {
        let m = matcher("bar", true);
        let mut scratch = MatchScratch::new();
        let hit = m.match_candidate(b"foo/bar.txt", MatchMode::FullLine, &mut scratch, false);
        assert!(hit.is_some());
        let miss = m.match_candidate(b"foo/baz.txt", MatchMode::FullLine, &mut scratch, false);
        assert!(miss.is_none());
    }

    #[test]
    fn path_query_prefers_aligned_components() {
        let m = matcher("foo/bar", true);
        let mut scratch = MatchScratch::new();
        let aligned = m.match_candidate(b"src/foo/bar.cc", MatchMode::FullLine, &mut scratch, false);
        assert!(aligned.is_some());
        let misaligned = m.match_candidate(b"src/bar/foo.cc", MatchMode::FullLine, &mut scratch, false);
        assert!(misaligned.is_none());
    }

    #[test]
    fn smart_case_any_uppercase_forces_case_sensitive() {
        let m = matcher("Bar", true);
        let mut scratch = MatchScratch::new();
        assert!(m.match_candidate(b"foo/Bar.txt", MatchMode::FullLine, &mut scratch, false).is_some());
        assert!(m.match_candidate(b"foo/bar.txt", MatchMode::FullLine, &mut scratch, false).is_none());
    }

    #[test]
    fn lowercase_query_is_case_insensitive() {
        let m = matcher("bar", true);
        let mut scratch = MatchScratch::new();
        assert!(m.match_candidate(b"foo/BAR.txt", MatchMode::FullLine, &mut scratch, false).is_some());
    }

    #[test]
    fn match_cur_file_false_excludes_exact_candidate() {
        let matcher = Matcher::new(
            b"foo",
            MatcherOpts {
                is_path: true,
                match_cur_file: false,
                encoding: Encoding::Unicode,
                cur_file: Some(b"foo/bar.rs".to_vec()),
            },
            None,
        )
        .unwrap();
        let mut scratch = MatchScratch::new();
        assert!(matcher.match_candidate(b"foo/bar.rs", MatchMode::FullLine, &mut scratch, false).is_none());
        assert!(matcher.match_candidate(b"foo/baz.rs", MatchMode::FullLine, &mut scratch, false).is_some());
    }

    #[test]
    fn positions_are_byte_offsets_in_the_full_candidate() {
        let m = matcher("bar", true);
        let mut scratch = MatchScratch::new();
        let out = m
            .match_candidate(b"foo/bar.txt", MatchMode::FullLine, &mut scratch, true)
            .unwrap();
        assert_eq!(out.positions.unwrap(), vec![4, 5, 6]);
    }

    #[test]
    fn filename_only_mode_rebases_positions_past_the_directory() {
        let m = matcher("bar", true);
        let mut scratch = MatchScratch::new();
        let out = m
            .match_candidate(b"foo/bar.txt", MatchMode::FilenameOnly, &mut scratch, true)
            .unwrap();
        assert_eq!(out.positions.unwrap(), vec![4, 5, 6]);
    }

    #[test]
    fn word_prefix_len_rewards_hits_on_word_boundaries() {
        let m = matcher("fb", true);
        let mut scratch = MatchScratch::new();
        let camel = m.match_candidate(b"fooBar.rs", MatchMode::FullLine, &mut scratch, false).unwrap();
        assert_eq!(camel.score.word_prefix_len, 2);
    }

    #[test]
    fn invalid_utf8_degrades_instead_of_failing() {
        let m = matcher("bar", true);
        let mut scratch = MatchScratch::new();
        let mut candidate = b"foo/bar".to_vec();
        candidate.push(0xff);
        let out = m.match_candidate(&candidate, MatchMode::FullLine, &mut scratch, false);
        assert!(out.is_some());
    }
}
