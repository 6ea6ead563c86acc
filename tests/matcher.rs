//! Integration tests exercising `Matcher` directly, covering the scoring
//! and path-decomposition scenarios a host would rely on.

use ctrlp_match::{Encoding, MatchMode, MatchScratch, Matcher, MatcherOpts};

fn matcher(query: &str) -> Matcher {
    Matcher::new(
        query.as_bytes(),
        MatcherOpts { is_path: true, match_cur_file: true, encoding: Encoding::Unicode, cur_file: None },
        Some('/'),
    )
    .unwrap()
}

fn matches(m: &Matcher, candidate: &str) -> bool {
    let mut scratch = MatchScratch::new();
    m.match_candidate(candidate.as_bytes(), MatchMode::FullLine, &mut scratch, false).is_some()
}

#[test]
fn basename_hit_beats_unrelated_sibling() {
    let m = matcher("bar");
    assert!(matches(&m, "foo/bar.txt"));
    assert!(!matches(&m, "foo/baz.txt"));
    assert!(matches(&m, "qux/bar.txt"));
}

#[test]
fn path_structured_query_requires_component_alignment() {
    let m = matcher("foo/bar");
    assert!(matches(&m, "src/foo/bar.cc"));
    assert!(!matches(&m, "src/bar/foo.cc"));
}

#[test]
fn empty_query_matches_every_candidate() {
    let m = matcher("");
    assert!(matches(&m, "anything/at/all.rs"));
    assert!(matches(&m, ""));
}

#[test]
fn subsequence_not_present_fails() {
    let m = matcher("xyz");
    assert!(!matches(&m, "abcdef"));
}

#[test]
fn word_start_matches_rank_above_mid_word_matches() {
    let m = matcher("fb");
    let mut scratch = MatchScratch::new();
    let camel = m.match_candidate(b"fooBar.rs", MatchMode::FullLine, &mut scratch, false).unwrap();
    let mid = m.match_candidate(b"xfxboo.rs", MatchMode::FullLine, &mut scratch, false).unwrap();
    assert!(camel.score > mid.score);
}

#[test]
fn basename_hit_outranks_directory_hit_with_identical_earlier_fields() {
    let m = matcher("foo");
    let mut scratch = MatchScratch::new();
    let basename = m.match_candidate(b"p/q/foo.txt", MatchMode::FullLine, &mut scratch, false).unwrap();
    let directory = m.match_candidate(b"x/foo/y.txt", MatchMode::FullLine, &mut scratch, false).unwrap();
    assert_eq!(basename.score.word_prefix_len, directory.score.word_prefix_len);
    assert_eq!(basename.score.neg_unmatched_len, directory.score.neg_unmatched_len);
    assert!(basename.score > directory.score);
}

#[test]
fn current_file_proximity_prefers_sibling_directories() {
    let matcher = Matcher::new(
        b"bar",
        MatcherOpts {
            is_path: true,
            match_cur_file: true,
            encoding: Encoding::Unicode,
            cur_file: Some(b"src/foo/main.rs".to_vec()),
        },
        None,
    )
    .unwrap();
    let mut scratch = MatchScratch::new();
    let sibling = matcher.match_candidate(b"src/foo/bar.rs", MatchMode::FullLine, &mut scratch, false).unwrap();
    let distant = matcher.match_candidate(b"other/deep/nested/bar.rs", MatchMode::FullLine, &mut scratch, false).unwrap();
    assert!(sibling.score > distant.score);
}

#[test]
fn match_cur_file_false_rejects_the_open_file_outright() {
    let matcher = Matcher::new(
        b"main",
        MatcherOpts {
            is_path: true,
            match_cur_file: false,
            encoding: Encoding::Unicode,
            cur_file: Some(b"src/main.rs".to_vec()),
        },
        None,
    )
    .unwrap();
    let mut scratch = MatchScratch::new();
    assert!(matcher.match_candidate(b"src/main.rs", MatchMode::FullLine, &mut scratch, false).is_none());
}

#[test]
fn smart_case_query_with_uppercase_is_case_sensitive() {
    let m = matcher("Bar");
    assert!(matches(&m, "foo/Bar.rs"));
    assert!(!matches(&m, "foo/bar.rs"));
}

#[test]
fn positions_are_strictly_increasing_byte_offsets() {
    let m = matcher("fbr");
    let mut scratch = MatchScratch::new();
    let outcome = m.match_candidate(b"foo/bar.rs", MatchMode::FullLine, &mut scratch, true).unwrap();
    let positions = outcome.positions.unwrap();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn query_inverting_delimiter_flips_filename_first_typing() {
    // Typed filename-first ("main.rs/src"), candidate is path-first.
    let m = matcher("main.rs/src");
    assert!(matches(&m, "src/main.rs"));
}
