//! Selects which slice of a candidate actually participates in matching.

use crate::error::Error;

/// Which part of a candidate line the matcher is allowed to see.
///
/// A candidate is frequently more than just a path: CtrlP-style callers often
/// pass `path\tdisplay info`, and a buffer list passes the whole line while
/// only wanting the path portion matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The entire candidate participates.
    FullLine,
    /// Only the basename (see [`crate::paths::basename`]) participates.
    FilenameOnly,
    /// Only the portion before the first tab participates.
    FirstNonTab,
    /// Only the portion before the last tab participates.
    UntilLastTab,
}

impl MatchMode {
    /// Parses a host-supplied mode name. `""` and `"full-line"` are
    /// equivalent.
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "" | "full-line" => Ok(MatchMode::FullLine),
            "filename-only" => Ok(MatchMode::FilenameOnly),
            "first-non-tab" => Ok(MatchMode::FirstNonTab),
            "until-last-tab" => Ok(MatchMode::UntilLastTab),
            other => Err(Error::Argument(format!("unrecognized match mode: {other:?}"))),
        }
    }
}

/// A borrowed slice of a candidate selected by a [`MatchMode`], together with
/// the byte offset at which it begins within the full candidate. Positions
/// reported by the matcher are relative to `text` and must be rebased by
/// `offset` to land back in the original candidate.
#[derive(Debug, Clone, Copy)]
pub struct Substring<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Computes the [`Substring`] of `candidate` that `mode` selects.
pub fn view(mode: MatchMode, candidate: &str) -> Substring<'_> {
    match mode {
        MatchMode::FullLine => Substring { text: candidate, offset: 0 },
        MatchMode::FilenameOnly => {
            let base = crate::paths::basename(candidate);
            let offset = candidate.len() - base.len();
            Substring { text: base, offset }
        }
        MatchMode::FirstNonTab => match candidate.find('\t') {
            Some(idx) => Substring { text: &candidate[..idx], offset: 0 },
            None => Substring { text: candidate, offset: 0 },
        },
        MatchMode::UntilLastTab => match candidate.rfind('\t') {
            Some(idx) => Substring { text: &candidate[..idx], offset: 0 },
            None => Substring { text: candidate, offset: 0 },
        },
    }
}
