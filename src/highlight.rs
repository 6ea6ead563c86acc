//! Turns matched byte positions into regex source strings a host can hand
//! to its own highlighting engine. This crate never compiles a regex
//! itself — it only emits the pattern text.

use crate::error::Error;
use crate::strings::Encoding;

/// How much highlight detail to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// No highlight regexes are produced.
    None,
    /// One regex per matched code point.
    Basic,
    /// One regex per maximal run of consecutive matched code points,
    /// combined as an alternation.
    Detailed,
}

impl HighlightMode {
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "" | "none" => Ok(HighlightMode::None),
            "basic" => Ok(HighlightMode::Basic),
            "detailed" => Ok(HighlightMode::Detailed),
            other => Err(Error::Argument(format!("unrecognized highlight mode: {other:?}"))),
        }
    }
}

const REGEX_METACHARS: &[char] = &['\\', '.', '^', '$', '|', '(', ')', '[', ']', '{', '}', '*', '+', '?'];

fn push_escaped(out: &mut String, c: char) {
    if REGEX_METACHARS.contains(&c) {
        out.push('\\');
    }
    out.push(c);
}

/// Decodes the single code point starting at `pos` in `candidate`, the same
/// way [`crate::strings::decode_into`] would, and returns it together with
/// how many bytes it occupies. Kept in lockstep with that function so a
/// position computed by the matcher always lands on the code point the
/// matcher actually saw there, regardless of encoding mode or invalid UTF-8.
fn code_point_at(candidate: &[u8], encoding: Encoding, pos: usize) -> (char, usize) {
    match encoding {
        Encoding::Ascii => (candidate[pos] as char, 1),
        Encoding::Unicode => match std::str::from_utf8(&candidate[pos..]) {
            Ok(s) => {
                let c = s.chars().next().expect("non-empty slice");
                (c, c.len_utf8())
            }
            Err(err) if err.valid_up_to() > 0 => {
                let valid = std::str::from_utf8(&candidate[pos..pos + err.valid_up_to()])
                    .expect("valid_up_to bytes are valid utf-8");
                let c = valid.chars().next().expect("non-empty valid prefix");
                (c, c.len_utf8())
            }
            Err(_) => (candidate[pos] as char, 1),
        },
    }
}

/// Emits regex source strings covering `positions` (byte offsets into
/// `candidate`, as reported by the matcher for the same `encoding`) per
/// `mode`, appending them to `out`. `positions` must be sorted ascending.
pub fn emit_regexes(mode: HighlightMode, candidate: &[u8], encoding: Encoding, positions: &[usize], out: &mut Vec<String>) {
    if positions.is_empty() {
        return;
    }
    match mode {
        HighlightMode::None => {}
        HighlightMode::Basic => {
            for &pos in positions {
                let (c, _) = code_point_at(candidate, encoding, pos);
                let mut s = String::new();
                push_escaped(&mut s, c);
                out.push(s);
            }
        }
        HighlightMode::Detailed => {
            // Group consecutive matched positions (by byte adjacency) into
            // runs, then alternate the escaped runs into one pattern.
            let mut runs: Vec<String> = Vec::new();
            let mut current = String::new();
            let mut next_expected = positions[0];

            for &pos in positions {
                let (c, len) = code_point_at(candidate, encoding, pos);
                if pos != next_expected && !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
                push_escaped(&mut current, c);
                next_expected = pos + len;
            }
            if !current.is_empty() {
                runs.push(current);
            }

            out.push(format!("(?:{})", runs.join("|")));
        }
    }
}
