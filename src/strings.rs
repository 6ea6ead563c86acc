//! Byte decoding and case folding, the one place candidate and query bytes
//! are turned into code points.
//!
//! Two encodings are supported. ASCII mode treats each input byte as its own
//! code point regardless of content — it never looks at neighboring bytes, so
//! it can't misinterpret arbitrary binary-ish input as multi-byte UTF-8.
//! Unicode mode decodes proper UTF-8 and degrades gracefully on invalid
//! sequences: the valid prefix is kept, the offending byte is re-emitted as
//! its own raw-value code point, and decoding resumes after it. Either way
//! decoding never fails and never panics.

/// Selects how candidate and query bytes are turned into code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Every byte is its own code point. Fast path, no validation.
    Ascii,
    /// Proper UTF-8 decoding with graceful degradation on invalid bytes.
    Unicode,
}

/// Decodes `bytes` into `out`, appending decoded code points as a `String`.
///
/// `out` is cleared first so it can be reused as a scratch buffer across
/// calls.
pub fn decode_into(bytes: &[u8], encoding: Encoding, out: &mut String) {
    out.clear();
    match encoding {
        Encoding::Ascii => {
            out.reserve(bytes.len());
            for &b in bytes {
                out.push(b as char);
            }
        }
        Encoding::Unicode => decode_unicode_lossy(bytes, out),
    }
}

fn decode_unicode_lossy(bytes: &[u8], out: &mut String) {
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                // SAFETY-free: valid_up_to is guaranteed to land on a char boundary.
                out.push_str(std::str::from_utf8(&rest[..valid_up_to]).unwrap_or(""));
                let bad_byte = rest[valid_up_to];
                out.push(bad_byte as char);
                let skip = valid_up_to + 1;
                if skip >= rest.len() {
                    return;
                }
                rest = &rest[skip..];
            }
        }
    }
}

/// Case-folds a single code point for the given encoding.
///
/// ASCII mode lowercases only `'A'..='Z'`. Unicode mode applies the simple
/// (one-to-one) lowercase mapping; code points that expand to multiple
/// characters under full Unicode case folding keep only their first result,
/// which is sufficient for comparison purposes here.
pub fn case_fold(c: char, encoding: Encoding) -> char {
    match encoding {
        Encoding::Ascii => c.to_ascii_lowercase(),
        Encoding::Unicode => c.to_lowercase().next().unwrap_or(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_decode_keeps_every_byte_as_its_own_char() {
        let mut out = String::new();
        decode_into(b"\xffoo", Encoding::Ascii, &mut out);
        assert_eq!(out.chars().count(), 3);
        assert_eq!(out.chars().next().unwrap() as u32, 0xff);
    }

    #[test]
    fn unicode_decode_handles_valid_utf8() {
        let mut out = String::new();
        decode_into("héllo".as_bytes(), Encoding::Unicode, &mut out);
        assert_eq!(out, "héllo");
    }

    #[test]
    fn unicode_decode_degrades_gracefully_on_invalid_bytes() {
        let mut out = String::new();
        let bytes = [b'a', 0xff, b'b'];
        decode_into(&bytes, Encoding::Unicode, &mut out);
        let chars: Vec<char> = out.chars().collect();
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[0], 'a');
        assert_eq!(chars[1] as u32, 0xff);
        assert_eq!(chars[2], 'b');
    }

    #[test]
    fn case_fold_ascii_only_touches_ascii_letters() {
        assert_eq!(case_fold('A', Encoding::Ascii), 'a');
        assert_eq!(case_fold('9', Encoding::Ascii), '9');
    }

    #[test]
    fn case_fold_unicode_lowercases_non_ascii() {
        assert_eq!(case_fold('É', Encoding::Unicode), 'é');
    }
}
