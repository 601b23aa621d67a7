//! Escaping of literals used inside `LIKE` patterns, e.g. when a table name entered by the
//! application becomes part of a catalog query.

use crate::charset::{Decoded, Encoding};

/// Escape a string for use in a `LIKE` pattern. On top of the usual string literal escapes the
/// wildcard characters `%` and `_` are escaped as well, so the value matches literally.
///
/// Valid multi byte characters pass through untouched. A byte which merely looks like the start
/// of a multi byte character is escaped on its own: left alone, an invalid sequence followed by
/// a quote or backslash could combine into a valid character and smuggle the syntax character
/// past the server's parser.
pub fn escape_wildcard(encoding: &dyn Encoding, from: &[u8]) -> Vec<u8> {
    let multi_byte = encoding.max_encoded_len() > 1;
    let mut to = Vec::with_capacity(from.len() * 2);
    let mut pos = 0;
    while pos < from.len() {
        let byte = from[pos];
        if multi_byte {
            if let Decoded::Char { consumed, .. } = encoding.decode_char(&from[pos..]) {
                if consumed > 1 {
                    to.extend_from_slice(&from[pos..pos + consumed]);
                    pos += consumed;
                    continue;
                }
            }
            if matches!(
                encoding.decode_char(&from[pos..pos + 1]),
                Decoded::Incomplete
            ) {
                // Apparent lead byte of a multi byte character which did not decode as one.
                to.push(b'\\');
                to.push(byte);
                pos += 1;
                continue;
            }
        }
        let escape = match byte {
            0 => Some(b'0'),
            b'\n' => Some(b'n'),
            b'\r' => Some(b'r'),
            b'\\' => Some(b'\\'),
            b'\'' => Some(b'\''),
            b'"' => Some(b'"'),
            b'_' => Some(b'_'),
            b'%' => Some(b'%'),
            0x1A => Some(b'Z'),
            _ => None,
        };
        match escape {
            Some(escaped) => {
                to.push(b'\\');
                to.push(escaped);
            }
            None => to.push(byte),
        }
        pos += 1;
    }
    to
}
