//! Character set registry used by the text copy engines.
//!
//! The server tags every text column with a character set number. Each supported set implements
//! [`Encoding`], a pair of single character transcoding capabilities. Conversion always goes
//! through a normalized `char`, one character at a time, so a multi byte character can never be
//! split between two transfer calls.

/// Longest encoding of a single character over all supported sets (utf8mb4).
pub const MAX_ENCODED_LEN: usize = 4;

/// Result of decoding one character from a byte stream.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Decoded {
    /// A character has been decoded, consuming the given number of source bytes.
    Char { ch: char, consumed: usize },
    /// The source bytes do not form a valid character. The engines substitute a placeholder and
    /// skip `consumed` bytes.
    Illegal { consumed: usize },
    /// The source ends in the middle of a multi byte character. Values coming off the wire are
    /// complete, so this indicates corrupt data and is not recoverable.
    Incomplete,
}

/// Result of encoding one character into a byte buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Encoded {
    /// The character has been written, occupying the given number of bytes.
    Ok(usize),
    /// The remaining buffer is too small to hold the encoded character.
    TooSmall {
        /// Bytes the encoded character would occupy.
        needed: usize,
    },
    /// The target character set cannot represent this character.
    Unrepresentable,
}

/// Single character transcoding capability of one character set. Implementations are stateless;
/// [`from_number`] hands out a static reference resolved once at bind time.
pub trait Encoding: Sync {
    /// Character set number used by the server protocol.
    fn number(&self) -> u16;
    /// Canonical name of the character set.
    fn name(&self) -> &'static str;
    /// Maximum number of bytes a single encoded character occupies.
    fn max_encoded_len(&self) -> usize;
    /// Decode the first character of `src`.
    fn decode_char(&self, src: &[u8]) -> Decoded;
    /// Encode `ch` into the start of `dst`.
    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded;
}

/// Look up a character set by its protocol number. `None` for character sets this driver does
/// not support; the statement layer turns that into a hard error.
pub fn from_number(number: u16) -> Option<&'static dyn Encoding> {
    match number {
        8 => Some(&Latin1),
        11 => Some(&Ascii),
        33 => Some(&Utf8),
        35 => Some(&Ucs2),
        45 => Some(&Utf8Mb4),
        63 => Some(&Binary),
        _ => None,
    }
}

/// ISO 8859-1. Every byte is the code point with the same value.
pub struct Latin1;

impl Encoding for Latin1 {
    fn number(&self) -> u16 {
        8
    }

    fn name(&self) -> &'static str {
        "latin1"
    }

    fn max_encoded_len(&self) -> usize {
        1
    }

    fn decode_char(&self, src: &[u8]) -> Decoded {
        match src.first() {
            None => Decoded::Incomplete,
            Some(&byte) => Decoded::Char {
                ch: char::from(byte),
                consumed: 1,
            },
        }
    }

    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded {
        let code = u32::from(ch);
        if code > 0xFF {
            return Encoded::Unrepresentable;
        }
        if dst.is_empty() {
            return Encoded::TooSmall { needed: 1 };
        }
        dst[0] = code as u8;
        Encoded::Ok(1)
    }
}

/// US-ASCII. Bytes above 0x7F are illegal sequences.
pub struct Ascii;

impl Encoding for Ascii {
    fn number(&self) -> u16 {
        11
    }

    fn name(&self) -> &'static str {
        "ascii"
    }

    fn max_encoded_len(&self) -> usize {
        1
    }

    fn decode_char(&self, src: &[u8]) -> Decoded {
        match src.first() {
            None => Decoded::Incomplete,
            Some(&byte) if byte <= 0x7F => Decoded::Char {
                ch: char::from(byte),
                consumed: 1,
            },
            Some(_) => Decoded::Illegal { consumed: 1 },
        }
    }

    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded {
        if u32::from(ch) > 0x7F {
            return Encoded::Unrepresentable;
        }
        if dst.is_empty() {
            return Encoded::TooSmall { needed: 1 };
        }
        dst[0] = ch as u8;
        Encoded::Ok(1)
    }
}

/// The server side three byte UTF-8 variant. Characters outside the basic multilingual plane
/// are not representable.
pub struct Utf8;

impl Encoding for Utf8 {
    fn number(&self) -> u16 {
        33
    }

    fn name(&self) -> &'static str {
        "utf8"
    }

    fn max_encoded_len(&self) -> usize {
        3
    }

    fn decode_char(&self, src: &[u8]) -> Decoded {
        // Four byte lead bytes are outside this variant.
        if matches!(src.first(), Some(0xF0..=0xFF)) {
            return Decoded::Illegal { consumed: 1 };
        }
        decode_utf8(src)
    }

    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded {
        if ch.len_utf8() > 3 {
            return Encoded::Unrepresentable;
        }
        encode_utf8(ch, dst)
    }
}

/// Full four byte UTF-8.
pub struct Utf8Mb4;

impl Encoding for Utf8Mb4 {
    fn number(&self) -> u16 {
        45
    }

    fn name(&self) -> &'static str {
        "utf8mb4"
    }

    fn max_encoded_len(&self) -> usize {
        4
    }

    fn decode_char(&self, src: &[u8]) -> Decoded {
        decode_utf8(src)
    }

    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded {
        encode_utf8(ch, dst)
    }
}

/// UCS-2, big endian. Two bytes per character, no surrogate pairs.
pub struct Ucs2;

impl Encoding for Ucs2 {
    fn number(&self) -> u16 {
        35
    }

    fn name(&self) -> &'static str {
        "ucs2"
    }

    fn max_encoded_len(&self) -> usize {
        2
    }

    fn decode_char(&self, src: &[u8]) -> Decoded {
        match src {
            [] => Decoded::Incomplete,
            [_] => Decoded::Incomplete,
            [high, low, ..] => {
                let unit = u16::from_be_bytes([*high, *low]);
                match char::from_u32(u32::from(unit)) {
                    Some(ch) => Decoded::Char { ch, consumed: 2 },
                    // Unpaired surrogate code unit.
                    None => Decoded::Illegal { consumed: 2 },
                }
            }
        }
    }

    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded {
        let code = u32::from(ch);
        if code > 0xFFFF {
            return Encoded::Unrepresentable;
        }
        if dst.len() < 2 {
            return Encoded::TooSmall { needed: 2 };
        }
        dst[..2].copy_from_slice(&(code as u16).to_be_bytes());
        Encoded::Ok(2)
    }
}

/// The sentinel "character set" of raw binary columns. Bytes pass through unchanged, like
/// latin1 without any illegal sequences.
pub struct Binary;

impl Encoding for Binary {
    fn number(&self) -> u16 {
        63
    }

    fn name(&self) -> &'static str {
        "binary"
    }

    fn max_encoded_len(&self) -> usize {
        1
    }

    fn decode_char(&self, src: &[u8]) -> Decoded {
        Latin1.decode_char(src)
    }

    fn encode_char(&self, ch: char, dst: &mut [u8]) -> Encoded {
        Latin1.encode_char(ch, dst)
    }
}

fn decode_utf8(src: &[u8]) -> Decoded {
    let Some(&lead) = src.first() else {
        return Decoded::Incomplete;
    };
    let len = match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Decoded::Illegal { consumed: 1 },
    };
    if src.len() < len {
        return Decoded::Incomplete;
    }
    match std::str::from_utf8(&src[..len]) {
        Ok(text) => Decoded::Char {
            // The slice is exactly one character long by construction.
            ch: text.chars().next().unwrap(),
            consumed: len,
        },
        Err(_) => Decoded::Illegal { consumed: 1 },
    }
}

fn encode_utf8(ch: char, dst: &mut [u8]) -> Encoded {
    let needed = ch.len_utf8();
    if dst.len() < needed {
        return Encoded::TooSmall { needed };
    }
    ch.encode_utf8(dst);
    Encoded::Ok(needed)
}
