//! Incremental copy engines moving one column value into application buffers.
//!
//! A value may be retrieved across several calls, each receiving a possibly differently sized
//! destination buffer. [`TransferState`] carries the position between calls. Four engines cover
//! the bound representations: raw bytes, narrow text, wide (UTF-16) text and the hexadecimal
//! rendition of binary data into a character buffer.
//!
//! The character engines convert one character at a time and never leave a partially written
//! character in the destination. If an encoded character does not fit into the remaining space,
//! the part which fits is written and the rest is carried over to the next call.

use crate::{
    charset::{Decoded, Encoded, Encoding, MAX_ENCODED_LEN},
    error::Error,
};

/// Character substituted for source sequences the result character set cannot represent and for
/// illegal byte sequences in the source.
const PLACEHOLDER: char = '?';

/// Result of a retrieval call. Variants hold the same meaning as the corresponding ODBC return
/// codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SqlResult<T> {
    /// The call succeeded and the value has been transferred completely.
    Success(T),
    /// The call succeeded, but a diagnostic applies. Data has been truncated to the buffer size
    /// or characters have been replaced by a placeholder.
    SuccessWithInfo(T),
    /// The value has already been transferred completely by earlier calls.
    NoData,
}

impl<T> SqlResult<T> {
    /// Applies `f` to any value wrapped in `Success` or `SuccessWithInfo`.
    pub fn map<U, F>(self, f: F) -> SqlResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            SqlResult::Success(v) => SqlResult::Success(f(v)),
            SqlResult::SuccessWithInfo(v) => SqlResult::SuccessWithInfo(f(v)),
            SqlResult::NoData => SqlResult::NoData,
        }
    }

    /// `True` if variant is [`SqlResult::NoData`].
    pub fn is_no_data(&self) -> bool {
        matches!(self, SqlResult::NoData)
    }

    pub fn unwrap(self) -> T {
        match self {
            SqlResult::Success(v) | SqlResult::SuccessWithInfo(v) => v,
            SqlResult::NoData => panic!("Unwraping SqlResult::NoData"),
        }
    }
}

/// What one engine call accomplished.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Copied {
    /// Bytes written into the destination, excluding the terminating zero. The wide engine
    /// counts bytes as well, two per UTF-16 code unit.
    pub bytes_written: usize,
    /// Value of the length indicator: bytes of the value which had still been untransferred at
    /// the start of this call, in the destination representation.
    pub available: usize,
    /// Part of the value did not fit and remains for a later call.
    pub truncated: bool,
    /// Number of characters replaced by the placeholder during this call.
    pub replaced: usize,
}

/// Options of a single transfer, derived from statement attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferOptions {
    /// Application requested limit on the length of any retrieved value, in source bytes. The
    /// value is treated as if it were this long; anything beyond is silently cut, without a
    /// truncation diagnostic of its own.
    pub max_length: Option<usize>,
}

/// Carried remainder of a character which only partially fit into the previous destination
/// buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Carry {
    #[default]
    None,
    /// Encoded bytes of the split character, and how many of them have been delivered already.
    Bytes {
        buf: [u8; MAX_ENCODED_LEN],
        len: u8,
        used: u8,
    },
    /// Low surrogate of a split UTF-16 pair.
    Unit(u16),
}

/// Position within one column value of the current row. Reset when the cursor moves to the next
/// row; retrieval calls for the same column pick up where the previous call stopped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferState {
    /// Offset of the next untransferred source byte. `None` before the first call, which also
    /// distinguishes "not started" from "started at the beginning" for empty values.
    src_offset: Option<usize>,
    /// Destination bytes delivered by earlier calls.
    dst_offset: usize,
    /// Size of the complete value in the destination representation. Computed on the first call
    /// of the character engines by converting the whole value.
    dst_total: Option<usize>,
    carry: Carry,
}

impl TransferState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any position, so the next call starts the value from its beginning.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Validate an application supplied buffer length. Negative lengths are rejected before any
/// transfer state is touched.
pub fn check_buffer_length(length: isize) -> Result<usize, Error> {
    usize::try_from(length).map_err(|_| Error::InvalidBufferLength { length })
}

fn clamp_max_length<'a>(src: &'a [u8], options: TransferOptions) -> &'a [u8] {
    match options.max_length {
        Some(max) if src.len() > max => &src[..max],
        _ => src,
    }
}

/// Copy raw bytes. No terminating zero, no conversion; the length indicator counts the source
/// bytes which were still untransferred when the call started.
pub fn copy_binary(
    state: &mut TransferState,
    options: TransferOptions,
    src: &[u8],
    dst: &mut [u8],
) -> SqlResult<Copied> {
    let src = clamp_max_length(src, options);
    let offset = match state.src_offset {
        Some(offset) if offset >= src.len() => return SqlResult::NoData,
        Some(offset) => offset,
        None => 0,
    };
    let remaining = &src[offset..];
    let copy_bytes = dst.len().min(remaining.len());
    dst[..copy_bytes].copy_from_slice(&remaining[..copy_bytes]);
    state.src_offset = Some(offset + copy_bytes);
    let copied = Copied {
        bytes_written: copy_bytes,
        available: remaining.len(),
        truncated: remaining.len() > dst.len(),
        replaced: 0,
    };
    if copied.truncated {
        SqlResult::SuccessWithInfo(copied)
    } else {
        SqlResult::Success(copied)
    }
}

/// Copy text, converting from the column character set into the connection character set. One
/// byte of the destination is reserved for the terminating zero.
///
/// The length indicator reports the untransferred part of the value in destination bytes, which
/// requires knowing the converted size of the whole value. The first call therefore keeps
/// converting (without writing) after the destination is full. The source position only
/// advances for characters actually delivered, so the counting pass does not disturb
/// resumption.
pub fn copy_text(
    state: &mut TransferState,
    options: TransferOptions,
    from: &dyn Encoding,
    to: &dyn Encoding,
    src: &[u8],
    dst: &mut [u8],
) -> Result<SqlResult<Copied>, Error> {
    // Identical character sets degrade to a byte copy plus a terminating zero.
    if from.number() == to.number() {
        let cap = dst.len().saturating_sub(1);
        let result = copy_binary(state, options, src, &mut dst[..cap]);
        if let SqlResult::Success(copied) | SqlResult::SuccessWithInfo(copied) = result {
            if !dst.is_empty() {
                dst[copied.bytes_written] = 0;
            }
        }
        return Ok(result);
    }

    let src = clamp_max_length(src, options);
    let offset = state.src_offset.unwrap_or(0);

    if let Some(total) = state.dst_total {
        if state.dst_offset >= total {
            return Ok(SqlResult::NoData);
        }
    }

    let cap = dst.len().saturating_sub(1);
    let mut write_pos = 0;
    // While `open` the destination still accepts bytes. Afterwards characters are only counted.
    let mut open = !dst.is_empty();
    if open && cap == 0 {
        dst[0] = 0;
        open = false;
    }
    let mut used_bytes = 0;
    let mut replaced = 0;
    // Counting cursor over the source. `delivered` trails it and only follows while characters
    // still reach the destination; it becomes the resumption point.
    let mut scan = offset;
    let mut delivered = offset;

    if let Carry::Bytes { buf, len, used } = state.carry {
        if open {
            let pending = &buf[used as usize..len as usize];
            let drain = pending.len().min(cap - write_pos);
            dst[write_pos..write_pos + drain].copy_from_slice(&pending[..drain]);
            write_pos += drain;
            used_bytes += drain;
            if drain == pending.len() {
                state.carry = Carry::None;
            } else {
                state.carry = Carry::Bytes {
                    buf,
                    len,
                    used: used + drain as u8,
                };
            }
            if write_pos == cap {
                dst[write_pos] = 0;
                open = false;
            }
        }
    }

    'chars: while scan < src.len() {
        let (ch, consumed) = match from.decode_char(&src[scan..]) {
            Decoded::Char { ch, consumed } => (ch, consumed),
            Decoded::Illegal { consumed } => {
                replaced += 1;
                (PLACEHOLDER, consumed)
            }
            Decoded::Incomplete => {
                return Err(Error::ConversionFromSource {
                    charset: from.name(),
                })
            }
        };
        let mut out = ch;
        let (buf, encoded_len) = loop {
            let mut buf = [0u8; MAX_ENCODED_LEN];
            match to.encode_char(out, &mut buf) {
                Encoded::Ok(n) => break (buf, n),
                Encoded::Unrepresentable if out != PLACEHOLDER => {
                    replaced += 1;
                    out = PLACEHOLDER;
                }
                Encoded::Unrepresentable | Encoded::TooSmall { .. } => {
                    return Err(Error::ConversionToTarget { charset: to.name() })
                }
            }
        };
        used_bytes += encoded_len;
        if !open {
            scan += consumed;
            continue;
        }
        let room = cap - write_pos;
        if encoded_len <= room {
            dst[write_pos..write_pos + encoded_len].copy_from_slice(&buf[..encoded_len]);
            write_pos += encoded_len;
            scan += consumed;
            delivered = scan;
            if write_pos == cap {
                if state.dst_total.is_some() {
                    // The full size is already known; nothing left to count.
                    break 'chars;
                }
                dst[write_pos] = 0;
                open = false;
            }
        } else {
            // The character does not fit as a whole. Deliver the prefix and carry the rest, so
            // no destination byte is ever wasted and the next call completes the character.
            dst[write_pos..cap].copy_from_slice(&buf[..room]);
            write_pos = cap;
            dst[write_pos] = 0;
            open = false;
            state.carry = Carry::Bytes {
                buf,
                len: encoded_len as u8,
                used: room as u8,
            };
            scan += consumed;
            delivered = scan;
            if state.dst_total.is_some() {
                break 'chars;
            }
        }
    }

    if open {
        dst[write_pos] = 0;
    }
    if state.dst_total.is_none() {
        state.dst_total = Some(used_bytes);
        state.dst_offset = 0;
    }
    finish_character_call(state, delivered, write_pos, replaced)
}

/// Copy text converted into UTF-16 code units. One unit of the destination is reserved for the
/// terminating zero. All byte quantities (written, available) count bytes, two per unit.
pub fn copy_wide(
    state: &mut TransferState,
    options: TransferOptions,
    from: &dyn Encoding,
    src: &[u8],
    dst: &mut [u16],
) -> Result<SqlResult<Copied>, Error> {
    let src = clamp_max_length(src, options);
    let offset = state.src_offset.unwrap_or(0);

    if let Some(total) = state.dst_total {
        if state.dst_offset >= total {
            return Ok(SqlResult::NoData);
        }
    }

    let cap = dst.len().saturating_sub(1);
    let mut write_units = 0;
    let mut open = !dst.is_empty();
    if open && cap == 0 {
        dst[0] = 0;
        open = false;
    }
    let mut used_units = 0;
    let mut replaced = 0;
    let mut scan = offset;
    let mut delivered = offset;

    if let Carry::Unit(low) = state.carry {
        if open {
            dst[write_units] = low;
            write_units += 1;
            used_units += 1;
            state.carry = Carry::None;
            if write_units == cap {
                dst[write_units] = 0;
                open = false;
            }
        }
    }

    'chars: while scan < src.len() {
        let (ch, consumed) = match from.decode_char(&src[scan..]) {
            Decoded::Char { ch, consumed } => (ch, consumed),
            Decoded::Illegal { consumed } => {
                replaced += 1;
                (PLACEHOLDER, consumed)
            }
            Decoded::Incomplete => {
                return Err(Error::ConversionFromSource {
                    charset: from.name(),
                })
            }
        };
        let mut unit_buf = [0u16; 2];
        let units = ch.encode_utf16(&mut unit_buf).len();
        used_units += units;
        if !open {
            scan += consumed;
            continue;
        }
        let room = cap - write_units;
        if units <= room {
            dst[write_units..write_units + units].copy_from_slice(&unit_buf[..units]);
            write_units += units;
            scan += consumed;
            delivered = scan;
            if write_units == cap {
                if state.dst_total.is_some() {
                    break 'chars;
                }
                dst[write_units] = 0;
                open = false;
            }
        } else {
            // A surrogate pair with room for one unit. The high surrogate is delivered and the
            // low surrogate carried over.
            dst[write_units] = unit_buf[0];
            write_units = cap;
            dst[write_units] = 0;
            open = false;
            state.carry = Carry::Unit(unit_buf[1]);
            scan += consumed;
            delivered = scan;
            if state.dst_total.is_some() {
                break 'chars;
            }
        }
    }

    if open {
        dst[write_units] = 0;
    }
    if state.dst_total.is_none() {
        state.dst_total = Some(used_units * 2);
        state.dst_offset = 0;
    }
    finish_character_call(state, delivered, write_units * 2, replaced)
}

/// Advance the transfer state after a character engine call and derive the result.
fn finish_character_call(
    state: &mut TransferState,
    delivered: usize,
    bytes_written: usize,
    replaced: usize,
) -> Result<SqlResult<Copied>, Error> {
    // dst_total has been filled in by the caller for first calls.
    let total = state.dst_total.unwrap_or(0);
    let available = total - state.dst_offset;
    state.dst_offset += bytes_written;
    state.src_offset = Some(delivered);
    let copied = Copied {
        bytes_written,
        available,
        truncated: total > state.dst_offset,
        replaced,
    };
    Ok(if copied.truncated || replaced > 0 {
        SqlResult::SuccessWithInfo(copied)
    } else {
        SqlResult::Success(copied)
    })
}

/// Render binary data as uppercase hexadecimal digits into a character buffer. Two digits per
/// source byte, terminated by zero. The length limit applies to the digit count, so both the
/// usable buffer size and the effective source length are clamped against it.
pub fn copy_hex(
    state: &mut TransferState,
    options: TransferOptions,
    src: &[u8],
    dst: &mut [u8],
) -> SqlResult<Copied> {
    let mut dst_len = dst.len();
    let mut src_len = src.len();
    if let Some(max) = options.max_length {
        dst_len = dst_len.min(max + 1);
        src_len = src_len.min((max + 1) / 2);
    }
    let offset = match state.src_offset {
        Some(offset) if offset >= src_len => return SqlResult::NoData,
        Some(offset) => offset,
        None => 0,
    };
    let remaining = src_len - offset;
    let length = if dst_len > 0 {
        ((dst_len - 1) / 2).min(remaining)
    } else {
        0
    };
    state.src_offset = Some(offset + length);

    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    for (i, &byte) in src[offset..offset + length].iter().enumerate() {
        dst[i * 2] = DIGITS[usize::from(byte >> 4)];
        dst[i * 2 + 1] = DIGITS[usize::from(byte & 0x0F)];
    }
    if dst_len > 0 {
        dst[length * 2] = 0;
    }

    let copied = Copied {
        bytes_written: length * 2,
        available: remaining * 2,
        truncated: length < remaining,
        replaced: 0,
    };
    if copied.truncated {
        SqlResult::SuccessWithInfo(copied)
    } else {
        SqlResult::Success(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{Ascii, Latin1, Ucs2, Utf8, Utf8Mb4};

    /// Retrieve a complete value through repeated calls with a fixed buffer size and return the
    /// concatenation of all delivered bytes (terminators stripped).
    fn drain_text(
        from: &dyn Encoding,
        to: &dyn Encoding,
        src: &[u8],
        buf_size: usize,
    ) -> Vec<u8> {
        let mut state = TransferState::new();
        let mut out = Vec::new();
        loop {
            let mut buf = vec![0u8; buf_size];
            match copy_text(
                &mut state,
                TransferOptions::default(),
                from,
                to,
                src,
                &mut buf,
            )
            .unwrap()
            {
                SqlResult::NoData => break,
                SqlResult::Success(copied) | SqlResult::SuccessWithInfo(copied) => {
                    out.extend_from_slice(&buf[..copied.bytes_written]);
                    if copied.bytes_written == 0 && !copied.truncated {
                        break;
                    }
                }
            }
        }
        out
    }

    #[test]
    fn binary_single_call() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        let result = copy_binary(
            &mut state,
            TransferOptions::default(),
            b"abc",
            &mut buf,
        );
        let copied = result.unwrap();
        assert_eq!(3, copied.bytes_written);
        assert_eq!(3, copied.available);
        assert!(!copied.truncated);
        assert_eq!(b"abc", &buf[..3]);
        // The value is exhausted now.
        assert!(copy_binary(&mut state, TransferOptions::default(), b"abc", &mut buf).is_no_data());
    }

    #[test]
    fn binary_split_over_calls_matches_single_copy() {
        let src: Vec<u8> = (0u8..=50).collect();
        let mut state = TransferState::new();
        let mut out = Vec::new();
        loop {
            let mut buf = [0u8; 7];
            match copy_binary(&mut state, TransferOptions::default(), &src, &mut buf) {
                SqlResult::NoData => break,
                SqlResult::Success(copied) | SqlResult::SuccessWithInfo(copied) => {
                    // The indicator always reports what was left at the start of the call.
                    assert_eq!(src.len() - out.len(), copied.available);
                    out.extend_from_slice(&buf[..copied.bytes_written]);
                }
            }
        }
        assert_eq!(src, out);
    }

    #[test]
    fn binary_truncation_reports_remaining() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 2];
        let result = copy_binary(&mut state, TransferOptions::default(), b"abcde", &mut buf);
        let SqlResult::SuccessWithInfo(copied) = result else {
            panic!("expected truncation")
        };
        assert_eq!(2, copied.bytes_written);
        assert_eq!(5, copied.available);
        assert!(copied.truncated);
    }

    #[test]
    fn binary_honors_max_length() {
        let options = TransferOptions {
            max_length: Some(3),
        };
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        let copied = copy_binary(&mut state, options, b"abcde", &mut buf).unwrap();
        assert_eq!(3, copied.bytes_written);
        assert_eq!(3, copied.available);
        assert!(!copied.truncated);
    }

    #[test]
    fn empty_binary_value_succeeds_then_no_data() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 4];
        let copied = copy_binary(&mut state, TransferOptions::default(), b"", &mut buf).unwrap();
        assert_eq!(0, copied.bytes_written);
        assert_eq!(0, copied.available);
        assert!(copy_binary(&mut state, TransferOptions::default(), b"", &mut buf).is_no_data());
    }

    #[test]
    fn same_charset_text_is_terminated_byte_copy() {
        let mut state = TransferState::new();
        let mut buf = [0xFFu8; 6];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Latin1,
            b"abc",
            &mut buf,
        )
        .unwrap()
        .unwrap();
        assert_eq!(3, copied.bytes_written);
        assert_eq!(b"abc\0", &buf[..4]);
    }

    #[test]
    fn text_conversion_reports_converted_size() {
        // Two latin1 characters becoming two bytes each in utf8.
        let mut state = TransferState::new();
        let mut buf = [0u8; 16];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4, 0xF6], // "äö"
            &mut buf,
        )
        .unwrap()
        .unwrap();
        assert_eq!(4, copied.bytes_written);
        assert_eq!(4, copied.available);
        assert!(!copied.truncated);
        assert_eq!("äö".as_bytes(), &buf[..4]);
        assert_eq!(0, buf[4]);
    }

    #[test]
    fn split_text_calls_concatenate_to_whole_value() {
        let src = "grüße und mehr".as_bytes();
        let expected = drain_text(&Utf8, &Latin1, src, 64);
        for buf_size in 2..8 {
            assert_eq!(expected, drain_text(&Utf8, &Latin1, src, buf_size));
        }
    }

    #[test]
    fn multi_byte_character_is_never_split_without_carry() {
        // Converting into utf8, buffer of three: one byte payload capacity would split 'ä'. The
        // engine writes the fitting prefix and completes the character on the next call.
        let mut state = TransferState::new();
        let mut first = [0u8; 3];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4, 0xF6],
            &mut first,
        )
        .unwrap()
        .unwrap();
        // 'ä' encodes to C3 A4; both payload bytes written, zero terminated.
        assert_eq!(2, copied.bytes_written);
        assert_eq!(4, copied.available);
        assert!(copied.truncated);
        assert_eq!([0xC3, 0xA4, 0x00], first);

        let mut second = [0u8; 3];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4, 0xF6],
            &mut second,
        )
        .unwrap()
        .unwrap();
        assert_eq!(2, copied.bytes_written);
        assert_eq!(2, copied.available);
        assert!(!copied.truncated);
        assert_eq!([0xC3, 0xB6, 0x00], second);

        let result = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4, 0xF6],
            &mut second,
        )
        .unwrap();
        assert!(result.is_no_data());
    }

    #[test]
    fn carry_over_spans_calls() {
        // Capacity of three payload bytes per call forces 'ö' to be split after 'ä'.
        let mut state = TransferState::new();
        let mut first = [0u8; 4];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4, 0xF6],
            &mut first,
        )
        .unwrap()
        .unwrap();
        assert_eq!(3, copied.bytes_written);
        assert!(copied.truncated);
        assert_eq!([0xC3, 0xA4, 0xC3, 0x00], first);

        let mut second = [0u8; 4];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4, 0xF6],
            &mut second,
        )
        .unwrap()
        .unwrap();
        // Only the carried byte remains.
        assert_eq!(1, copied.bytes_written);
        assert_eq!(1, copied.available);
        assert!(!copied.truncated);
        assert_eq!([0xB6, 0x00], &second[..2]);
    }

    #[test]
    fn text_copy_into_empty_buffer_counts_only() {
        let mut state = TransferState::new();
        let mut empty: [u8; 0] = [];
        let copied = copy_text(
            &mut state,
            TransferOptions::default(),
            &Latin1,
            &Utf8,
            &[0xE4],
            &mut empty,
        )
        .unwrap()
        .unwrap();
        assert_eq!(0, copied.bytes_written);
        assert_eq!(2, copied.available);
        assert!(copied.truncated);
    }

    #[test]
    fn unrepresentable_character_becomes_placeholder() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        let result = copy_text(
            &mut state,
            TransferOptions::default(),
            &Utf8,
            &Ascii,
            "aäb".as_bytes(),
            &mut buf,
        )
        .unwrap();
        let SqlResult::SuccessWithInfo(copied) = result else {
            panic!("replacement must be reported")
        };
        assert_eq!(1, copied.replaced);
        assert_eq!(b"a?b\0", &buf[..4]);
    }

    #[test]
    fn illegal_source_sequence_becomes_placeholder() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        let result = copy_text(
            &mut state,
            TransferOptions::default(),
            &Utf8,
            &Latin1,
            &[b'a', 0xA4, b'b'], // stray continuation byte
            &mut buf,
        )
        .unwrap();
        let SqlResult::SuccessWithInfo(copied) = result else {
            panic!("replacement must be reported")
        };
        assert_eq!(1, copied.replaced);
        assert_eq!(b"a?b\0", &buf[..4]);
    }

    #[test]
    fn source_ending_mid_character_is_an_error() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        let result = copy_text(
            &mut state,
            TransferOptions::default(),
            &Utf8,
            &Latin1,
            &[b'a', 0xC3], // 'ä' cut in half
            &mut buf,
        );
        assert!(matches!(result, Err(Error::ConversionFromSource { .. })));
    }

    #[test]
    fn indicator_shrinks_with_every_call() {
        let src = "abcdef".as_bytes();
        let mut state = TransferState::new();
        let mut expected_available = 6;
        loop {
            let mut buf = [0u8; 3];
            match copy_text(
                &mut state,
                TransferOptions::default(),
                &Utf8,
                &Latin1,
                src,
                &mut buf,
            )
            .unwrap()
            {
                SqlResult::NoData => break,
                SqlResult::Success(copied) | SqlResult::SuccessWithInfo(copied) => {
                    assert_eq!(expected_available, copied.available);
                    expected_available -= copied.bytes_written;
                }
            }
        }
        assert_eq!(0, expected_available);
    }

    #[test]
    fn wide_copy_converts_and_terminates() {
        let mut state = TransferState::new();
        let mut buf = [0xFFFFu16; 8];
        let copied = copy_wide(
            &mut state,
            TransferOptions::default(),
            &Utf8,
            "aä".as_bytes(),
            &mut buf,
        )
        .unwrap()
        .unwrap();
        assert_eq!(4, copied.bytes_written);
        assert_eq!(4, copied.available);
        let expected = widestring::U16String::from_str("aä");
        assert_eq!(expected.as_slice(), &buf[..2]);
        assert_eq!(0, buf[2]);
    }

    #[test]
    fn wide_surrogate_pair_is_carried_over() {
        // The clef sign needs two units; with one payload unit per call the pair is split.
        let src = "𝄞".as_bytes();
        let mut state = TransferState::new();
        let mut first = [0u16; 2];
        let copied = copy_wide(
            &mut state,
            TransferOptions::default(),
            &Utf8Mb4,
            src,
            &mut first,
        )
        .unwrap()
        .unwrap();
        assert_eq!(2, copied.bytes_written);
        assert_eq!(4, copied.available);
        assert!(copied.truncated);

        let mut second = [0u16; 2];
        let copied = copy_wide(
            &mut state,
            TransferOptions::default(),
            &Utf8Mb4,
            src,
            &mut second,
        )
        .unwrap()
        .unwrap();
        assert_eq!(2, copied.bytes_written);
        assert!(!copied.truncated);
        let expected = widestring::U16String::from_str("𝄞");
        assert_eq!(expected.as_slice(), &[first[0], second[0]]);

        assert!(copy_wide(
            &mut state,
            TransferOptions::default(),
            &Utf8Mb4,
            src,
            &mut second
        )
        .unwrap()
        .is_no_data());
    }

    #[test]
    fn wide_copy_from_ucs2_source() {
        let mut state = TransferState::new();
        let mut buf = [0u16; 4];
        let copied = copy_wide(
            &mut state,
            TransferOptions::default(),
            &Ucs2,
            &[0x00, 0x61, 0x00, 0xE4], // "aä" big endian
            &mut buf,
        )
        .unwrap()
        .unwrap();
        assert_eq!(4, copied.bytes_written);
        assert_eq!([0x0061, 0x00E4, 0x0000], &buf[..3]);
        assert_eq!(0, copied.replaced);
    }

    #[test]
    fn hex_renders_uppercase_digits() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        let copied = copy_hex(
            &mut state,
            TransferOptions::default(),
            &[0x0A, 0xFF],
            &mut buf,
        )
        .unwrap();
        assert_eq!(4, copied.bytes_written);
        assert_eq!(4, copied.available);
        assert!(!copied.truncated);
        assert_eq!(b"0AFF\0", &buf[..5]);
    }

    #[test]
    fn hex_truncates_at_byte_granularity() {
        // Four usable bytes hold one byte worth of digits only.
        let mut state = TransferState::new();
        let mut buf = [0u8; 4];
        let SqlResult::SuccessWithInfo(copied) = copy_hex(
            &mut state,
            TransferOptions::default(),
            &[0x0A, 0xFF],
            &mut buf,
        ) else {
            panic!("expected truncation")
        };
        assert_eq!(2, copied.bytes_written);
        assert_eq!(4, copied.available);
        assert_eq!(b"0A\0", &buf[..3]);

        let copied = copy_hex(
            &mut state,
            TransferOptions::default(),
            &[0x0A, 0xFF],
            &mut buf,
        )
        .unwrap();
        assert_eq!(2, copied.bytes_written);
        assert_eq!(2, copied.available);
        assert_eq!(b"FF\0", &buf[..3]);

        assert!(copy_hex(&mut state, TransferOptions::default(), &[0x0A, 0xFF], &mut buf)
            .is_no_data());
    }

    #[test]
    fn hex_max_length_limits_digits() {
        // A limit of 4 digits allows two source bytes.
        let options = TransferOptions {
            max_length: Some(4),
        };
        let mut state = TransferState::new();
        let mut buf = [0u8; 16];
        let copied = copy_hex(&mut state, options, &[0x01, 0x02, 0x03, 0x04], &mut buf).unwrap();
        assert_eq!(4, copied.bytes_written);
        assert_eq!(4, copied.available);
        assert!(!copied.truncated);
        assert_eq!(b"0102\0", &buf[..5]);
    }

    #[test]
    fn no_data_is_stable() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        copy_binary(&mut state, TransferOptions::default(), b"x", &mut buf);
        for _ in 0..3 {
            assert!(copy_binary(&mut state, TransferOptions::default(), b"x", &mut buf)
                .is_no_data());
        }
    }

    #[test]
    fn reset_restarts_the_value() {
        let mut state = TransferState::new();
        let mut buf = [0u8; 8];
        copy_binary(&mut state, TransferOptions::default(), b"abc", &mut buf);
        state.reset();
        let copied = copy_binary(&mut state, TransferOptions::default(), b"abc", &mut buf).unwrap();
        assert_eq!(3, copied.bytes_written);
    }

    #[test]
    fn negative_buffer_length_is_rejected() {
        assert!(matches!(
            check_buffer_length(-1),
            Err(Error::InvalidBufferLength { length: -1 })
        ));
        assert_eq!(16, check_buffer_length(16).unwrap());
    }
}
