//! UTF-8 codec
//!
//! Translates between UTF-8 encoded bytes and Unicode code points. Encoding is
//! a plain range-threshold encoder; decoding is Bjoern Hoehrmann's table-driven
//! DFA, which rejects overlong forms, surrogates, lone continuation bytes and
//! lead bytes of 0xF5 and above.
//!
//! The codec sits at the boundary between the console's code-point storage and
//! hosts that hand over or expect encoded text.

use thiserror::Error;

/// Decoder state: a complete code point has been decoded
pub const UTF8_ACCEPT: u8 = 0;

/// Decoder state: the input is not valid UTF-8
pub const UTF8_REJECT: u8 = 1;

/// Code point substituted for invalid input (U+FFFD)
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// Largest Unicode scalar value
pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

// Copyright (c) 2008-2009 Bjoern Hoehrmann <bjoern@hoehrmann.de>
// See http://bjoern.hoehrmann.de/utf-8/decoder/dfa/ for details.
//
// The first 256 entries map a byte to its character class, the remaining
// 9 x 16 entries map (state, class) to the next state.
static UTF8D: [u8; 400] = [
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 00..1f
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 20..3f
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 40..5f
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 60..7f
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9, // 80..9f
    7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7, // a0..bf
    8,8,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2, // c0..df
    0xa,0x3,0x3,0x3,0x3,0x3,0x3,0x3,0x3,0x3,0x3,0x3,0x3,0x4,0x3,0x3, // e0..ef
    0xb,0x6,0x6,0x6,0x5,0x8,0x8,0x8,0x8,0x8,0x8,0x8,0x8,0x8,0x8,0x8, // f0..ff
    0x0,0x1,0x2,0x3,0x5,0x8,0x7,0x1,0x1,0x1,0x4,0x6,0x1,0x1,0x1,0x1, // s0..s0
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,0,1,1,1,1,1,0,1,0,1,1,1,1,1,1, // s1..s2
    1,2,1,1,1,1,1,2,1,2,1,1,1,1,1,1,1,1,1,1,1,1,1,2,1,1,1,1,1,1,1,1, // s3..s4
    1,2,1,1,1,1,1,1,1,2,1,1,1,1,1,1,1,1,1,1,1,1,1,3,1,3,1,1,1,1,1,1, // s5..s6
    1,3,1,1,1,1,1,3,1,3,1,1,1,1,1,1,1,3,1,1,1,1,1,1,1,1,1,1,1,1,1,1, // s7..s8
];

/// Errors produced by the UTF-8 codec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UTF8Error {
    /// Malformed byte sequence (only reported by [`validate`]; the decoders
    /// substitute U+FFFD and resynchronise instead)
    #[error("Invalid UTF-8 byte sequence at offset {offset}")]
    InvalidByteSequence {
        /// Byte offset at which the sequence was rejected
        offset: usize,
    },

    /// Input ended in the middle of a multi-byte sequence
    #[error("UTF-8 input ended inside a sequence ({pending} byte(s) pending)")]
    TruncatedSequence {
        /// Number of trailing bytes that did not complete a code point
        pending: usize,
    },

    /// Target buffer cannot hold the encoded code point
    #[error("Encode buffer too small: need {needed} byte(s), have {available}")]
    InsufficientBuffer {
        /// Bytes required
        needed: usize,
        /// Bytes available
        available: usize,
    },
}

/// Result type for codec operations
pub type UTF8Result<T> = Result<T, UTF8Error>;

/// Number of bytes needed to encode `codepoint`
///
/// Uses the standard range thresholds only; the Unicode upper bound is not
/// checked here.
#[inline]
pub const fn encoded_length(codepoint: u32) -> usize {
    if codepoint < 0x80 {
        1
    } else if codepoint < 0x800 {
        2
    } else if codepoint < 0x1_0000 {
        3
    } else {
        4
    }
}

#[inline]
const fn continuation(bits: u32) -> u8 {
    0x80 | (bits & 0x3F) as u8
}

fn encode_raw(codepoint: u32) -> ([u8; 4], usize) {
    let len = encoded_length(codepoint);
    let bytes = match len {
        1 => [codepoint as u8, 0, 0, 0],
        2 => [0xC0 | (codepoint >> 6) as u8, continuation(codepoint), 0, 0],
        3 => [
            0xE0 | (codepoint >> 12) as u8,
            continuation(codepoint >> 6),
            continuation(codepoint),
            0,
        ],
        _ => [
            0xF0 | (codepoint >> 18) as u8,
            continuation(codepoint >> 12),
            continuation(codepoint >> 6),
            continuation(codepoint),
        ],
    };
    (bytes, len)
}

/// Encode a single code point into `out`
///
/// Returns the number of bytes written. Fails with
/// [`UTF8Error::InsufficientBuffer`] when `out` is shorter than
/// [`encoded_length`], without writing anything.
///
/// # Errors
///
/// Returns [`UTF8Error::InsufficientBuffer`] if `out` is too small.
pub fn encode(codepoint: u32, out: &mut [u8]) -> UTF8Result<usize> {
    let (bytes, len) = encode_raw(codepoint);
    if out.len() < len {
        return Err(UTF8Error::InsufficientBuffer {
            needed: len,
            available: out.len(),
        });
    }
    out[..len].copy_from_slice(&bytes[..len]);
    Ok(len)
}

/// One step of the DFA decoder
///
/// Folds `byte` into `codepoint` and returns the next state: [`UTF8_ACCEPT`]
/// when `codepoint` holds a complete code point, [`UTF8_REJECT`] for invalid
/// input, anything else when more bytes are needed. The reject state is
/// sticky; callers substitute [`REPLACEMENT_CHARACTER`] and restart from
/// [`UTF8_ACCEPT`].
#[inline]
pub fn decode_step(state: u8, codepoint: &mut u32, byte: u8) -> u8 {
    let class = UTF8D[usize::from(byte)];

    *codepoint = if state == UTF8_ACCEPT {
        (0xFF_u32 >> class) & u32::from(byte)
    } else {
        (u32::from(byte) & 0x3F) | (*codepoint << 6)
    };

    UTF8D[256 + usize::from(state) * 16 + usize::from(class)]
}

/// Outcome of feeding one byte to a [`UTF8Decoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// A code point was completed
    Accept(u32),
    /// More bytes are needed
    Incomplete,
    /// The sequence was invalid; the decoder has been reset
    Reject,
}

/// Streaming decoder built on [`decode_step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UTF8Decoder {
    state: u8,
    codepoint: u32,
}

impl UTF8Decoder {
    /// Create a decoder in the accept state
    pub const fn new() -> Self {
        Self {
            state: UTF8_ACCEPT,
            codepoint: 0,
        }
    }

    /// Feed one byte
    pub fn step(&mut self, byte: u8) -> DecodeStatus {
        self.state = decode_step(self.state, &mut self.codepoint, byte);
        match self.state {
            UTF8_ACCEPT => DecodeStatus::Accept(self.codepoint),
            UTF8_REJECT => {
                self.reset();
                DecodeStatus::Reject
            }
            _ => DecodeStatus::Incomplete,
        }
    }

    /// Drop any partial sequence and return to the accept state
    pub fn reset(&mut self) {
        self.state = UTF8_ACCEPT;
        self.codepoint = 0;
    }

    /// Whether the decoder sits between code points
    pub const fn is_idle(&self) -> bool {
        self.state == UTF8_ACCEPT
    }

    /// Raw DFA state
    pub const fn state(&self) -> u8 {
        self.state
    }
}

/// Decode `bytes`, appending code points to `out`
///
/// Invalid sequences become [`REPLACEMENT_CHARACTER`]. A byte that interrupts
/// a partial sequence is decoded again as the start of a new one, so e.g.
/// `C3 41` yields `U+FFFD 'A'`. Returns the number of code points appended.
///
/// # Errors
///
/// Returns [`UTF8Error::TruncatedSequence`] when the input ends mid-sequence.
/// Everything decoded before the dangling bytes has already been appended.
pub fn decode_into(bytes: &[u8], out: &mut Vec<u32>) -> UTF8Result<usize> {
    let start_len = out.len();
    let mut decoder = UTF8Decoder::new();
    let mut pending = 0usize;

    for &byte in bytes {
        let interrupted = !decoder.is_idle();
        match decoder.step(byte) {
            DecodeStatus::Accept(codepoint) => {
                out.push(codepoint);
                pending = 0;
            }
            DecodeStatus::Incomplete => pending += 1,
            DecodeStatus::Reject => {
                out.push(REPLACEMENT_CHARACTER);
                pending = 0;
                if interrupted {
                    match decoder.step(byte) {
                        DecodeStatus::Accept(codepoint) => out.push(codepoint),
                        DecodeStatus::Incomplete => pending = 1,
                        DecodeStatus::Reject => out.push(REPLACEMENT_CHARACTER),
                    }
                }
            }
        }
    }

    if decoder.is_idle() {
        Ok(out.len() - start_len)
    } else {
        Err(UTF8Error::TruncatedSequence { pending })
    }
}

/// Decode a whole byte run into code points
///
/// # Errors
///
/// Returns [`UTF8Error::TruncatedSequence`] when the input ends mid-sequence;
/// use [`decode_into`] to keep the partially decoded output.
pub fn decode_string(bytes: &[u8]) -> UTF8Result<Vec<u32>> {
    let mut codepoints = Vec::with_capacity(bytes.len());
    decode_into(bytes, &mut codepoints)?;
    Ok(codepoints)
}

/// Count accepted code points and report whether the run ends in the accept state
///
/// Runs the raw DFA without resynchronisation: after the first invalid
/// sequence nothing more is counted and the run is reported invalid.
pub fn count_code_points(bytes: &[u8]) -> (usize, bool) {
    let mut state = UTF8_ACCEPT;
    let mut codepoint = 0;
    let mut count = 0;

    for &byte in bytes {
        state = decode_step(state, &mut codepoint, byte);
        if state == UTF8_ACCEPT {
            count += 1;
        }
    }

    (count, state == UTF8_ACCEPT)
}

/// Check that `bytes` is complete, valid UTF-8
///
/// Returns the number of code points on success.
///
/// # Errors
///
/// [`UTF8Error::InvalidByteSequence`] at the first rejected byte, or
/// [`UTF8Error::TruncatedSequence`] when the input ends mid-sequence.
pub fn validate(bytes: &[u8]) -> UTF8Result<usize> {
    let mut decoder = UTF8Decoder::new();
    let mut count = 0;
    let mut pending = 0;

    for (offset, &byte) in bytes.iter().enumerate() {
        match decoder.step(byte) {
            DecodeStatus::Accept(_) => {
                count += 1;
                pending = 0;
            }
            DecodeStatus::Incomplete => pending += 1,
            DecodeStatus::Reject => return Err(UTF8Error::InvalidByteSequence { offset }),
        }
    }

    if decoder.is_idle() {
        Ok(count)
    } else {
        Err(UTF8Error::TruncatedSequence { pending })
    }
}

/// Length of a code-point run up to (not including) its first 0
pub fn nul_terminated_length(codepoints: &[u32]) -> usize {
    codepoints
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(codepoints.len())
}

/// Number of bytes needed to encode a code-point run (up to its first 0)
pub fn encoded_string_length(codepoints: &[u32]) -> usize {
    codepoints[..nul_terminated_length(codepoints)]
        .iter()
        .map(|&c| encoded_length(c))
        .sum()
}

/// Encode a code-point run (up to its first 0) into UTF-8 bytes
pub fn encode_string(codepoints: &[u32]) -> Vec<u8> {
    let run = &codepoints[..nul_terminated_length(codepoints)];
    let mut bytes = Vec::with_capacity(encoded_string_length(run));
    for &codepoint in run {
        let (encoded, len) = encode_raw(codepoint);
        bytes.extend_from_slice(&encoded[..len]);
    }
    bytes
}

/// Decode the first code point of `bytes`
///
/// Returns `(codepoint, len)`, where `len` is the byte length of the
/// sequence, or `None` when the leading sequence is invalid or cut short.
fn leading_code_point(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut state = UTF8_ACCEPT;
    let mut codepoint = 0;

    for (index, &byte) in bytes.iter().take(4).enumerate() {
        state = decode_step(state, &mut codepoint, byte);
        match state {
            UTF8_ACCEPT => return Some((codepoint, index + 1)),
            UTF8_REJECT => return None,
            _ => {}
        }
    }
    None
}

/// Byte length of the first character of `bytes`
///
/// An invalid or truncated leading sequence counts as a single byte, so a
/// walk over arbitrary bytes always makes progress. Returns 0 only for an
/// empty slice.
pub fn validated_char_length(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    leading_code_point(bytes).map_or(1, |(_, len)| len)
}

/// First character of `bytes`, or [`REPLACEMENT_CHARACTER`] when it is invalid
///
/// Returns 0 for an empty slice.
pub fn char_at(bytes: &[u8]) -> u32 {
    if bytes.is_empty() {
        return 0;
    }
    leading_code_point(bytes).map_or(REPLACEMENT_CHARACTER, |(codepoint, _)| codepoint)
}

/// Number of characters in `bytes`, with each invalid byte counted as one
pub fn glyph_count(bytes: &[u8]) -> usize {
    let mut offset = 0;
    let mut count = 0;
    while offset < bytes.len() {
        offset += validated_char_length(&bytes[offset..]);
        count += 1;
    }
    count
}

/// Byte index where character `pos` starts
///
/// `pos` equal to the character count gives `bytes.len()`. Positions past
/// the end give `None`.
pub fn char_byte_index(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut offset = 0;
    for _ in 0..pos {
        if offset == bytes.len() {
            return None;
        }
        offset += validated_char_length(&bytes[offset..]);
    }
    Some(offset)
}

/// Tail of `bytes` starting at character `pos`
pub fn slice_from_char(bytes: &[u8], pos: usize) -> Option<&[u8]> {
    char_byte_index(bytes, pos).map(|index| &bytes[index..])
}

/// Byte length of the first `chars` characters of `bytes`
///
/// Stops at the end of the slice when it holds fewer characters.
pub fn counted_byte_len(bytes: &[u8], chars: usize) -> usize {
    let mut offset = 0;
    for _ in 0..chars {
        if offset == bytes.len() {
            break;
        }
        offset += validated_char_length(&bytes[offset..]);
    }
    offset
}
