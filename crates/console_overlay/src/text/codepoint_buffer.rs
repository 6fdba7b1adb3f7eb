//! Growable code-point buffer
//!
//! Storage for every piece of console text (output log, input line, prompt).
//! Text is kept as 32-bit code points with an explicit logical length that is
//! always strictly below the allocated capacity, so the slot after the content
//! is a 0 sentinel and the storage can be handed out as a null-terminated
//! code-point string.

use std::fmt::{self, Write};

use super::utf8::{self, UTF8Result};

/// Growable, null-terminated sequence of code points
///
/// Capacity doubles on demand and never shrinks except through an explicit
/// [`resize`](Self::resize). Cloning produces a deep copy with the same
/// capacity and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodepointBuffer {
    /// Backing storage; `data.len()` is the capacity and every slot at or past
    /// `length` is 0
    data: Vec<u32>,

    /// Number of code points in use
    length: usize,
}

impl CodepointBuffer {
    /// Create an empty buffer with `initial_capacity` zeroed slots
    ///
    /// A capacity of 0 is raised to 1 so the sentinel slot always exists.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            data: vec![0; initial_capacity.max(1)],
            length: 0,
        }
    }

    /// Number of code points in use
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether the buffer holds no code points
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of allocated slots, sentinel included
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The code points in use
    pub fn as_slice(&self) -> &[u32] {
        &self.data[..self.length]
    }

    /// The code points in use followed by the 0 sentinel
    ///
    /// This is the view external text APIs expecting a null-terminated
    /// code-point string should receive.
    pub fn as_nul_terminated(&self) -> &[u32] {
        &self.data[..=self.length]
    }

    /// Append one code point, doubling capacity when the sentinel slot would be lost
    ///
    /// Pushing 0 is ignored: 0 is the terminator and the "no value" sentinel
    /// returned by [`pop_codepoint`](Self::pop_codepoint).
    pub fn push_codepoint(&mut self, codepoint: u32) {
        if codepoint == 0 {
            return;
        }

        if self.capacity() <= self.length + 1 {
            self.resize(self.capacity() * 2);
        }

        self.data[self.length] = codepoint;
        self.length += 1;
        self.data[self.length] = 0;
    }

    /// Append a character
    pub fn push_char(&mut self, c: char) {
        self.push_codepoint(u32::from(c));
    }

    /// Append a run of code points, stopping at the first 0
    ///
    /// Capacity is grown once, by repeated doubling, to fit the whole run.
    pub fn push_codepoints(&mut self, codepoints: &[u32]) {
        let run = &codepoints[..utf8::nul_terminated_length(codepoints)];
        if run.is_empty() {
            return;
        }

        let required = self.length + run.len();
        if self.capacity() <= required {
            let mut new_capacity = self.capacity();
            while new_capacity <= required {
                new_capacity *= 2;
            }
            self.resize(new_capacity);
        }

        self.data[self.length..required].copy_from_slice(run);
        self.length = required;
        self.data[self.length] = 0;
    }

    /// Append a string slice, stopping at the first NUL
    pub fn push_str(&mut self, text: &str) {
        let codepoints: Vec<u32> = text
            .chars()
            .take_while(|&c| c != '\0')
            .map(u32::from)
            .collect();
        self.push_codepoints(&codepoints);
    }

    /// Decode UTF-8 bytes and append the resulting code points
    ///
    /// Invalid sequences are pushed as U+FFFD. Returns the number of code
    /// points decoded (a decoded NUL still ends the appended run).
    ///
    /// # Errors
    ///
    /// Returns [`UTF8Error::TruncatedSequence`](super::utf8::UTF8Error::TruncatedSequence)
    /// when `bytes` ends mid-sequence. The code points decoded before the
    /// dangling bytes are pushed regardless.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> UTF8Result<usize> {
        let mut codepoints = Vec::with_capacity(bytes.len());
        let result = utf8::decode_into(bytes, &mut codepoints);
        self.push_codepoints(&codepoints);
        result
    }

    /// Remove and return the last code point, or 0 if the buffer is empty
    pub fn pop_codepoint(&mut self) -> u32 {
        if self.length == 0 {
            return 0;
        }

        self.length -= 1;
        let codepoint = self.data[self.length];
        self.data[self.length] = 0;
        codepoint
    }

    /// Remove the last code point as a `char`
    ///
    /// Returns `None` on an empty buffer; a stored value that is not a Unicode
    /// scalar comes back as U+FFFD.
    pub fn pop_char(&mut self) -> Option<char> {
        match self.pop_codepoint() {
            0 => None,
            codepoint => Some(to_char(codepoint)),
        }
    }

    /// Zero every slot and reset the length; capacity is kept
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.length = 0;
    }

    /// Reallocate to `new_capacity` slots
    ///
    /// Shrinking below the current content truncates it to
    /// `new_capacity - 1` code points. That data is lost: callers shrinking a
    /// buffer accept the truncation. A capacity of 0 is raised to 1.
    pub fn resize(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.max(1);
        let kept = if new_capacity > self.length {
            self.length
        } else {
            log::debug!(
                "Truncating code-point buffer from {} to {} code points",
                self.length,
                new_capacity - 1
            );
            new_capacity - 1
        };

        let mut data = vec![0; new_capacity];
        data[..kept].copy_from_slice(&self.data[..kept]);
        self.data = data;
        self.length = kept;
    }

    /// Encode the content as UTF-8 bytes
    pub fn to_utf8(&self) -> Vec<u8> {
        utf8::encode_string(self.as_slice())
    }

    /// Iterate the content as characters, mapping invalid scalars to U+FFFD
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.as_slice().iter().map(|&c| to_char(c))
    }
}

impl Default for CodepointBuffer {
    fn default() -> Self {
        Self::new(16)
    }
}

impl fmt::Display for CodepointBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// Convert a code point to a `char`, substituting U+FFFD for non-scalars
pub fn to_char(codepoint: u32) -> char {
    char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Build a `String` from a code-point run, substituting U+FFFD for non-scalars
pub fn run_to_string(codepoints: &[u32]) -> String {
    codepoints.iter().map(|&c| to_char(c)).collect()
}
