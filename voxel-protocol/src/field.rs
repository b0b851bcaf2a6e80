//! Restartable field tokenizer
//!
//! A [`FieldReader`] walks a byte buffer and hands out one delimited field
//! per call. It never allocates and never reads past the end of the buffer,
//! so it can be pointed at untrusted packets.

/// Cursor over a packet that yields delimiter-separated fields
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Unread bytes
    pub fn remaining(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or(&[])
    }

    /// Take exactly `n` bytes, or `None` if fewer remain
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Take a single byte
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Read up to the next `delimiter` or the end of input
    ///
    /// The delimiter is consumed but not included in the returned field.
    /// Calling this on an exhausted reader returns an empty field.
    pub fn next_field(&mut self, delimiter: u8) -> &'a [u8] {
        let rest = self.remaining();
        match rest.iter().position(|&b| b == delimiter) {
            Some(idx) => {
                self.pos += idx + 1;
                &rest[..idx]
            }
            None => {
                self.pos = self.buf.len();
                rest
            }
        }
    }
}

/// Parse an unsigned decimal field no larger than `max`
///
/// Surrounding ASCII whitespace is ignored. Signs, empty fields and values
/// that overflow `max` are rejected.
pub fn parse_decimal(field: &[u8], max: u32) -> Option<u32> {
    let digits = field.trim_ascii();
    if digits.is_empty() {
        return None;
    }

    let mut value: u32 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add((b - b'0') as u32)?;
        if value > max {
            return None;
        }
    }
    Some(value)
}
