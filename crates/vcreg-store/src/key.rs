//! # Composite Key Codec
//!
//! Keys are `prefix byte || segment*`. String segments are written as a
//! big-endian `u32` length followed by the UTF-8 bytes; integer segments
//! are fixed-width big-endian. Because every string carries its own length,
//! the encoding of `("ab", "c")` never collides with `("a", "bc")`, and a
//! prefix made from a complete leading segment matches exactly the keys
//! whose first segment equals it.

use crate::error::StoreError;

/// Builder for a composite key.
#[derive(Debug, Clone)]
pub struct KeyEncoder(Vec<u8>);

impl KeyEncoder {
    /// Start a key in the table identified by `prefix`.
    pub fn new(prefix: u8) -> Self {
        Self(vec![prefix])
    }

    /// Append a length-prefixed string segment.
    pub fn str(mut self, segment: &str) -> Self {
        let len = u32::try_from(segment.len()).unwrap_or(u32::MAX);
        self.0.extend_from_slice(&len.to_be_bytes());
        self.0.extend_from_slice(&segment.as_bytes()[..len as usize]);
        self
    }

    /// Append a fixed-width integer segment. Big-endian so byte order
    /// matches numeric order.
    pub fn u64(mut self, n: u64) -> Self {
        self.0.extend_from_slice(&n.to_be_bytes());
        self
    }

    /// Finish the key.
    pub fn finish(self) -> Vec<u8> {
        self.0
    }
}

/// Reader for a composite key produced by [`KeyEncoder`].
#[derive(Debug)]
pub struct KeyDecoder<'a> {
    rest: &'a [u8],
}

impl<'a> KeyDecoder<'a> {
    /// Check the table prefix and position the reader after it.
    pub fn new(key: &'a [u8], prefix: u8) -> Result<Self, StoreError> {
        match key.split_first() {
            Some((&p, rest)) if p == prefix => Ok(Self { rest }),
            Some((&p, _)) => Err(StoreError::MalformedKey(format!(
                "expected table prefix {prefix:#04x}, found {p:#04x}"
            ))),
            None => Err(StoreError::MalformedKey("empty key".to_string())),
        }
    }

    /// Read a string segment.
    pub fn str(&mut self) -> Result<&'a str, StoreError> {
        let len = self.take(4)?;
        let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map_err(|e| StoreError::MalformedKey(format!("segment is not UTF-8: {e}")))
    }

    /// Read an integer segment.
    pub fn u64(&mut self) -> Result<u64, StoreError> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buf))
    }

    /// Require that the whole key was consumed.
    pub fn finish(self) -> Result<(), StoreError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(StoreError::MalformedKey(format!(
                "{} trailing bytes",
                self.rest.len()
            )))
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], StoreError> {
        if self.rest.len() < n {
            return Err(StoreError::MalformedKey(format!(
                "truncated segment: wanted {n} bytes, {} left",
                self.rest.len()
            )));
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Ok(head)
    }
}
