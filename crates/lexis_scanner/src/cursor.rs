//! Buffered character cursor over a UTF-8 byte stream.
//!
//! The cursor decodes one character at a time, so the input is never
//! materialized. Characters pulled ahead of the logical position wait in a
//! FIFO buffer and are handed out again by `read` before anything new is
//! taken from the stream.

use crate::char_codes::utf8_sequence_length;
use crate::error::ScanError;
use lexis_core::text::SourcePosition;
use std::collections::VecDeque;
use std::io::{self, BufReader, Read};

pub struct CharCursor<R> {
    reader: BufReader<R>,
    /// Characters read from the stream but not yet consumed.
    buffer: VecDeque<char>,
    position: SourcePosition,
    /// Bytes taken from the stream so far, for error reporting.
    byte_offset: u64,
    eof: bool,
}

impl<R> CharCursor<R> {
    /// The position of the next character to be consumed.
    #[inline]
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// Number of characters pulled ahead of the logical position.
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read> CharCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: VecDeque::new(),
            position: SourcePosition::start(),
            byte_offset: 0,
            eof: false,
        }
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>, ScanError> {
        self.peek_nth(0)
    }

    /// Look `n` characters past the logical position without consuming
    /// anything. Pulls from the stream into the buffer as needed.
    pub fn peek_nth(&mut self, n: usize) -> Result<Option<char>, ScanError> {
        while self.buffer.len() <= n {
            match self.decode_next()? {
                Some(ch) => self.buffer.push_back(ch),
                None => return Ok(None),
            }
        }
        Ok(self.buffer.get(n).copied())
    }

    /// Consume the next character and advance the position.
    pub fn read(&mut self) -> Result<Option<char>, ScanError> {
        let ch = match self.buffer.pop_front() {
            Some(ch) => Some(ch),
            None => self.decode_next()?,
        };
        if let Some(ch) = ch {
            self.position.advance(ch);
        }
        Ok(ch)
    }

    /// Pull one more raw character into the lookahead buffer and return it.
    /// The logical position is unchanged.
    pub fn push_lookahead(&mut self) -> Result<Option<char>, ScanError> {
        let ch = self.decode_next()?;
        if let Some(ch) = ch {
            self.buffer.push_back(ch);
        }
        Ok(ch)
    }

    /// Consume every buffered character. Returns how many were committed.
    pub fn discard_buffer(&mut self) -> usize {
        let count = self.buffer.len();
        for ch in self.buffer.drain(..) {
            self.position.advance(ch);
        }
        count
    }

    /// Swap in a new reader and reset all state. Returns the old reader.
    pub fn replace_reader(&mut self, reader: R) -> R {
        let old = std::mem::replace(&mut self.reader, BufReader::new(reader));
        self.buffer.clear();
        self.position = SourcePosition::start();
        self.byte_offset = 0;
        self.eof = false;
        old.into_inner()
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    fn decode_next(&mut self) -> Result<Option<char>, ScanError> {
        if self.eof {
            return Ok(None);
        }
        let start = self.byte_offset;
        let lead = match self.read_byte()? {
            Some(b) => b,
            None => {
                self.eof = true;
                return Ok(None);
            }
        };
        let width = utf8_sequence_length(lead);
        if width == 0 {
            return Err(ScanError::InvalidUtf8 { offset: start });
        }
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .read_byte()?
                .ok_or(ScanError::InvalidUtf8 { offset: start })?;
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(ScanError::InvalidUtf8 { offset: start })
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ScanError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.byte_offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
