//! Newline-delimited command framing for the host link.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────────┬────────────┐
//! │ ASCII token (≤ 32 B, UTF-8)  │ \n (\r\n)  │
//! └──────────────────────────────┴────────────┘
//! ```
//!
//! The decoder is fed one byte at a time, straight from the UART read
//! buffer, so a line may arrive split across any number of reads.
//! Surrounding ASCII whitespace (including the `\r` of a CRLF terminator)
//! is trimmed; blank lines are skipped.  An over-long or non-UTF-8 line is
//! dropped whole: everything up to its `\n` is discarded.

use heapless::Vec;
use log::debug;

/// Longest accepted line, terminator excluded.
pub const MAX_LINE_LEN: usize = 32;

/// One spare byte for the `\r` of a CRLF terminator.
const LINE_BUF_LEN: usize = MAX_LINE_LEN + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    Collecting,
    /// Overflowed; skipping to the next `\n`.
    Discarding,
}

/// Streaming line decoder.
pub struct LineDecoder {
    state: DecoderState,
    line: Vec<u8, LINE_BUF_LEN>,
    /// The previous call returned a line borrowed from `line`.
    yielded: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            line: Vec::new(),
            yielded: false,
        }
    }

    /// Feed one byte.
    ///
    /// Returns the trimmed line when `byte` completes a valid, non-blank
    /// one.  The returned slice is valid until the next call.
    pub fn push(&mut self, byte: u8) -> Option<&str> {
        if self.yielded {
            self.line.clear();
            self.yielded = false;
        }

        match (self.state, byte) {
            (DecoderState::Discarding, b'\n') => {
                self.state = DecoderState::Collecting;
                None
            }
            (DecoderState::Discarding, _) => None,

            (DecoderState::Collecting, b'\n') => {
                self.yielded = true;
                if self.line.last() == Some(&b'\r') {
                    self.line.pop();
                }
                if self.line.len() > MAX_LINE_LEN {
                    debug!("Link: line exceeds {MAX_LINE_LEN} B, dropped");
                    return None;
                }
                match core::str::from_utf8(&self.line) {
                    Ok(text) => {
                        let text = text.trim_ascii();
                        if text.is_empty() { None } else { Some(text) }
                    }
                    Err(_) => {
                        debug!("Link: dropped non-UTF-8 line ({} B)", self.line.len());
                        None
                    }
                }
            }
            (DecoderState::Collecting, _) => {
                if self.line.push(byte).is_err() {
                    debug!("Link: line exceeds {MAX_LINE_LEN} B, discarding");
                    self.line.clear();
                    self.state = DecoderState::Discarding;
                }
                None
            }
        }
    }

    /// Drop any partial line (e.g. after a UART error).
    pub fn reset(&mut self) {
        self.state = DecoderState::Collecting;
        self.line.clear();
        self.yielded = false;
    }
}
