// Newline framing for byte streams

use std::collections::VecDeque;

use tracing::warn;

/// Splits a byte stream into `\n`-terminated lines
pub struct LineBuffer {
    pending: Vec<u8>,
    lines: VecDeque<String>,
    max_len: usize,
    overflowed: bool, // dropping bytes until the next newline
}

impl LineBuffer {
    pub fn new(max_len: usize) -> Self {
        Self {
            pending: Vec::with_capacity(max_len),
            lines: VecDeque::new(),
            max_len,
            overflowed: false,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if byte == b'\n' {
                if self.overflowed {
                    self.overflowed = false;
                } else {
                    self.lines
                        .push_back(String::from_utf8_lossy(&self.pending).into_owned());
                }
                self.pending.clear();
            } else if self.pending.len() >= self.max_len {
                if !self.overflowed {
                    warn!("Line longer than {} bytes, discarding", self.max_len);
                    self.overflowed = true;
                }
            } else {
                self.pending.push(byte);
            }
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// Forget partial and complete lines (used when the link drops)
    pub fn clear(&mut self) {
        self.pending.clear();
        self.lines.clear();
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_across_pushes() {
        let mut buf = LineBuffer::new(16);
        buf.push(b"CG1");
        assert_eq!(buf.pop(), None);
        buf.push(b"20\r\nU\n");
        assert_eq!(buf.pop().as_deref(), Some("CG120\r"));
        assert_eq!(buf.pop().as_deref(), Some("U"));
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let mut buf = LineBuffer::new(16);
        buf.push(b"\n\nS\n");
        assert_eq!(buf.pop().as_deref(), Some(""));
        assert_eq!(buf.pop().as_deref(), Some(""));
        assert_eq!(buf.pop().as_deref(), Some("S"));
    }

    #[test]
    fn test_overlong_line_dropped() {
        let mut buf = LineBuffer::new(4);
        buf.push(b"ABCDEFGH\nF1\n");
        assert_eq!(buf.pop().as_deref(), Some("F1"));
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn test_clear() {
        let mut buf = LineBuffer::new(8);
        buf.push(b"U\nD");
        buf.clear();
        buf.push(b"L\n");
        assert_eq!(buf.pop().as_deref(), Some("L"));
    }
}
