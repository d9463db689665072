//! Formatting into fixed-capacity buffers.

use std::fmt;

/// `fmt::Write` adapter over a byte slice that silently truncates.
///
/// Output beyond the slice length is dropped, like `snprintf`. Truncation
/// happens on a `char` boundary so the written prefix stays valid UTF-8.
#[derive(Debug)]
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> BoundedWriter<'a> {
    /// Start writing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            truncated: false,
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any output was dropped.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Written prefix of the buffer.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len() - self.len;
        let take = if s.len() <= room {
            s.len()
        } else {
            self.truncated = true;
            (0..=room).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
        };

        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// Format `args` into `buf`, truncating at its capacity.
///
/// Returns the number of bytes written.
pub fn write_bounded(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    let mut writer = BoundedWriter::new(buf);
    // write_str never fails, so neither does write_fmt
    let _ = fmt::Write::write_fmt(&mut writer, args);
    writer.len()
}
