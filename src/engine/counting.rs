//! Position tracking for the decompressed read stream.

use std::io::{self, Read};

/// A reader that counts the bytes it has yielded.
///
/// The tar parser reports entry positions relative to where it started
/// reading; the count lets the engine translate them into absolute offsets
/// within the decompressed stream and resynchronize after each entry.
#[derive(Debug)]
pub(crate) struct CountingReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes read so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Consumes and discards bytes until `position` reaches `target`.
    ///
    /// Returns the number of bytes discarded; fewer than requested means the
    /// stream ended first.
    pub fn skip_to(&mut self, target: u64) -> io::Result<u64> {
        let wanted = target.saturating_sub(self.position);
        if wanted == 0 {
            return Ok(0);
        }
        io::copy(&mut self.by_ref().take(wanted), &mut io::sink())
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}
