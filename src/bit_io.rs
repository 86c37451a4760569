//! Bit-granular adapters over byte channels.
//!
//! Both adapters are MSB-first: the first bit read or written is the most
//! significant bit of the first byte. Multi-bit groups are also most
//! significant bit first.

use std::io::{self, ErrorKind, Read, Write};

/// Bit reader over any byte source.
///
/// Reads return `Ok(None)` once the source is exhausted; a group read that
/// runs out part way also returns `Ok(None)` and the partial bits are lost.
pub struct BitReader<R: Read> {
    inner: Option<R>,
    cur: u8,
    // bits of `cur` not yet handed out
    remaining: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: Some(inner),
            cur: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    /// Total bits handed out so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn read_bit(&mut self) -> io::Result<Option<u8>> {
        if self.remaining == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.cur = byte;
                    self.remaining = 8;
                }
                None => return Ok(None),
            }
        }
        self.remaining -= 1;
        self.bits_read += 1;
        Ok(Some((self.cur >> self.remaining) & 1))
    }

    /// Read `n` bits (at most 32) as an unsigned value.
    pub fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>> {
        if n > 32 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot read {} bits into a 32-bit value", n),
            ));
        }
        let mut value: u32 = 0;
        for _ in 0..n {
            match self.read_bit()? {
                Some(bit) => value = (value << 1) | bit as u32,
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }

    /// Release the underlying source. Safe to call more than once.
    pub fn close(&mut self) {
        self.inner = None;
        self.remaining = 0;
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let inner = match self.inner.as_mut() {
            Some(inner) => inner,
            None => return Ok(None),
        };
        let mut byte = [0u8; 1];
        loop {
            match inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Bit writer over any byte sink.
///
/// A partial trailing byte is padded with zero bits when the writer is
/// flushed or closed. Dropping the writer closes it and ignores any error;
/// call [`BitWriter::close`] to observe flush failures.
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    cur: u8,
    // bits already placed in `cur`
    filled: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            cur: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    /// Total bits accepted so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if self.inner.is_none() {
            return Err(io::Error::new(ErrorKind::BrokenPipe, "bit writer is closed"));
        }
        if bit {
            self.cur |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        self.bits_written += 1;
        if self.filled == 8 {
            self.emit_byte()?;
        }
        Ok(())
    }

    /// Write the low `n` bits (at most 32) of `value`.
    pub fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()> {
        if n > 32 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot write {} bits from a 32-bit value", n),
            ));
        }
        for bit_pos in (0..n).rev() {
            self.write_bit((value >> bit_pos) & 1 == 1)?;
        }
        Ok(())
    }

    /// Pad any partial byte and flush the sink. The writer stays usable.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            self.emit_byte()?;
        }
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }

    /// Flush and release the sink. Safe to call more than once; only the
    /// first call does any work.
    pub fn close(&mut self) -> io::Result<()> {
        if self.inner.is_none() {
            return Ok(());
        }
        let result = self.flush();
        self.inner = None;
        result
    }

    fn emit_byte(&mut self) -> io::Result<()> {
        let byte = self.cur;
        self.cur = 0;
        self.filled = 0;
        match self.inner.as_mut() {
            Some(inner) => inner.write_all(&[byte]),
            None => Err(io::Error::new(ErrorKind::BrokenPipe, "bit writer is closed")),
        }
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
