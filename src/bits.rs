//! Bit level reading and writing, most significant bit first.
use std::io::{self, BufRead, Write};

use crate::Code;

/// Bytes collected before they are handed to the writer.
const CHUNK: usize = 1 << 12;

pub(crate) struct BitWriter<W> {
    writer: W,
    /// The buffer bits, aligned to the most significant end.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
    /// Full bytes not yet written out.
    pending: Vec<u8>,
    bytes_written: usize,
}

pub(crate) struct BitReader<R> {
    reader: R,
    buffer: u64,
    bits_in_buffer: u8,
    bytes_read: usize,
}

impl<W: Write> BitWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        BitWriter {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            pending: Vec::with_capacity(CHUNK),
            bytes_written: 0,
        }
    }

    /// Append the low `size` bits of `code`.
    pub(crate) fn write_bits(&mut self, code: Code, size: u8) -> io::Result<()> {
        debug_assert!(size <= 16 && u32::from(code) < 1 << size);
        let shift = 64 - self.bits_in_buffer - size;
        self.buffer |= u64::from(code) << shift;
        self.bits_in_buffer += size;

        while self.bits_in_buffer >= 8 {
            self.pending.push((self.buffer >> 56) as u8);
            self.buffer <<= 8;
            self.bits_in_buffer -= 8;
        }

        if self.pending.len() >= CHUNK {
            self.push_out()?;
        }

        Ok(())
    }

    /// Pad the last byte with zero bits and write everything out.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if self.bits_in_buffer > 0 {
            self.pending.push((self.buffer >> 56) as u8);
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
        self.push_out()?;
        self.writer.flush()
    }

    pub(crate) fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    fn push_out(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.pending)?;
        self.bytes_written += self.pending.len();
        self.pending.clear();
        Ok(())
    }
}

impl<R: BufRead> BitReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        BitReader {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            bytes_read: 0,
        }
    }

    /// Read the next `size` bits, or `None` if the stream ends before that.
    ///
    /// Bytes are only consumed from the reader as far as needed, nothing past the byte holding
    /// the last requested bit is read.
    pub(crate) fn read_bits(&mut self, size: u8) -> io::Result<Option<Code>> {
        debug_assert!(size > 0 && size <= 16);
        while self.bits_in_buffer < size {
            let byte = match self.reader.fill_buf()?.first() {
                Some(&byte) => byte,
                None => return Ok(None),
            };
            self.reader.consume(1);
            self.bytes_read += 1;
            self.buffer |= u64::from(byte) << (56 - self.bits_in_buffer);
            self.bits_in_buffer += 8;
        }

        let code = (self.buffer >> (64 - size)) as Code;
        self.buffer <<= size;
        self.bits_in_buffer -= size;
        Ok(Some(code))
    }

    pub(crate) fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}
