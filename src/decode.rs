//! A module for all decoding needs.
use std::io::{self, BufRead, Write};

use crate::bits::BitReader;
use crate::policy::{Policy, Transition};
use crate::{AllResult, Code, LzwError, ResetPolicy, ALPHABET, EOF_CODE, MAX_ENTRIES};

/// Decoded bytes collected before they are handed to the writer.
const CHUNK: usize = 1 << 16;

/// The state for decoding data with an LZW algorithm.
///
/// The reset policy is not configured here, it is read from the header bit of each stream.
pub struct Decoder {
    /// The policy of the last stream, once its header was read.
    reset: Option<ResetPolicy>,
    state: DecodeState,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type and more information.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
pub struct IntoStream<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
}

#[derive(Clone, Copy)]
struct Link {
    prefix: Code,
    byte: u8,
}

struct DecodeState {
    /// The table of decoded codes.
    table: Table,

    /// Code size and next code, advanced exactly like the encoder's.
    policy: Policy,

    /// The sequence of the last code.
    buffer: Vec<u8>,

    /// The last code, `None` at the start of an epoch.
    last: Option<Code>,

    /// The slot reserved for the entry that the next code completes.
    pending: Option<Code>,

    resets: usize,
}

/// The decoder's dictionary, indexed by code.
///
/// Each entry links to the entry of its sequence without the last byte.
struct Table {
    inner: Vec<Link>,
    depths: Vec<u32>,
}

/// Decoded bytes waiting to be written.
struct Output<W> {
    writer: W,
    bytes: Vec<u8>,
    bytes_written: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            reset: None,
            state: DecodeState::new(),
        }
    }

    /// Construct a decoder into a writer.
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            decoder: self,
            writer,
        }
    }

    /// Decode a complete stream into a new vector.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut input = BitReader::new(data);
        let mut output = Output::new(Vec::with_capacity(2 * data.len()));
        self.decode_stream(&mut input, &mut output)?;
        Ok(output.writer)
    }

    /// The reset policy read from the header of the last stream.
    pub fn policy(&self) -> Option<ResetPolicy> {
        self.reset
    }

    /// The code size the last code was read with.
    pub fn code_size(&self) -> u8 {
        self.state.policy.code_size()
    }

    /// The number of dictionary resets during the last decoded stream.
    pub fn dictionary_resets(&self) -> usize {
        self.state.resets
    }

    fn decode_stream<R: BufRead, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        out: &mut Output<W>,
    ) -> Result<(), LzwError> {
        self.reset = None;
        let header = input.read_bits(1)?.ok_or(LzwError::UnexpectedEof)?;
        let reset = ResetPolicy::from_header(header);
        self.reset = Some(reset);
        self.state.restart(reset);

        loop {
            let size = self.state.policy.code_size();
            let code = input.read_bits(size)?.ok_or(LzwError::UnexpectedEof)?;
            if code == EOF_CODE {
                break;
            }

            self.state.push_code(code)?;
            out.write(&self.state.buffer)?;
        }

        out.finish()?;
        Ok(())
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl<W: Write> IntoStream<'_, W> {
    /// Decode data from a reader up to and including the end code.
    ///
    /// Nothing after the byte holding the end code is consumed from the reader.
    pub fn decode_all(self, read: impl BufRead) -> AllResult {
        let IntoStream { decoder, writer } = self;
        let mut input = BitReader::new(read);
        let mut out = Output::new(writer);
        let status = decoder
            .decode_stream(&mut input, &mut out)
            .map_err(io::Error::from);

        AllResult {
            bytes_read: input.bytes_read(),
            bytes_written: out.bytes_written,
            status,
        }
    }
}

impl DecodeState {
    fn new() -> Self {
        let mut table = Table::new();
        table.clear();
        DecodeState {
            table,
            policy: Policy::new(ResetPolicy::Freeze),
            buffer: vec![],
            last: None,
            pending: None,
            resets: 0,
        }
    }

    fn restart(&mut self, reset: ResetPolicy) {
        self.table.clear();
        self.policy = Policy::new(reset);
        self.last = None;
        self.pending = None;
        self.resets = 0;
    }

    /// Reconstruct the sequence of `code` into the buffer and update the table.
    fn push_code(&mut self, code: Code) -> Result<(), LzwError> {
        match self.last {
            // The first code of an epoch can only refer to a single byte.
            None if usize::from(code) < ALPHABET => {
                self.table.reconstruct(code, &mut self.buffer);
            }
            Some(last) if usize::from(code) < self.table.len() => {
                self.table.reconstruct(code, &mut self.buffer);
                if self.pending.is_some() {
                    self.table.derive(last, self.buffer[0]);
                }
            }
            // The code the encoder defined right before using it. Its sequence is the last one
            // extended by its own first byte, which is still at the front of the buffer.
            Some(last) if self.pending == Some(code) => {
                self.table.derive(last, self.buffer[0]);
                self.table.reconstruct(code, &mut self.buffer);
            }
            _ => {
                return Err(LzwError::InvalidCode {
                    code,
                    next: self.table.len() as u32,
                })
            }
        }

        self.last = Some(code);
        self.pending = match self.policy.reserve() {
            Some((_, Transition::Reset)) => {
                self.reset_table();
                None
            }
            Some((slot, _)) => Some(slot),
            None => None,
        };

        Ok(())
    }

    fn reset_table(&mut self) {
        self.resets += 1;
        tracing::debug!(resets = self.resets, "resetting dictionary");
        self.table.clear();
        self.last = None;
    }
}

impl Table {
    fn new() -> Self {
        Table {
            inner: Vec::with_capacity(MAX_ENTRIES),
            depths: Vec::with_capacity(MAX_ENTRIES),
        }
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.depths.clear();
        for byte in 0..=255u8 {
            self.inner.push(Link::base(byte));
            self.depths.push(1);
        }
        // End code.
        self.inner.push(Link::base(0));
        self.depths.push(0);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn derive(&mut self, prefix: Code, byte: u8) {
        debug_assert!(self.inner.len() < MAX_ENTRIES);
        let depth = self.depths[usize::from(prefix)] + 1;
        self.inner.push(Link { prefix, byte });
        self.depths.push(depth);
    }

    fn reconstruct(&self, code: Code, out: &mut Vec<u8>) {
        let depth = self.depths[usize::from(code)] as usize;
        out.clear();
        out.resize(depth, 0);

        let mut code = code;
        for ch in out.iter_mut().rev() {
            let entry = self.inner[usize::from(code)];
            *ch = entry.byte;
            code = entry.prefix;
        }
    }
}

impl Link {
    fn base(byte: u8) -> Self {
        Link { prefix: 0, byte }
    }
}

impl<W: Write> Output<W> {
    fn new(writer: W) -> Self {
        Output {
            writer,
            bytes: Vec::with_capacity(CHUNK),
            bytes_written: 0,
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.bytes.extend_from_slice(data);
        if self.bytes.len() >= CHUNK {
            self.push_out()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.push_out()?;
        self.writer.flush()
    }

    fn push_out(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.bytes)?;
        self.bytes_written += self.bytes.len();
        self.bytes.clear();
        Ok(())
    }
}
