//! A module for all encoding needs.
use std::io::{self, BufRead, Write};

use crate::bits::BitWriter;
use crate::policy::{Policy, Transition};
use crate::tst::Tst;
use crate::{AllResult, LzwError, ResetPolicy, EOF_CODE};

/// The state for encoding data with an LZW algorithm.
///
/// The same structure can be utilized with streams as well as your own buffers and driver logic.
/// Every call to one of the encoding methods produces one complete stream, starting from a
/// freshly seeded dictionary.
pub struct Encoder {
    reset: ResetPolicy,
    state: EncodeState,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

struct EncodeState {
    /// The current encoding symbol tree.
    tree: Tst,
    /// Code size and next code.
    policy: Policy,
    /// How often the dictionary was reseeded during the last run.
    resets: usize,
}

/// The input bytes, with a tally of how many were taken.
struct Bytes<R> {
    reader: R,
    bytes_read: usize,
}

impl Encoder {
    /// Create an encoder that freezes its dictionary once it is full.
    pub fn new() -> Self {
        Encoder::with_policy(ResetPolicy::Freeze)
    }

    /// Create an encoder that reseeds its dictionary whenever it is full at 16 bit codes.
    pub fn with_dictionary_reset() -> Self {
        Encoder::with_policy(ResetPolicy::Reset)
    }

    pub fn with_policy(reset: ResetPolicy) -> Self {
        Encoder {
            reset,
            state: EncodeState::new(reset),
        }
    }

    /// Construct a encoder into a writer.
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
        }
    }

    /// Encode all of `data` into a new vector, end code included.
    pub fn encode(&mut self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut output = Vec::with_capacity(data.len() / 2 + 4);
        let mut input = Bytes::new(data);
        let mut writer = BitWriter::new(&mut output);
        self.encode_stream(&mut input, &mut writer)?;
        Ok(output)
    }

    /// The reset policy recorded in the header of every produced stream.
    pub fn policy(&self) -> ResetPolicy {
        self.reset
    }

    /// The code size the end code of the last stream was written with.
    pub fn code_size(&self) -> u8 {
        self.state.policy.code_size()
    }

    /// The number of dictionary resets during the last encoded stream.
    pub fn dictionary_resets(&self) -> usize {
        self.state.resets
    }

    fn encode_stream<R: BufRead, W: Write>(
        &mut self,
        input: &mut Bytes<R>,
        out: &mut BitWriter<W>,
    ) -> Result<(), LzwError> {
        self.state.restart(self.reset);
        out.write_bits(self.reset.header(), 1)?;
        self.state.encode(input, out)?;
        out.write_bits(EOF_CODE, self.state.policy.code_size())?;
        out.finish()?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl<W: Write> IntoStream<'_, W> {
    /// Encode data from a reader, followed by the end code.
    ///
    /// This will drain the supplied reader.
    pub fn encode_all(self, read: impl BufRead) -> AllResult {
        let IntoStream { encoder, writer } = self;
        let mut input = Bytes::new(read);
        let mut out = BitWriter::new(writer);
        let status = encoder
            .encode_stream(&mut input, &mut out)
            .map_err(io::Error::from);

        AllResult {
            bytes_read: input.bytes_read,
            bytes_written: out.bytes_written(),
            status,
        }
    }
}

impl EncodeState {
    fn new(reset: ResetPolicy) -> Self {
        EncodeState {
            tree: Tst::seeded(),
            policy: Policy::new(reset),
            resets: 0,
        }
    }

    fn restart(&mut self, reset: ResetPolicy) {
        self.tree.reset();
        self.policy = Policy::new(reset);
        self.resets = 0;
    }

    fn encode<R: BufRead, W: Write>(
        &mut self,
        input: &mut Bytes<R>,
        out: &mut BitWriter<W>,
    ) -> Result<(), LzwError> {
        let mut next = input.next()?;

        while let Some(byte) = next {
            let (mut node, mut code) = match self.tree.start(byte) {
                Some(start) => start,
                None => unreachable!("all single bytes are seeded"),
            };

            // Extend the match for as long as the dictionary knows the sequence.
            next = loop {
                match input.next()? {
                    None => break None,
                    Some(byte) => match self.tree.successor(node, byte) {
                        Some((succ, succ_code)) => {
                            node = succ;
                            code = succ_code;
                        }
                        None => break Some(byte),
                    },
                }
            };

            out.write_bits(code, self.policy.code_size())?;

            // The decoder reserves a slot after each code, whether or not another code follows.
            // Without a following byte the slot stays empty but the code size may still change,
            // and the end code must be written at the size the decoder reads it with.
            match self.policy.reserve() {
                Some((_, Transition::Reset)) => self.reset_tree(),
                Some((new_code, _)) => {
                    if let Some(byte) = next {
                        self.tree.append(node, byte, new_code);
                    }
                }
                None => {}
            }
        }

        Ok(())
    }

    fn reset_tree(&mut self) {
        self.resets += 1;
        tracing::debug!(resets = self.resets, "resetting dictionary");
        self.tree.reset();
    }
}

impl<R: BufRead> Bytes<R> {
    fn new(reader: R) -> Self {
        Bytes {
            reader,
            bytes_read: 0,
        }
    }

    fn next(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.reader.fill_buf()?.first() {
            Some(&byte) => byte,
            None => return Ok(None),
        };
        self.reader.consume(1);
        self.bytes_read += 1;
        Ok(Some(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::Encoder;
    use crate::bits::BitReader;
    use crate::{ResetPolicy, EOF_CODE};

    #[test]
    fn empty_input() {
        let out = Encoder::new().encode(&[]).unwrap();
        // Header bit 0, end code at 9 bits, padding.
        assert_eq!(out, [0b0100_0000, 0b0000_0000]);

        let out = Encoder::with_dictionary_reset().encode(&[]).unwrap();
        assert_eq!(out, [0b1100_0000, 0b0000_0000]);
    }

    #[test]
    fn two_bytes() {
        let out = Encoder::new().encode(b"AB").unwrap();
        // 0 | 001000001 | 001000010 | 100000000 | 0000
        assert_eq!(out, [0x10, 0x48, 0x50, 0x00]);
    }

    #[test]
    fn distinct_bytes_use_seed_codes() {
        let data: Vec<u8> = (0..=255).collect();
        let mut encoder = Encoder::new();
        let out = encoder.encode(&data).unwrap();

        let mut reader = BitReader::new(&out[..]);
        assert_eq!(reader.read_bits(1).unwrap(), Some(0));
        // Entries 257 to 511 are defined after the first 255 codes, the last code is wider.
        for byte in 0..255u16 {
            assert_eq!(reader.read_bits(9).unwrap(), Some(byte));
        }
        assert_eq!(reader.read_bits(10).unwrap(), Some(255));
        assert_eq!(reader.read_bits(10).unwrap(), Some(EOF_CODE));
        assert_eq!(encoder.code_size(), 10);
    }

    #[test]
    fn repeated_byte_builds_runs() {
        let mut encoder = Encoder::new();
        let out = encoder.encode(&[b'A'; 10]).unwrap();

        let mut reader = BitReader::new(&out[..]);
        assert_eq!(reader.read_bits(1).unwrap(), Some(0));
        // A, AA, AAA, AAAA consume all ten bytes.
        for &code in &[65, 257, 258, 259, EOF_CODE] {
            assert_eq!(reader.read_bits(9).unwrap(), Some(code));
        }
    }

    #[test]
    fn reused_encoder_is_deterministic() {
        let data = b"abababababababab, cdcdcdcdcd, abababab";
        let mut encoder = Encoder::with_policy(ResetPolicy::Reset);
        let first = encoder.encode(data).unwrap();
        let second = encoder.encode(data).unwrap();
        assert_eq!(first, second);
        assert_eq!(encoder.policy(), ResetPolicy::Reset);
        assert_eq!(encoder.dictionary_resets(), 0);
    }

    #[test]
    fn stream_counts_bytes() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT";
        let mut out = vec![];
        let result = Encoder::new().into_stream(&mut out).encode_all(&data[..]);
        assert!(result.status.is_ok());
        assert_eq!(result.bytes_read, data.len());
        assert_eq!(result.bytes_written, out.len());
        assert_eq!(out, Encoder::new().encode(data).unwrap());
    }
}
