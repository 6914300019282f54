//! # LZW decoder and encoder
//!
//! This crate provides an [`Encoder`] and [`Decoder`] for a single LZW flavour: the dictionary is
//! seeded with all 256 byte values, code words start out 9 bits wide and grow up to 16 bits as
//! the dictionary fills. Once the 16 bit ceiling is hit the dictionary is either frozen for the
//! rest of the stream or discarded and reseeded, depending on the [`ResetPolicy`].
//!
//! The compressed stream is laid out as follows, most significant bit first:
//!
//!  * one header bit, `1` if the dictionary is reset at the ceiling and `0` if it is frozen,
//!  * the code words, each as wide as the dictionary state at that point requires,
//!  * the end code `EOF_CODE == 256`, followed by zero bits up to the next byte boundary.
//!
//! The width of a code word is never stored. Both sides derive it from the same deterministic
//! policy, and the decoder rebuilds the encoder's dictionary from the code words alone.
//!
//! Exemplary use of the encoder and decoder:
//!
//! ```
//! use lzwtst::{Decoder, Encoder};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let compressed = Encoder::with_dictionary_reset().encode(data).unwrap();
//! let decompressed = Decoder::new().decode(&compressed).unwrap();
//! assert_eq!(&decompressed[..], &data[..]);
//! ```
#![forbid(unsafe_code)]
use std::io;

/// Alias for a LZW code point
pub type Code = u16;

/// The number of distinct input symbols.
pub(crate) const ALPHABET: usize = 256;
/// The code signalling the end of the stream. Never assigned to a sequence.
pub const EOF_CODE: Code = 256;
/// The first code assigned to a sequence longer than one byte.
pub const FIRST_CODE: Code = EOF_CODE + 1;
/// Code size at the start of every epoch.
pub const MIN_CODESIZE: u8 = 9;
/// Code words never get wider than this.
pub const MAX_CODESIZE: u8 = 16;
/// Upper bound for the number of dictionary entries, the EOF slot included.
pub const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;

mod bits;
pub mod decode;
pub mod encode;
mod policy;
pub mod tst;

pub use crate::decode::Decoder;
pub use crate::encode::Encoder;

/// What happens when the dictionary is full at the widest code size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Keep the dictionary as is and encode the rest of the stream without new entries.
    Freeze,
    /// Discard the dictionary, reseed it with the single bytes and start over at 9 bits.
    Reset,
}

impl ResetPolicy {
    pub(crate) fn from_header(bit: Code) -> Self {
        if bit == 1 {
            ResetPolicy::Reset
        } else {
            ResetPolicy::Freeze
        }
    }

    pub(crate) fn header(self) -> Code {
        match self {
            ResetPolicy::Freeze => 0,
            ResetPolicy::Reset => 1,
        }
    }
}

impl Default for ResetPolicy {
    fn default() -> Self {
        ResetPolicy::Freeze
    }
}

/// The result of a coding operation on a pair of reader and writer.
#[must_use = "Contains a status with potential error information"]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Errors of the codec itself are reported with kind `InvalidData` or `UnexpectedEof` and
    /// carry the [`LzwError`] as their inner error.
    pub status: io::Result<()>,
}

/// The error kind of a failed coding operation.
#[derive(Debug, thiserror::Error)]
pub enum LzwError {
    /// The decoder read a code that is neither in its dictionary nor the one about to be defined.
    #[error("invalid code {code}, the next code to be defined is {next}")]
    InvalidCode { code: Code, next: u32 },
    /// The stream ended before the end code was read.
    #[error("no more data but no end marker detected")]
    UnexpectedEof,
    /// Reading or writing the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<LzwError> for io::Error {
    fn from(err: LzwError) -> Self {
        match err {
            LzwError::Io(err) => err,
            err @ LzwError::InvalidCode { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            err @ LzwError::UnexpectedEof => io::Error::new(io::ErrorKind::UnexpectedEof, err),
        }
    }
}
