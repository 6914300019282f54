//! The code size and reset policy shared by encoder and decoder.
//!
//! Neither side stores the code width in the stream. Both keep one `Policy` value and advance it
//! by the same steps at the same stream positions, so any change here changes the format.
use crate::{Code, ResetPolicy, FIRST_CODE, MAX_CODESIZE, MIN_CODESIZE};

pub(crate) struct Policy {
    /// The current code length.
    code_size: u8,
    /// The next code to be assigned. Equal to `max_code` once the dictionary is full.
    next_code: u32,
    reset: ResetPolicy,
}

/// What `settle` did to the code state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Room is left at the current code size.
    Stay,
    /// The code size was bumped by one bit.
    Grow,
    /// The dictionary is to be reseeded; the code state is back at its initial values.
    Reset,
    /// The dictionary is full for good, no more codes will be assigned.
    Freeze,
}

impl Policy {
    pub(crate) fn new(reset: ResetPolicy) -> Self {
        Policy {
            code_size: MIN_CODESIZE,
            next_code: u32::from(FIRST_CODE),
            reset,
        }
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }

    /// The number of codes representable with the current code size.
    pub(crate) fn max_code(&self) -> u32 {
        1 << self.code_size
    }

    /// Take the next free code, if the dictionary is not full.
    pub(crate) fn assign(&mut self) -> Option<Code> {
        if self.next_code < self.max_code() {
            let code = self.next_code as Code;
            self.next_code += 1;
            Some(code)
        } else {
            None
        }
    }

    /// Apply the growth and reset rules after a code was assigned.
    pub(crate) fn settle(&mut self) -> Transition {
        if self.next_code < self.max_code() {
            return Transition::Stay;
        }

        if self.code_size < MAX_CODESIZE {
            self.code_size += 1;
            tracing::trace!(code_size = self.code_size, "growing code size");
            Transition::Grow
        } else if self.reset == ResetPolicy::Reset {
            *self = Policy::new(self.reset);
            Transition::Reset
        } else {
            tracing::trace!("dictionary full, freezing");
            Transition::Freeze
        }
    }

    /// Assign and settle in one step, for the slot the decoder expects to be filled.
    pub(crate) fn reserve(&mut self) -> Option<(Code, Transition)> {
        let code = self.assign()?;
        Some((code, self.settle()))
    }
}
