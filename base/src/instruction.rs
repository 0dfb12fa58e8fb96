//! The SARC opcode table.
//!
//! The machine-language encoding is one cell for the opcode followed
//! by 0-3 operand cells.  The numeric opcode assignments here are a
//! contract shared with the assembler: both sides must agree on them
//! exactly, so nothing in this table may be reordered.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::types::Word;

/// The full mnemonic table, indexed by opcode number.  Ids 8-10 (the
/// `imul` family) are reserved: they appear in the table so that the
/// numbering of the later opcodes is fixed, but the control unit has
/// no microprogram for them.
pub const MNEMONICS: [&str; 25] = [
    "addRegReg", // 0
    "addMemReg", // 1
    "addRegMem", // 2
    "addImmMem", // 3
    "subRegReg", // 4
    "subMemReg", // 5
    "subRegMem", // 6
    "subImmMem", // 7
    "imulMemReg", // 8 (reserved, unimplemented)
    "imulRegMem", // 9 (reserved, unimplemented)
    "imulRegReg", // 10 (reserved, unimplemented)
    "moveMemReg", // 11
    "moveRegMem", // 12
    "moveRegReg", // 13
    "moveImmReg", // 14
    "incReg",    // 15
    "incMem",    // 16
    "jmp",       // 17
    "jn",        // 18
    "jz",        // 19
    "jnz",       // 20
    "jeq",       // 21
    "jgt",       // 22
    "jlw",       // 23
    "ldi",       // 24
];

/// The opcodes the machine can execute.
///
/// The reserved multiply family (8-10) deliberately has no
/// enumerator; decoding one of those values yields
/// [`DecodeError::Reserved`] so that the omission is visible as a
/// decision rather than an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    AddRegReg = 0,
    AddMemReg = 1,
    AddRegMem = 2,
    AddImmMem = 3,
    SubRegReg = 4,
    SubMemReg = 5,
    SubRegMem = 6,
    SubImmMem = 7,
    // opcodes 8-10 are the reserved imul family.
    MoveMemReg = 11,
    MoveRegMem = 12,
    MoveRegReg = 13,
    MoveImmReg = 14,
    IncReg = 15,
    IncMem = 16,
    Jmp = 17,
    Jn = 18,
    Jz = 19,
    Jnz = 20,
    Jeq = 21,
    Jgt = 22,
    Jlw = 23,
    Ldi = 24,
}

impl Opcode {
    pub fn number(&self) -> Word {
        *self as Word
    }

    pub fn mnemonic(&self) -> &'static str {
        MNEMONICS[*self as usize]
    }

    /// The number of operand cells following the opcode cell.
    pub fn operand_count(&self) -> usize {
        use Opcode::*;
        match self {
            AddRegReg | AddMemReg | AddRegMem | AddImmMem | SubRegReg | SubMemReg | SubRegMem
            | SubImmMem | MoveMemReg | MoveRegMem | MoveRegReg | MoveImmReg | Ldi => 2,
            IncReg | IncMem | Jmp | Jn | Jz | Jnz => 1,
            Jeq | Jgt | Jlw => 3,
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.mnemonic())
    }
}

/// Failure to decode a word as an opcode.
///
/// Neither case is an execution error: the control unit treats both
/// as a halt condition, since running off the end of a program
/// fetches the image sentinel (which decodes as `Unknown`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeError {
    /// The value names the reserved (unimplemented) multiply family.
    Reserved(Word),
    /// The value is not in the opcode table at all.
    Unknown(Word),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            DecodeError::Reserved(w) => write!(
                f,
                "opcode {w} ({}) is reserved and deliberately unimplemented",
                MNEMONICS[*w as usize]
            ),
            DecodeError::Unknown(w) => write!(f, "value {w} is not in the opcode table"),
        }
    }
}

impl Error for DecodeError {}

impl TryFrom<Word> for Opcode {
    type Error = DecodeError;

    fn try_from(w: Word) -> Result<Opcode, DecodeError> {
        use Opcode::*;
        match w {
            0 => Ok(AddRegReg),
            1 => Ok(AddMemReg),
            2 => Ok(AddRegMem),
            3 => Ok(AddImmMem),
            4 => Ok(SubRegReg),
            5 => Ok(SubMemReg),
            6 => Ok(SubRegMem),
            7 => Ok(SubImmMem),
            8..=10 => Err(DecodeError::Reserved(w)),
            11 => Ok(MoveMemReg),
            12 => Ok(MoveRegMem),
            13 => Ok(MoveRegReg),
            14 => Ok(MoveImmReg),
            15 => Ok(IncReg),
            16 => Ok(IncMem),
            17 => Ok(Jmp),
            18 => Ok(Jn),
            19 => Ok(Jz),
            20 => Ok(Jnz),
            21 => Ok(Jeq),
            22 => Ok(Jgt),
            23 => Ok(Jlw),
            24 => Ok(Ldi),
            _ => Err(DecodeError::Unknown(w)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, MNEMONICS, Opcode};
    use crate::types::Word;

    #[test]
    fn opcode_numbers_match_table_positions() {
        for (number, mnemonic) in MNEMONICS.iter().enumerate() {
            let w = number as Word;
            match Opcode::try_from(w) {
                Ok(op) => {
                    assert_eq!(op.number(), w);
                    assert_eq!(op.mnemonic(), *mnemonic);
                }
                Err(DecodeError::Reserved(r)) => {
                    assert_eq!(r, w);
                    assert!((8..=10).contains(&number), "unexpected reserved id {number}");
                }
                Err(DecodeError::Unknown(u)) => {
                    panic!("table entry {u} should decode or be reserved");
                }
            }
        }
    }

    #[test]
    fn out_of_table_values_are_unknown() {
        assert_eq!(Opcode::try_from(-1), Err(DecodeError::Unknown(-1)));
        assert_eq!(Opcode::try_from(25), Err(DecodeError::Unknown(25)));
        assert_eq!(Opcode::try_from(1000), Err(DecodeError::Unknown(1000)));
    }

    #[test]
    fn operand_counts() {
        assert_eq!(Opcode::AddRegReg.operand_count(), 2);
        assert_eq!(Opcode::IncMem.operand_count(), 1);
        assert_eq!(Opcode::Jmp.operand_count(), 1);
        assert_eq!(Opcode::Jeq.operand_count(), 3);
        assert_eq!(Opcode::Ldi.operand_count(), 2);
    }
}
