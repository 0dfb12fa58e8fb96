//! The prelude exports the types which almost every user of the base
//! crate needs: the machine word, the opcode table and the register
//! id space.
pub use super::image::{ImageError, ObjectImage};
pub use super::instruction::{DecodeError, MNEMONICS, Opcode};
pub use super::types::*;
