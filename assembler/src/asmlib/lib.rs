//! Assembler for the SARC machine.
//!
//! The source dialect is line-oriented: a line is either blank, a
//! label declaration (`name:`), a variable declaration (a bare
//! identifier), or an instruction (a family mnemonic followed by
//! whitespace-separated operands).  Operand prefixes carry the
//! addressing shape: `%` names a register, `&` names a memory
//! symbol, and an unprefixed integer is an immediate.  Assembly is
//! two passes: pass one parses every line and records symbol
//! definitions; pass two allocates variable storage from the top of
//! memory downward and resolves every symbolic cell to an address.
#![deny(unreachable_pub)]
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::wildcard_imports)]
#![warn(clippy::match_same_arms)]

mod driver;
mod lexer;
mod parser;
mod symtab;
mod types;

pub use driver::{assemble_file, assemble_source, OutputOptions};
pub use types::AssemblerFailure;
