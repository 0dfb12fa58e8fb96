//! SARC alarms.
//!
//! An alarm is a fatal condition: the simulated machine has asked
//! its hardware to do something impossible, and the run is aborted
//! with a diagnostic.  Running off the end of the opcode table is
//! NOT an alarm; that is a normal halt.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use base::prelude::Word;

/// A memory read or write failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadMemOp {
    /// The external bus carried this value where a readable address
    /// was expected.
    Read(Word),
    /// The external bus carried this value where a writeable address
    /// was expected (the latch phase of a store).
    Write(Word),
}

impl Display for BadMemOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            BadMemOp::Read(addr) => write!(f, "memory read from address {addr} failed"),
            BadMemOp::Write(addr) => write!(f, "memory write to address {addr} failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alarm {
    /// An address outside [0, memory size) reached the memory unit.
    MemoryFault(BadMemOp),
    /// The register selector carried a value which names no register
    /// in the file.
    BadRegisterSelector(Word),
}

impl Display for Alarm {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Alarm::MemoryFault(op) => write!(f, "memory fault: {op}"),
            Alarm::BadRegisterSelector(id) => {
                write!(f, "register selector holds {id}, which names no register")
            }
        }
    }
}

impl Error for Alarm {}

impl From<BadMemOp> for Alarm {
    fn from(op: BadMemOp) -> Alarm {
        Alarm::MemoryFault(op)
    }
}
