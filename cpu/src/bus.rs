//! The signal buses.
//!
//! A bus is a single-slot value holder: `put` unconditionally
//! overwrites, `get` returns whatever was written last.  There is no
//! history and no ownership; the component which wrote last "owns"
//! the value until somebody else writes.  Every inter-component
//! transfer in the machine goes through one of the three buses in
//! [`Buses`], which is threaded explicitly through each microprogram
//! step rather than hidden in a global.

use base::prelude::Word;

#[derive(Debug, Default)]
pub struct Bus {
    value: Word,
}

impl Bus {
    pub fn put(&mut self, value: Word) {
        self.value = value;
    }

    pub fn get(&self) -> Word {
        self.value
    }
}

/// The machine's three buses.
///
/// `ext` connects the memory to the register-file/ALU side of the
/// machine; `int1` carries general-purpose-register to ALU traffic
/// and `int2` carries PC/IR to ALU traffic.
#[derive(Debug, Default)]
pub struct Buses {
    pub ext: Bus,
    pub int1: Bus,
    pub int2: Bus,
}
