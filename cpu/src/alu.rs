//! The arithmetic-logic unit.
//!
//! Two operand slots fed from the internal buses, three operations.
//! The ALU computes in place and publishes results back onto an
//! internal bus on request; it never touches the flags register (the
//! control unit derives flags from the value it sees on the bus).

use base::prelude::Word;

use crate::bus::Buses;

#[derive(Debug, Default)]
pub struct Alu {
    slots: [Word; 2],
}

impl Alu {
    /// Load operand slot `slot` from internal bus 1.
    pub fn store(&mut self, slot: usize, buses: &Buses) {
        self.slots[slot] = buses.int1.get();
    }

    /// Load operand slot `slot` from internal bus 2.
    pub fn internal_store(&mut self, slot: usize, buses: &Buses) {
        self.slots[slot] = buses.int2.get();
    }

    /// Publish operand slot `slot` onto internal bus 1.
    pub fn read(&self, slot: usize, buses: &mut Buses) {
        buses.int1.put(self.slots[slot]);
    }

    /// Publish operand slot `slot` onto internal bus 2.
    pub fn internal_read(&self, slot: usize, buses: &mut Buses) {
        buses.int2.put(self.slots[slot]);
    }

    /// slot1 <- slot1 + 1.
    pub fn inc(&mut self) {
        self.slots[1] = self.slots[1].wrapping_add(1);
    }

    /// slot1 <- slot0 + slot1.
    pub fn add(&mut self) {
        self.slots[1] = self.slots[0].wrapping_add(self.slots[1]);
    }

    /// slot1 <- slot0 - slot1.
    pub fn sub(&mut self) {
        self.slots[1] = self.slots[0].wrapping_sub(self.slots[1]);
    }
}
