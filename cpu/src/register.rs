//! The register file and the demultiplexer which selects registers
//! by numeric id.
//!
//! A register is wired to the external bus and to exactly one of the
//! two internal buses.  Its four operations move its value to or
//! from those buses; no transformation ever happens inside a
//! register.  The file order is fixed at construction and defines
//! the register id space shared with the assembler (see
//! `base::types::REGISTER_NAMES`).

use serde::Serialize;

use base::prelude::{FLAGS, IR, NUM_GP_REGISTERS, PC, REGISTER_NAMES, Word};

use crate::bus::Buses;

/// Flags register bit positions.  ZERO and NONZERO are complementary
/// for the same result but kept as separate bits because separate
/// conditional-jump families test them.
pub const FLAG_ZERO: u32 = 0;
pub const FLAG_NEGATIVE: u32 = 1;
pub const FLAG_NONZERO: u32 = 2;

/// Which internal bus a register is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InternalBus {
    Int1,
    Int2,
}

#[derive(Debug)]
pub struct Register {
    name: &'static str,
    value: Word,
    internal: InternalBus,
}

impl Register {
    pub fn new(name: &'static str, internal: InternalBus) -> Register {
        Register {
            name,
            value: 0,
            internal,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Observe the current value without a bus transaction.  This is
    /// for tracing and tests; the machine itself only moves register
    /// values over the buses.
    pub fn value(&self) -> Word {
        self.value
    }

    /// Publish the value onto the external bus.
    pub fn read(&self, buses: &mut Buses) {
        buses.ext.put(self.value);
    }

    /// Overwrite the value from the external bus.
    pub fn store(&mut self, buses: &Buses) {
        self.value = buses.ext.get();
    }

    /// Publish the value onto the wired internal bus.
    pub fn internal_read(&self, buses: &mut Buses) {
        match self.internal {
            InternalBus::Int1 => buses.int1.put(self.value),
            InternalBus::Int2 => buses.int2.put(self.value),
        }
    }

    /// Overwrite the value from the wired internal bus.
    pub fn internal_store(&mut self, buses: &Buses) {
        self.value = match self.internal {
            InternalBus::Int1 => buses.int1.get(),
            InternalBus::Int2 => buses.int2.get(),
        };
    }

    /// Read a single bit.  Used by the control unit on the flags
    /// register only.
    pub fn bit(&self, bit: u32) -> bool {
        (self.value >> bit) & 1 == 1
    }

    /// Set or clear a single bit.  The flags register is the one
    /// register the control unit writes directly instead of going
    /// through a bus, matching the hardware's dedicated flag lines.
    pub fn set_bit(&mut self, bit: u32, set: bool) {
        if set {
            self.value |= 1 << bit;
        } else {
            self.value &= !(1 << bit);
        }
    }
}

/// The register-id-valued demultiplexer.  Whatever id was last `put`
/// names the target of the next file-wide read or write.
#[derive(Debug, Default)]
pub struct Selector {
    value: Word,
}

impl Selector {
    pub fn put(&mut self, value: Word) {
        self.value = value;
    }

    pub fn get(&self) -> Word {
        self.value
    }
}

/// All registers, in id order: R0-R3 (wired ext+int1), PC and IR
/// (ext+int2), FLAGS (int2).
#[derive(Debug)]
pub struct RegisterFile {
    regs: Vec<Register>,
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        let regs = REGISTER_NAMES
            .iter()
            .enumerate()
            .map(|(id, name)| {
                let wiring = if id < NUM_GP_REGISTERS {
                    InternalBus::Int1
                } else {
                    InternalBus::Int2
                };
                Register::new(name, wiring)
            })
            .collect();
        RegisterFile { regs }
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    pub fn get(&self, id: Word) -> Option<&Register> {
        usize::try_from(id).ok().and_then(|i| self.regs.get(i))
    }

    pub fn get_mut(&mut self, id: Word) -> Option<&mut Register> {
        usize::try_from(id).ok().and_then(|i| self.regs.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.regs.iter()
    }

    pub fn pc(&self) -> &Register {
        &self.regs[PC]
    }

    pub fn pc_mut(&mut self) -> &mut Register {
        &mut self.regs[PC]
    }

    pub fn ir(&self) -> &Register {
        &self.regs[IR]
    }

    pub fn ir_mut(&mut self) -> &mut Register {
        &mut self.regs[IR]
    }

    pub fn flags(&self) -> &Register {
        &self.regs[FLAGS]
    }

    pub fn flags_mut(&mut self) -> &mut Register {
        &mut self.regs[FLAGS]
    }
}

impl Default for RegisterFile {
    fn default() -> RegisterFile {
        RegisterFile::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{InternalBus, Register, RegisterFile};
    use crate::bus::Buses;

    #[test]
    fn external_read_and_store_use_the_external_bus() {
        let mut buses = Buses::default();
        let mut r = Register::new("R0", InternalBus::Int1);
        buses.ext.put(17);
        r.store(&buses);
        assert_eq!(r.value(), 17);
        buses.ext.put(0);
        r.read(&mut buses);
        assert_eq!(buses.ext.get(), 17);
    }

    #[test]
    fn internal_transfers_use_the_wired_bus_only() {
        let mut buses = Buses::default();
        let mut r = Register::new("PC", InternalBus::Int2);
        buses.int1.put(1);
        buses.int2.put(2);
        r.internal_store(&buses);
        assert_eq!(r.value(), 2);
        r.internal_read(&mut buses);
        assert_eq!(buses.int2.get(), 2);
        assert_eq!(buses.int1.get(), 1);
    }

    #[test]
    fn file_order_defines_ids() {
        let file = RegisterFile::new();
        assert_eq!(file.len(), 7);
        assert_eq!(file.get(0).map(Register::name), Some("R0"));
        assert_eq!(file.get(4).map(Register::name), Some("PC"));
        assert_eq!(file.get(6).map(Register::name), Some("FLAGS"));
        assert!(file.get(7).is_none());
        assert!(file.get(-1).is_none());
    }

    #[test]
    fn flag_bits() {
        let mut flags = Register::new("FLAGS", InternalBus::Int2);
        flags.set_bit(super::FLAG_NEGATIVE, true);
        assert!(!flags.bit(super::FLAG_ZERO));
        assert!(flags.bit(super::FLAG_NEGATIVE));
        flags.set_bit(super::FLAG_NEGATIVE, false);
        assert!(!flags.bit(super::FLAG_NEGATIVE));
    }
}
