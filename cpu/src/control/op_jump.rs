//! Microprograms for the jump opcodes.
//!
//! A taken jump ends with the target value moving from the external
//! bus into the PC, and never runs the trailing `advance_pc`; a jump
//! not taken advances the PC past the target cell instead.  The
//! flag-testing jumps read the flags register directly over its
//! dedicated lines; the comparing jumps stage one register value in
//! the IR and the other on internal bus 1, then compare the buses.

use crate::alarm::Alarm;
use crate::memory::MemoryUnit;
use crate::register::{FLAG_NEGATIVE, FLAG_NONZERO, FLAG_ZERO};

use super::ControlUnit;

impl ControlUnit {
    /// PC <- target, unconditionally.
    pub(super) fn op_jmp(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.pc_mut().store(&self.buses);
        Ok(())
    }

    pub(super) fn op_jn(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.branch_on_flag(FLAG_NEGATIVE, mem)
    }

    pub(super) fn op_jz(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.branch_on_flag(FLAG_ZERO, mem)
    }

    pub(super) fn op_jnz(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.branch_on_flag(FLAG_NONZERO, mem)
    }

    fn branch_on_flag(&mut self, flag: u32, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        if self.registers.flags().bit(flag) {
            self.registers.pc().read(&mut self.buses);
            mem.read(&mut self.buses)?;
            self.registers.pc_mut().store(&self.buses);
        } else {
            self.advance_pc();
        }
        Ok(())
    }

    pub(super) fn op_jeq(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.branch_on_comparison(|a, b| a == b, mem)
    }

    pub(super) fn op_jgt(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.branch_on_comparison(|a, b| a > b, mem)
    }

    pub(super) fn op_jlw(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.branch_on_comparison(|a, b| a < b, mem)
    }

    /// Fetch two register operands, compare them, and take or skip
    /// the jump.  The first register's value survives the later PC
    /// advances parked in the IR; the second waits on internal bus 1,
    /// which the advances do not touch.
    fn branch_on_comparison(
        &mut self,
        taken: fn(i32, i32) -> bool,
        mem: &mut MemoryUnit,
    ) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_read()?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.advance_pc();
        self.registers.ir().read(&mut self.buses);
        if taken(self.buses.ext.get(), self.buses.int1.get()) {
            self.registers.pc().read(&mut self.buses);
            mem.read(&mut self.buses)?;
            self.registers.pc_mut().store(&self.buses);
        } else {
            self.advance_pc();
        }
        Ok(())
    }
}
