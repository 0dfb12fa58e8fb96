//! Microprograms for the arithmetic opcode families: the four
//! addressing shapes of add and sub, and the two shapes of inc.
//!
//! Layout conventions shared by every routine here:
//!
//! - the PC still addresses the opcode cell on entry, so the first
//!   transaction block is an `advance_pc`;
//! - operand values that must survive an `advance_pc` are parked in
//!   ALU slot 0 or in the IR, never in slot 1 (the advance clobbers
//!   it);
//! - for two-operand forms the destination ends up in the slot the
//!   operation reads first, so subtraction is always destination
//!   minus source.

use crate::alarm::Alarm;
use crate::memory::MemoryUnit;

use super::ControlUnit;

impl ControlUnit {
    /// dest <- dest + src, both registers; the destination is the
    /// first operand.  Its id is parked in the IR so the result can
    /// be steered back to it after the source register is fetched.
    pub(super) fn op_add_reg_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(0, &self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(1, &self.buses);
        self.alu.add();
        self.registers.ir().read(&mut self.buses);
        self.selector.put(self.buses.ext.get());
        self.alu.read(1, &mut self.buses);
        self.registers_internal_store()?;
        self.advance_pc();
        Ok(())
    }

    /// dest <- dest - src, both registers; same layout as register
    /// add, with the destination in slot 0.
    pub(super) fn op_sub_reg_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(0, &self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(1, &self.buses);
        self.alu.sub();
        self.registers.ir().read(&mut self.buses);
        self.selector.put(self.buses.ext.get());
        self.alu.read(1, &mut self.buses);
        self.registers_internal_store()?;
        self.advance_pc();
        Ok(())
    }

    /// dest <- mem + dest.  The memory operand is dereferenced first
    /// and parked in the IR across the second PC advance.
    pub(super) fn op_add_mem_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(1, &self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(0, &self.buses);
        self.alu.add();
        self.alu.read(1, &mut self.buses);
        self.registers_internal_store()?;
        self.advance_pc();
        Ok(())
    }

    /// dest <- dest - mem.
    pub(super) fn op_sub_mem_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(0, &self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(1, &self.buses);
        self.alu.sub();
        self.alu.read(1, &mut self.buses);
        self.registers_internal_store()?;
        self.advance_pc();
        Ok(())
    }

    /// mem <- mem + src.  The destination address is latched into the
    /// memory unit before being dereferenced, so the write phase at
    /// the end needs only the result on the bus.
    pub(super) fn op_add_reg_mem(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.store(&self.buses)?;
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(0, &self.buses);
        self.registers_internal_read()?;
        self.alu.store(1, &self.buses);
        self.alu.add();
        self.alu.internal_read(1, &mut self.buses);
        self.registers.ir_mut().internal_store(&self.buses);
        self.registers.ir().read(&mut self.buses);
        mem.store(&self.buses)?;
        self.advance_pc();
        Ok(())
    }

    /// mem <- mem - src.
    pub(super) fn op_sub_reg_mem(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.store(&self.buses)?;
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(0, &self.buses);
        self.registers_internal_read()?;
        self.alu.store(1, &self.buses);
        self.alu.sub();
        self.alu.internal_read(1, &mut self.buses);
        self.registers.ir_mut().internal_store(&self.buses);
        self.registers.ir().read(&mut self.buses);
        mem.store(&self.buses)?;
        self.advance_pc();
        Ok(())
    }

    /// mem <- mem + imm.  The immediate is parked in the IR across
    /// the second advance, then moved to slot 1 before the IR is
    /// reused for the dereferenced destination.
    pub(super) fn op_add_imm_mem(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.store(&self.buses)?;
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(1, &self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(0, &self.buses);
        self.alu.add();
        self.alu.internal_read(1, &mut self.buses);
        self.registers.ir_mut().internal_store(&self.buses);
        self.registers.ir().read(&mut self.buses);
        mem.store(&self.buses)?;
        self.advance_pc();
        Ok(())
    }

    /// mem <- mem - imm.
    pub(super) fn op_sub_imm_mem(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.store(&self.buses)?;
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(1, &self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(0, &self.buses);
        self.alu.sub();
        self.alu.internal_read(1, &mut self.buses);
        self.registers.ir_mut().internal_store(&self.buses);
        self.registers.ir().read(&mut self.buses);
        mem.store(&self.buses)?;
        self.advance_pc();
        Ok(())
    }

    /// reg <- reg + 1, updating the flags from the result on the bus.
    pub(super) fn op_inc_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.alu.store(1, &self.buses);
        self.alu.inc();
        self.alu.read(1, &mut self.buses);
        self.set_status_flags(self.buses.int1.get());
        self.registers_internal_store()?;
        self.advance_pc();
        Ok(())
    }

    /// mem <- mem + 1, updating the flags from the result on the bus.
    pub(super) fn op_inc_mem(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.store(&self.buses)?;
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.registers.ir().internal_read(&mut self.buses);
        self.alu.internal_store(1, &self.buses);
        self.alu.inc();
        self.alu.internal_read(1, &mut self.buses);
        self.set_status_flags(self.buses.int2.get());
        self.registers.ir_mut().internal_store(&self.buses);
        self.registers.ir().read(&mut self.buses);
        mem.store(&self.buses)?;
        self.advance_pc();
        Ok(())
    }
}
