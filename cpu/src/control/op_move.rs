//! Microprograms for the data-movement opcodes: the four move shapes
//! and ldi.  Same layout conventions as the arithmetic family, minus
//! the ALU (moves never transform the value, so everything travels
//! over the buses and the IR parking spot).

use crate::alarm::Alarm;
use crate::memory::MemoryUnit;

use super::ControlUnit;

impl ControlUnit {
    /// dest <- mem.
    pub(super) fn op_move_mem_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers.ir().read(&mut self.buses);
        self.registers_store()?;
        self.advance_pc();
        Ok(())
    }

    /// mem <- src.  The register id is held in the selector across
    /// the advance while the destination address is latched, so the
    /// value can travel straight from the file to the write phase.
    pub(super) fn op_move_reg_mem(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        mem.store(&self.buses)?;
        self.registers_read()?;
        mem.store(&self.buses)?;
        self.advance_pc();
        Ok(())
    }

    /// dest <- src, both registers.  The source value waits on
    /// internal bus 1 while the destination id is fetched.
    pub(super) fn op_move_reg_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.advance_pc();
        self.selector.put(self.buses.ext.get());
        self.registers_internal_read()?;
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers_internal_store()?;
        self.advance_pc();
        Ok(())
    }

    /// dest <- imm.
    pub(super) fn op_move_imm_reg(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.registers.ir().read(&mut self.buses);
        self.registers_store()?;
        self.advance_pc();
        Ok(())
    }

    /// dest <- imm, register-first operand order.  The immediate goes
    /// straight from the external bus into the file without the IR
    /// detour because the selector already names the destination.
    pub(super) fn op_ldi(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.selector.put(self.buses.ext.get());
        self.advance_pc();
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers_store()?;
        self.advance_pc();
        Ok(())
    }
}
