//! The control unit.
//!
//! The control unit drives the fetch-decode-execute cycle.  It does
//! not interpret opcodes directly: each opcode has a microprogram (a
//! fixed sequence of bus transactions, one `op_*` method per opcode,
//! grouped by family in the submodules) which reproduces the data
//! movement the real circuit would perform.  Correctness rests
//! entirely on the ordering of those transactions, so nothing here
//! may be reordered without consulting the wiring.

use tracing::{Level, event};

mod op_arith;
mod op_jump;
mod op_move;

#[cfg(test)]
mod tests;

use base::prelude::{DecodeError, ObjectImage, Opcode, Word};

use crate::alarm::Alarm;
use crate::alu::Alu;
use crate::bus::Buses;
use crate::memory::MemoryUnit;
use crate::observer::{
    FlagsSnapshot, MachineSnapshot, NullObserver, Observer, RegisterSnapshot,
};
use crate::register::{
    FLAG_NEGATIVE, FLAG_NONZERO, FLAG_ZERO, RegisterFile, Selector,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Running,
    /// Terminal: the machine fetched a value outside the opcode
    /// table (normally the image sentinel).
    Halted,
}

#[derive(Debug)]
pub struct ControlUnit {
    buses: Buses,
    registers: RegisterFile,
    alu: Alu,
    selector: Selector,
    run_mode: RunMode,
}

impl ControlUnit {
    pub fn new() -> ControlUnit {
        ControlUnit {
            buses: Buses::default(),
            registers: RegisterFile::new(),
            alu: Alu::default(),
            selector: Selector::default(),
            run_mode: RunMode::Running,
        }
    }

    /// Load an object image through the ordinary bus protocol.
    pub fn load_image(
        &mut self,
        mem: &mut MemoryUnit,
        image: &ObjectImage,
    ) -> Result<(), Alarm> {
        mem.load(&mut self.buses, image)?;
        Ok(())
    }

    /// Run until the machine halts or an alarm fires.
    pub fn run(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.run_with_observer(mem, &mut NullObserver)
    }

    pub fn run_with_observer(
        &mut self,
        mem: &mut MemoryUnit,
        observer: &mut dyn Observer,
    ) -> Result<(), Alarm> {
        while self.step(mem, observer)? == RunMode::Running {}
        Ok(())
    }

    /// One full fetch-decode-execute cycle.
    pub fn step(
        &mut self,
        mem: &mut MemoryUnit,
        observer: &mut dyn Observer,
    ) -> Result<RunMode, Alarm> {
        if self.run_mode == RunMode::Halted {
            return Ok(RunMode::Halted);
        }
        self.fetch(mem)?;
        observer.instruction_fetched(self.registers.pc().value(), self.registers.ir().value());
        match self.decode() {
            Ok(opcode) => {
                event!(Level::TRACE, "executing {}", opcode);
                self.execute(opcode, mem)?;
                observer.instruction_executed(&self.snapshot(Some(opcode)));
            }
            Err(DecodeError::Reserved(w)) => {
                // The multiply family is reserved on purpose; say so
                // rather than dying silently.
                event!(
                    Level::WARN,
                    "halting: opcode {w} is reserved and unimplemented"
                );
                self.run_mode = RunMode::Halted;
            }
            Err(DecodeError::Unknown(w)) => {
                event!(Level::DEBUG, "halting: fetched {w}, not an opcode");
                self.run_mode = RunMode::Halted;
            }
        }
        Ok(self.run_mode)
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// PC value -> external bus -> memory read -> IR store.
    fn fetch(&mut self, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        self.registers.pc().read(&mut self.buses);
        mem.read(&mut self.buses)?;
        self.registers.ir_mut().store(&self.buses);
        Ok(())
    }

    /// The IR value, read internally, selects the microprogram.
    fn decode(&mut self) -> Result<Opcode, DecodeError> {
        self.registers.ir().internal_read(&mut self.buses);
        Opcode::try_from(self.buses.int2.get())
    }

    fn execute(&mut self, opcode: Opcode, mem: &mut MemoryUnit) -> Result<(), Alarm> {
        match opcode {
            Opcode::AddRegReg => self.op_add_reg_reg(mem),
            Opcode::AddMemReg => self.op_add_mem_reg(mem),
            Opcode::AddRegMem => self.op_add_reg_mem(mem),
            Opcode::AddImmMem => self.op_add_imm_mem(mem),
            Opcode::SubRegReg => self.op_sub_reg_reg(mem),
            Opcode::SubMemReg => self.op_sub_mem_reg(mem),
            Opcode::SubRegMem => self.op_sub_reg_mem(mem),
            Opcode::SubImmMem => self.op_sub_imm_mem(mem),
            Opcode::MoveMemReg => self.op_move_mem_reg(mem),
            Opcode::MoveRegMem => self.op_move_reg_mem(mem),
            Opcode::MoveRegReg => self.op_move_reg_reg(mem),
            Opcode::MoveImmReg => self.op_move_imm_reg(mem),
            Opcode::IncReg => self.op_inc_reg(mem),
            Opcode::IncMem => self.op_inc_mem(mem),
            Opcode::Jmp => self.op_jmp(mem),
            Opcode::Jn => self.op_jn(mem),
            Opcode::Jz => self.op_jz(mem),
            Opcode::Jnz => self.op_jnz(mem),
            Opcode::Jeq => self.op_jeq(mem),
            Opcode::Jgt => self.op_jgt(mem),
            Opcode::Jlw => self.op_jlw(mem),
            Opcode::Ldi => self.op_ldi(mem),
        }
    }

    /// The five-transaction PC-advance idiom: PC moves internally
    /// into the ALU, is incremented, and moves back.  Invoked once
    /// per operand consumed and once more at the end of every
    /// non-jumping microprogram.  Clobbers ALU slot 1.
    fn advance_pc(&mut self) {
        self.registers.pc().internal_read(&mut self.buses);
        self.alu.internal_store(1, &self.buses);
        self.alu.inc();
        self.alu.internal_read(1, &mut self.buses);
        self.registers.pc_mut().internal_store(&self.buses);
    }

    // Register-file dispatch: the four file-wide operations, each
    // addressed to whichever register the selector currently names.

    fn registers_read(&mut self) -> Result<(), Alarm> {
        let id = self.selector.get();
        match self.registers.get(id) {
            Some(reg) => {
                reg.read(&mut self.buses);
                Ok(())
            }
            None => Err(Alarm::BadRegisterSelector(id)),
        }
    }

    fn registers_internal_read(&mut self) -> Result<(), Alarm> {
        let id = self.selector.get();
        match self.registers.get(id) {
            Some(reg) => {
                reg.internal_read(&mut self.buses);
                Ok(())
            }
            None => Err(Alarm::BadRegisterSelector(id)),
        }
    }

    fn registers_store(&mut self) -> Result<(), Alarm> {
        let id = self.selector.get();
        match self.registers.get_mut(id) {
            Some(reg) => {
                reg.store(&self.buses);
                Ok(())
            }
            None => Err(Alarm::BadRegisterSelector(id)),
        }
    }

    fn registers_internal_store(&mut self) -> Result<(), Alarm> {
        let id = self.selector.get();
        match self.registers.get_mut(id) {
            Some(reg) => {
                reg.internal_store(&self.buses);
                Ok(())
            }
            None => Err(Alarm::BadRegisterSelector(id)),
        }
    }

    /// Recompute the flags register from an increment result.  ZERO
    /// and NONZERO are complementary bits; two different jump
    /// families test them.
    fn set_status_flags(&mut self, result: Word) {
        let flags = self.registers.flags_mut();
        flags.set_bit(FLAG_ZERO, result == 0);
        flags.set_bit(FLAG_NEGATIVE, result < 0);
        flags.set_bit(FLAG_NONZERO, result != 0);
    }

    /// Observe a register by id (tracing and tests only).
    pub fn register_value(&self, id: Word) -> Option<Word> {
        self.registers.get(id).map(|r| r.value())
    }

    pub fn snapshot(&self, executed: Option<Opcode>) -> MachineSnapshot {
        let flags = self.registers.flags();
        MachineSnapshot {
            executed,
            registers: self
                .registers
                .iter()
                .map(|r| RegisterSnapshot {
                    name: r.name(),
                    value: r.value(),
                })
                .collect(),
            flags: FlagsSnapshot {
                zero: flags.bit(FLAG_ZERO),
                negative: flags.bit(FLAG_NEGATIVE),
                nonzero: flags.bit(FLAG_NONZERO),
            },
            ext_bus: self.buses.ext.get(),
            int1_bus: self.buses.int1.get(),
            int2_bus: self.buses.int2.get(),
        }
    }
}

impl Default for ControlUnit {
    fn default() -> ControlUnit {
        ControlUnit::new()
    }
}
