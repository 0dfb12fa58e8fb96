//! Whole-machine tests: load a raw-word program image, run it to the
//! halt, and check the architectural state.

use proptest::prelude::*;

use base::prelude::{ObjectImage, Word};

use super::{ControlUnit, RunMode};
use crate::alarm::{Alarm, BadMemOp};
use crate::memory::{MemoryConfiguration, MemoryUnit};
use crate::observer::{MachineSnapshot, Observer};

/// Load `words` at address 0 and run until the machine halts.
fn run_words(words: Vec<Word>, size: usize) -> Result<(ControlUnit, MemoryUnit), Alarm> {
    let mut cpu = ControlUnit::new();
    let mut mem = MemoryUnit::new(&MemoryConfiguration { size });
    cpu.load_image(&mut mem, &ObjectImage::new(words))?;
    cpu.run(&mut mem)?;
    Ok((cpu, mem))
}

fn reg(cpu: &ControlUnit, id: Word) -> Word {
    cpu.register_value(id).expect("register id in range")
}

#[test]
fn ldi_loads_a_register_and_the_sentinel_halts_the_machine() {
    let (cpu, _) = run_words(vec![24, 0, 5], 16).expect("program runs");
    assert_eq!(reg(&cpu, 0), 5);
    assert_eq!(cpu.run_mode(), RunMode::Halted);
    // The halting fetch does not advance the PC past the sentinel.
    assert_eq!(cpu.register_value(base::prelude::PC as Word), Some(3));
}

proptest! {
    #[test]
    fn register_add_matches_wrapping_native_addition(a in any::<i32>(), b in any::<i32>()) {
        // ldi R0 a; ldi R1 b; addRegReg R0 R1  =>  R0 = R0 + R1
        let (cpu, _) = run_words(vec![24, 0, a, 24, 1, b, 0, 0, 1], 16)
            .expect("program runs");
        prop_assert_eq!(reg(&cpu, 0), a.wrapping_add(b));
        prop_assert_eq!(reg(&cpu, 1), b);
    }

    #[test]
    fn register_sub_is_destination_minus_source(a in any::<i32>(), b in any::<i32>()) {
        // ldi R0 a; ldi R1 b; subRegReg R0 R1  =>  R0 = R0 - R1
        let (cpu, _) = run_words(vec![24, 0, a, 24, 1, b, 4, 0, 1], 16)
            .expect("program runs");
        prop_assert_eq!(reg(&cpu, 0), a.wrapping_sub(b));
        prop_assert_eq!(reg(&cpu, 1), b);
    }
}

#[test]
fn memory_operands_are_dereferenced_through_their_address_cell() {
    // Cell 4 holds the address 10; cell 10 holds the value 20.
    // ldi R0 3; addMemReg [10] R0  =>  R0 = 20 + 3.
    let words = vec![24, 0, 3, 1, 10, 0, 99, 0, 0, 0, 20];
    let (cpu, mem) = run_words(words, 16).expect("program runs");
    assert_eq!(reg(&cpu, 0), 23);
    // One read per fetch (3) plus the ldi operands (2) plus the
    // addMemReg operands: address cell, dereference, register id (3).
    assert_eq!(mem.reads(), 8);
}

#[test]
fn stores_to_memory_operands_land_in_the_addressed_cell() {
    // ldi R0 7; moveRegMem R0 [14]; addImmMem 5 [14]; subImmMem 2 [14]
    let words = vec![24, 0, 7, 12, 0, 14, 3, 5, 14, 7, 2, 14];
    let (_, mem) = run_words(words, 16).expect("program runs");
    assert_eq!(mem.get(14), Some(10));
}

#[test]
fn move_between_registers_and_from_memory() {
    // Cell 13 holds 31.  moveMemReg [13] R0; moveRegReg R0 R2;
    // moveImmReg -4 R1.
    let words = vec![11, 13, 0, 13, 0, 2, 14, -4, 1, 99, 0, 0, 0, 31];
    let (cpu, _) = run_words(words, 16).expect("program runs");
    assert_eq!(reg(&cpu, 0), 31);
    assert_eq!(reg(&cpu, 2), 31);
    assert_eq!(reg(&cpu, 1), -4);
}

#[test]
fn inc_to_zero_sets_zero_and_clears_negative_and_nonzero() {
    let (cpu, _) = run_words(vec![24, 0, -1, 15, 0], 16).expect("program runs");
    assert_eq!(reg(&cpu, 0), 0);
    let flags = cpu.snapshot(None).flags;
    assert!(flags.zero);
    assert!(!flags.negative);
    assert!(!flags.nonzero);
}

#[test]
fn inc_to_a_negative_value_sets_negative_and_nonzero() {
    let (cpu, _) = run_words(vec![24, 0, -3, 15, 0], 16).expect("program runs");
    assert_eq!(reg(&cpu, 0), -2);
    let flags = cpu.snapshot(None).flags;
    assert!(!flags.zero);
    assert!(flags.negative);
    assert!(flags.nonzero);
}

#[test]
fn inc_mem_updates_the_cell_and_the_flags() {
    // incMem [5]; cell 5 holds -1.
    let words = vec![16, 5, 99, 0, 0, -1];
    let (cpu, mem) = run_words(words, 16).expect("program runs");
    assert_eq!(mem.get(5), Some(0));
    assert!(cpu.snapshot(None).flags.zero);
}

#[test]
fn jmp_is_unconditional_and_skips_nothing_it_should_not() {
    // jmp 3; (cell 2 would be an invalid fetch); ldi R0 1.
    let (cpu, _) = run_words(vec![17, 3, 99, 24, 0, 1], 16).expect("program runs");
    assert_eq!(reg(&cpu, 0), 1);
}

#[test]
fn jz_taken_after_an_increment_to_zero() {
    // ldi R0 -1; incReg R0; jz 9; (filler); ldi R1 7.
    let words = vec![24, 0, -1, 15, 0, 19, 9, 99, 99, 24, 1, 7];
    let (cpu, _) = run_words(words, 16).expect("program runs");
    assert_eq!(reg(&cpu, 1), 7);
}

#[test]
fn jnz_not_taken_falls_through_past_the_target_cell() {
    // ldi R0 -1; incReg R0; jnz 9; ldi R1 5.
    let words = vec![24, 0, -1, 15, 0, 20, 9, 24, 1, 5];
    let (cpu, _) = run_words(words, 16).expect("program runs");
    assert_eq!(reg(&cpu, 1), 5);
}

#[test]
fn jn_taken_after_an_increment_to_a_negative_value() {
    let words = vec![24, 0, -5, 15, 0, 18, 9, 99, 99, 24, 1, 3];
    let (cpu, _) = run_words(words, 16).expect("program runs");
    assert_eq!(reg(&cpu, 1), 3);
}

#[test]
fn jeq_compares_the_two_named_registers() {
    // ldi R0 4; ldi R1 4; jeq R0 R1 13; (filler); ldi R2 1.
    let words = vec![24, 0, 4, 24, 1, 4, 21, 0, 1, 13, 99, 99, 99, 24, 2, 1];
    let (cpu, _) = run_words(words, 32).expect("program runs");
    assert_eq!(reg(&cpu, 2), 1);
}

#[test]
fn jgt_taken_when_first_exceeds_second() {
    let words = vec![24, 0, 5, 24, 1, 3, 22, 0, 1, 13, 99, 99, 99, 24, 2, 1];
    let (cpu, _) = run_words(words, 32).expect("program runs");
    assert_eq!(reg(&cpu, 2), 1);
}

#[test]
fn jlw_not_taken_falls_through_to_the_next_instruction() {
    // 5 < 3 is false, so execution continues at the cell after the
    // target operand.
    let words = vec![24, 0, 5, 24, 1, 3, 23, 0, 1, 13, 24, 2, 9];
    let (cpu, _) = run_words(words, 32).expect("program runs");
    assert_eq!(reg(&cpu, 2), 9);
}

#[test]
fn arithmetic_into_a_variable_cell() {
    // The assembler places variables at the top of memory; this is
    // the machine-language shape of "ldi %0 5; ldi %1 3; add %0 %1;
    // move %0 &x" with x at cell 127.
    let words = vec![24, 0, 5, 24, 1, 3, 0, 0, 1, 12, 0, 127];
    let (_, mem) = run_words(words, 128).expect("program runs");
    assert_eq!(mem.get(127), Some(8));
}

#[test]
fn fetch_outside_memory_is_an_alarm_not_a_halt() {
    let result = run_words(vec![17, 1000], 128);
    assert_eq!(
        result.err(),
        Some(Alarm::MemoryFault(BadMemOp::Read(1000)))
    );
}

#[test]
fn an_operand_naming_no_register_is_an_alarm() {
    let result = run_words(vec![0, 9, 0], 16);
    assert_eq!(result.err(), Some(Alarm::BadRegisterSelector(9)));
}

#[test]
fn reserved_opcodes_halt_without_an_alarm() {
    let (cpu, _) = run_words(vec![8], 16).expect("reserved opcode halts normally");
    assert_eq!(cpu.run_mode(), RunMode::Halted);
}

#[test]
fn an_observer_sees_each_executed_instruction_and_nothing_after_the_halt() {
    #[derive(Default)]
    struct CountingObserver {
        fetched: usize,
        executed: usize,
    }

    impl Observer for CountingObserver {
        fn instruction_fetched(&mut self, _pc: Word, _ir: Word) {
            self.fetched += 1;
        }

        fn instruction_executed(&mut self, _snapshot: &MachineSnapshot) {
            self.executed += 1;
        }
    }

    let mut cpu = ControlUnit::new();
    let mut mem = MemoryUnit::new(&MemoryConfiguration { size: 16 });
    cpu.load_image(&mut mem, &ObjectImage::new(vec![24, 0, 5, 15, 0]))
        .expect("image fits");
    let mut observer = CountingObserver::default();
    cpu.run_with_observer(&mut mem, &mut observer)
        .expect("program runs");
    // Two instructions execute; the third fetch lands on the
    // sentinel and halts without a snapshot.
    assert_eq!(observer.executed, 2);
    assert_eq!(observer.fetched, 3);
    cpu.step(&mut mem, &mut observer)
        .expect("stepping a halted machine is not an error");
    assert_eq!(observer.executed, 2);
    assert_eq!(observer.fetched, 3);
}

#[test]
fn a_halted_machine_stays_halted() {
    let mut cpu = ControlUnit::new();
    let mut mem = MemoryUnit::new(&MemoryConfiguration { size: 16 });
    cpu.load_image(&mut mem, &ObjectImage::new(vec![24, 0, 5]))
        .expect("image fits");
    cpu.run(&mut mem).expect("program runs");
    let reads_at_halt = mem.reads();
    let mode = cpu
        .step(&mut mem, &mut crate::observer::NullObserver)
        .expect("stepping a halted machine is not an error");
    assert_eq!(mode, RunMode::Halted);
    assert_eq!(mem.reads(), reads_at_halt);
}
