//! Observation hooks for trace and simulation modes.
//!
//! Trace mode prints component state and may block on operator input
//! between instructions.  Both behaviours live behind an injectable
//! observer: the control unit calls it after each
//! fetch and each executed instruction, and whatever it does (print,
//! pause, record) is invisible to the simulation semantics, so
//! automated runs simply use [`NullObserver`].

use serde::Serialize;

use base::prelude::{Opcode, Word};

/// One register's name and value at snapshot time.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterSnapshot {
    pub name: &'static str,
    pub value: Word,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FlagsSnapshot {
    pub zero: bool,
    pub negative: bool,
    pub nonzero: bool,
}

/// The architectural state visible to an observer.
#[derive(Debug, Clone, Serialize)]
pub struct MachineSnapshot {
    /// The opcode which just executed, if decoding succeeded.
    pub executed: Option<Opcode>,
    pub registers: Vec<RegisterSnapshot>,
    pub flags: FlagsSnapshot,
    pub ext_bus: Word,
    pub int1_bus: Word,
    pub int2_bus: Word,
}

pub trait Observer {
    /// Called after each fetch, before decode.
    fn instruction_fetched(&mut self, _pc: Word, _ir: Word) {}

    /// Called after each microprogram runs to completion.
    fn instruction_executed(&mut self, _snapshot: &MachineSnapshot) {}
}

/// The observer used when nobody is watching.
#[derive(Debug, Default)]
pub struct NullObserver;

impl Observer for NullObserver {}
