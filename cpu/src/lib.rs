//! This crate emulates the SARC machine: the shared buses, the
//! register file, the ALU, the addressable memory and the
//! microprogrammed control unit which drives them.
#![crate_name = "cpu"]

mod alarm;
mod alu;
mod bus;
mod control;
mod memory;
mod observer;
mod register;

pub use alarm::{Alarm, BadMemOp};
pub use alu::Alu;
pub use bus::{Bus, Buses};
pub use control::{ControlUnit, RunMode};
pub use memory::{MemoryConfiguration, MemoryUnit};
pub use observer::{FlagsSnapshot, MachineSnapshot, NullObserver, Observer, RegisterSnapshot};
pub use register::{FLAG_NEGATIVE, FLAG_NONZERO, FLAG_ZERO};
pub use register::{InternalBus, Register, RegisterFile, Selector};
