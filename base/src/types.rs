//! Scalar types and fixed contracts of the SARC machine.
//!
//! The register id space defined here is load-bearing: the integer
//! ids used for register operands in the instruction stream are the
//! positions of the registers in [`REGISTER_NAMES`], and both the
//! assembler and the control unit build their register files in this
//! order.

/// The machine word.  Every memory cell, register and bus holds one
/// of these; all machine arithmetic wraps.
pub type Word = i32;

/// Number of memory cells in the standard machine configuration.
///
/// The assembler needs this too: variable storage is allocated from
/// the top of memory downward, so the simulator and the assembler
/// must agree on where the top is.
pub const DEFAULT_MEMORY_SIZE: usize = 128;

/// The value terminating an object image.  Once loaded it also acts
/// as the halt cell: it matches no opcode, so fetching it stops the
/// machine.
pub const IMAGE_SENTINEL: Word = -1;

/// Names of all registers, in register-file order.  The
/// general-purpose registers come first (index 0 is the default
/// general-purpose register), then PC, IR and FLAGS.
pub const REGISTER_NAMES: [&str; 7] = ["R0", "R1", "R2", "R3", "PC", "IR", "FLAGS"];

/// Number of general-purpose registers.
pub const NUM_GP_REGISTERS: usize = 4;

/// Register-file index of the program counter.
pub const PC: usize = 4;

/// Register-file index of the instruction register.
pub const IR: usize = 5;

/// Register-file index of the flags register.
pub const FLAGS: usize = 6;

/// Look up a register id by name ("R0", "PC", ...).
pub fn register_id_by_name(name: &str) -> Option<usize> {
    REGISTER_NAMES.iter().position(|n| *n == name)
}

#[test]
fn test_register_id_by_name() {
    assert_eq!(register_id_by_name("R0"), Some(0));
    assert_eq!(register_id_by_name("R3"), Some(3));
    assert_eq!(register_id_by_name("PC"), Some(PC));
    assert_eq!(register_id_by_name("IR"), Some(IR));
    assert_eq!(register_id_by_name("FLAGS"), Some(FLAGS));
    assert_eq!(register_id_by_name("R4"), None);
}
