//! The symbol table: label and variable definitions, and the
//! variable-storage allocator.
//!
//! Labels resolve to their object-image position.  Variables are
//! allocated one cell each from the top of memory downward, in
//! declaration order, forming a stack-like region that must not
//! collide with the program cells (terminator included).

use std::collections::BTreeMap;

use base::prelude::Word;

use crate::types::{AssemblerFailure, LineNumber};

#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    /// Resolved addresses, labels from the start, variables filled
    /// in by `allocate`.
    addresses: BTreeMap<String, Word>,
    /// Variable names in declaration order, addressless until
    /// allocation.
    variables: Vec<String>,
}

impl SymbolTable {
    pub(crate) fn new() -> SymbolTable {
        SymbolTable::default()
    }

    fn check_unused(&self, name: &str, line: LineNumber) -> Result<(), AssemblerFailure> {
        if self.addresses.contains_key(name) || self.variables.iter().any(|v| v == name) {
            Err(AssemblerFailure::DuplicateSymbol {
                name: name.to_string(),
                line,
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn define_label(
        &mut self,
        name: &str,
        address: Word,
        line: LineNumber,
    ) -> Result<(), AssemblerFailure> {
        self.check_unused(name, line)?;
        self.addresses.insert(name.to_string(), address);
        Ok(())
    }

    pub(crate) fn define_variable(
        &mut self,
        name: &str,
        line: LineNumber,
    ) -> Result<(), AssemblerFailure> {
        self.check_unused(name, line)?;
        self.variables.push(name.to_string());
        Ok(())
    }

    /// Assign variable addresses from `memory_size - 1` downward.
    /// `program_cells` counts the object image plus its terminator;
    /// the variable region may not reach into it.
    pub(crate) fn allocate(
        &mut self,
        memory_size: usize,
        program_cells: usize,
    ) -> Result<(), AssemblerFailure> {
        if program_cells + self.variables.len() > memory_size {
            return Err(AssemblerFailure::ProgramTooBig {
                program_cells,
                variables: self.variables.len(),
                memory_size,
            });
        }
        for (offset, name) in self.variables.iter().enumerate() {
            let address = (memory_size - 1 - offset) as Word;
            self.addresses.insert(name.clone(), address);
        }
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Word> {
        self.addresses.get(name).copied()
    }

    /// All resolved symbols in address order, for listings.
    pub(crate) fn resolved(&self) -> Vec<(Word, &str)> {
        let mut symbols: Vec<(Word, &str)> = self
            .addresses
            .iter()
            .map(|(name, addr)| (*addr, name.as_str()))
            .collect();
        symbols.sort_unstable();
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::SymbolTable;
    use crate::types::AssemblerFailure;

    #[test]
    fn variables_are_allocated_top_down_in_declaration_order() {
        let mut symtab = SymbolTable::new();
        symtab.define_variable("x", 1).expect("fresh name");
        symtab.define_variable("y", 2).expect("fresh name");
        symtab.allocate(128, 10).expect("plenty of room");
        assert_eq!(symtab.lookup("x"), Some(127));
        assert_eq!(symtab.lookup("y"), Some(126));
    }

    #[test]
    fn labels_resolve_to_their_recorded_address() {
        let mut symtab = SymbolTable::new();
        symtab.define_label("loop", 6, 3).expect("fresh name");
        symtab.allocate(128, 10).expect("plenty of room");
        assert_eq!(symtab.lookup("loop"), Some(6));
        assert_eq!(symtab.lookup("end"), None);
    }

    #[test]
    fn duplicates_are_rejected_across_both_kinds() {
        let mut symtab = SymbolTable::new();
        symtab.define_variable("x", 1).expect("fresh name");
        assert!(matches!(
            symtab.define_label("x", 0, 2),
            Err(AssemblerFailure::DuplicateSymbol { .. })
        ));
        assert!(matches!(
            symtab.define_variable("x", 3),
            Err(AssemblerFailure::DuplicateSymbol { .. })
        ));
    }

    #[test]
    fn variable_region_may_not_reach_the_program() {
        let mut symtab = SymbolTable::new();
        for name in ["a", "b", "c"] {
            symtab.define_variable(name, 1).expect("fresh name");
        }
        assert!(matches!(
            symtab.allocate(8, 6),
            Err(AssemblerFailure::ProgramTooBig { .. })
        ));
        assert!(symtab.allocate(9, 6).is_ok());
    }
}
