//! The two-pass assembly driver.
//!
//! Pass one parses every line, records label and variable
//! definitions, and emits cells that are either final values or
//! unresolved symbol references.  Pass two allocates the variable
//! region at the top of memory and replaces every reference with the
//! address it resolves to.  Nothing is written on failure; there is
//! no partial object file.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{event, Level};

use base::prelude::{ObjectImage, Word, IMAGE_SENTINEL};

use crate::parser::{parse_line, Operand, Statement};
use crate::symtab::SymbolTable;
use crate::types::{AssemblerFailure, LineNumber};

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Print a listing of the resolved image and symbol table.
    pub list: bool,
}

/// One object-image cell before symbol resolution.
#[derive(Debug)]
enum PendingCell {
    Value(Word),
    Symbol { name: String, line: LineNumber },
}

fn assemble_pass1(
    source: &str,
    symtab: &mut SymbolTable,
) -> Result<Vec<PendingCell>, AssemblerFailure> {
    let mut cells: Vec<PendingCell> = Vec::new();
    for (line_number, text) in source.lines().enumerate().map(|(n, t)| (n + 1, t)) {
        match parse_line(line_number, text)? {
            None => (),
            Some(Statement::Label(name)) => {
                symtab.define_label(&name, cells.len() as Word, line_number)?;
            }
            Some(Statement::Variable(name)) => {
                symtab.define_variable(&name, line_number)?;
            }
            Some(Statement::Instruction { opcode, operands }) => {
                cells.push(PendingCell::Value(opcode.number()));
                for operand in operands {
                    cells.push(match operand {
                        Operand::Value(v) => PendingCell::Value(v),
                        Operand::SymbolRef(name) => PendingCell::Symbol {
                            name,
                            line: line_number,
                        },
                    });
                }
            }
        }
    }
    Ok(cells)
}

fn assemble_pass2(
    cells: Vec<PendingCell>,
    symtab: &SymbolTable,
) -> Result<ObjectImage, AssemblerFailure> {
    let words = cells
        .into_iter()
        .map(|cell| match cell {
            PendingCell::Value(v) => Ok(v),
            PendingCell::Symbol { name, line } => symtab
                .lookup(&name)
                .ok_or(AssemblerFailure::UndefinedSymbol { name, line }),
        })
        .collect::<Result<Vec<Word>, AssemblerFailure>>()?;
    Ok(ObjectImage::new(words))
}

fn assemble(
    source: &str,
    memory_size: usize,
) -> Result<(ObjectImage, SymbolTable), AssemblerFailure> {
    let mut symtab = SymbolTable::new();
    let cells = assemble_pass1(source, &mut symtab)?;
    // One extra cell: the loader appends the image terminator.
    symtab.allocate(memory_size, cells.len() + 1)?;
    let image = assemble_pass2(cells, &symtab)?;
    event!(
        Level::INFO,
        "assembled {} cells for a {}-cell memory",
        image.len(),
        memory_size
    );
    Ok((image, symtab))
}

/// Assemble source text into an object image.
///
/// # Errors
///
/// Fails on the first malformed line, on duplicate or unresolved
/// symbols, and when program and variables together exceed
/// `memory_size`.
pub fn assemble_source(
    source: &str,
    memory_size: usize,
) -> Result<ObjectImage, AssemblerFailure> {
    assemble(source, memory_size).map(|(image, _)| image)
}

fn write_listing<W: Write>(
    mut writer: W,
    image: &ObjectImage,
    symtab: &SymbolTable,
) -> Result<(), std::io::Error> {
    for (address, word) in image.words().iter().enumerate() {
        writeln!(writer, "{address:>6}  {word}")?;
    }
    writeln!(writer, "{:>6}  {IMAGE_SENTINEL}  (terminator)", image.len())?;
    for (address, name) in symtab.resolved() {
        writeln!(writer, "{address:>6}  = {name}")?;
    }
    Ok(())
}

/// Assemble `input_file` and write the object image to
/// `output_file`.
///
/// # Errors
///
/// As [`assemble_source`], plus I/O failures on either file.
pub fn assemble_file(
    input_file: &OsStr,
    output_file: &Path,
    memory_size: usize,
    options: OutputOptions,
) -> Result<(), AssemblerFailure> {
    let source = std::fs::read_to_string(input_file).map_err(|error| {
        AssemblerFailure::IoErrorOnInput {
            filename: input_file.to_owned(),
            error,
        }
    })?;
    let (image, symtab) = assemble(&source, memory_size)?;
    if options.list {
        let stdout = std::io::stdout();
        write_listing(stdout.lock(), &image, &symtab).map_err(|error| {
            AssemblerFailure::IoErrorOnOutput {
                filename: "<stdout>".into(),
                error,
            }
        })?;
    }
    let into_output_error = |error| AssemblerFailure::IoErrorOnOutput {
        filename: output_file.to_owned(),
        error,
    };
    let mut writer = BufWriter::new(File::create(output_file).map_err(into_output_error)?);
    image.write_to(&mut writer).map_err(into_output_error)?;
    writer.flush().map_err(into_output_error)
}
