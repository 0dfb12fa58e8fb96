use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::PathBuf;

/// Line numbers are 1-based and come from enumerating the input.
pub(crate) type LineNumber = usize;

#[derive(Debug)]
pub enum AssemblerFailure {
    IoErrorOnInput {
        filename: OsString,
        error: IoError,
    },
    IoErrorOnOutput {
        filename: PathBuf,
        error: IoError,
    },
    SyntaxError {
        line: LineNumber,
        msg: String,
    },
    /// An operand refers to a label or variable no line declares.
    UndefinedSymbol {
        name: String,
        line: LineNumber,
    },
    /// The same name declared twice, as label or variable.
    DuplicateSymbol {
        name: String,
        line: LineNumber,
    },
    /// The program cells (sentinel included) and the variable region
    /// collide: the memory is too small for both.
    ProgramTooBig {
        program_cells: usize,
        variables: usize,
        memory_size: usize,
    },
}

fn write_os_string(f: &mut Formatter<'_>, s: &OsStr) -> Result<(), fmt::Error> {
    match s.to_str() {
        Some(unicode_name) => f.write_str(unicode_name),
        None => write!(
            f,
            "{} (some non-Unicode characters changed to make it printable)",
            s.to_string_lossy(),
        ),
    }
}

impl Display for AssemblerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AssemblerFailure::IoErrorOnInput { filename, error } => {
                f.write_str("I/O error reading input file ")?;
                write_os_string(f, filename)?;
                write!(f, ": {error}")
            }
            AssemblerFailure::IoErrorOnOutput { filename, error } => {
                write!(
                    f,
                    "I/O error writing output file {}: {error}",
                    filename.display(),
                )
            }
            AssemblerFailure::SyntaxError { line, msg } => {
                write!(f, "line {line}: {msg}")
            }
            AssemblerFailure::UndefinedSymbol { name, line } => {
                write!(f, "line {line}: '{name}' is not declared as a variable or label")
            }
            AssemblerFailure::DuplicateSymbol { name, line } => {
                write!(f, "line {line}: '{name}' is already declared")
            }
            AssemblerFailure::ProgramTooBig {
                program_cells,
                variables,
                memory_size,
            } => {
                write!(
                    f,
                    "program does not fit: {program_cells} program cells (terminator included) \
                     and {variables} variables cannot share a {memory_size}-cell memory"
                )
            }
        }
    }
}

impl Error for AssemblerFailure {}
