//! Line parsing and addressing-shape resolution.
//!
//! A family mnemonic such as `add` covers several opcodes; the
//! operand prefixes on the line pick the concrete one (`add %0 %1`
//! is addRegReg, `add &x %1` is addMemReg, and so on).  The parser
//! resolves the shape, validates register names against the register
//! file, and leaves memory symbols unresolved for the second pass.

use base::prelude::{register_id_by_name, Opcode, Word, REGISTER_NAMES};

use crate::lexer::{tokenize_line, Token};
use crate::types::{AssemblerFailure, LineNumber};

/// The instruction-family mnemonics the source dialect accepts.
/// `imul` is recognized so that its rejection names the real reason
/// rather than reporting an unknown instruction.
pub(crate) const MNEMONIC_FAMILIES: [&str; 13] = [
    "add", "sub", "imul", "move", "inc", "jmp", "jn", "jz", "jnz", "jeq", "jgt", "jlw", "ldi",
];

/// One emitted operand cell: already a value, or a symbol to be
/// resolved to an address in pass two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    Value(Word),
    SymbolRef(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    Label(String),
    Variable(String),
    Instruction {
        opcode: Opcode,
        operands: Vec<Operand>,
    },
}

fn syntax_error(line: LineNumber, msg: String) -> AssemblerFailure {
    AssemblerFailure::SyntaxError { line, msg }
}

/// A register operand is either a file index (`%0`) or a register
/// name (`%R0`, `%PC`).
fn register_id(line: LineNumber, name: &str) -> Result<Word, AssemblerFailure> {
    let id = if name.bytes().all(|b| b.is_ascii_digit()) {
        name.parse::<usize>().ok().filter(|id| *id < REGISTER_NAMES.len())
    } else {
        register_id_by_name(name)
    };
    match id {
        Some(id) => Ok(id as Word),
        None => Err(syntax_error(line, format!("'%{name}' names no register"))),
    }
}

/// A jump target: a symbolic address or a literal one.
fn jump_target(line: LineNumber, token: &Token) -> Result<Operand, AssemblerFailure> {
    match token {
        Token::MemRef(name) => Ok(Operand::SymbolRef(name.clone())),
        Token::Number(addr) => Ok(Operand::Value(*addr)),
        _ => Err(syntax_error(
            line,
            "jump target must be '&label' or a literal address".to_string(),
        )),
    }
}

fn arithmetic(
    line: LineNumber,
    mnemonic: &str,
    operands: &[Token],
    [reg_reg, mem_reg, reg_mem, imm_mem]: [Opcode; 4],
) -> Result<Statement, AssemblerFailure> {
    let (opcode, operands) = match operands {
        [Token::Register(a), Token::Register(b)] => (
            reg_reg,
            vec![
                Operand::Value(register_id(line, a)?),
                Operand::Value(register_id(line, b)?),
            ],
        ),
        [Token::MemRef(m), Token::Register(r)] => (
            mem_reg,
            vec![
                Operand::SymbolRef(m.clone()),
                Operand::Value(register_id(line, r)?),
            ],
        ),
        [Token::Register(r), Token::MemRef(m)] => (
            reg_mem,
            vec![
                Operand::Value(register_id(line, r)?),
                Operand::SymbolRef(m.clone()),
            ],
        ),
        [Token::Number(n), Token::MemRef(m)] => (
            imm_mem,
            vec![Operand::Value(*n), Operand::SymbolRef(m.clone())],
        ),
        _ => {
            return Err(syntax_error(
                line,
                format!(
                    "'{mnemonic}' takes one of: %reg %reg, &mem %reg, %reg &mem, literal &mem"
                ),
            ));
        }
    };
    Ok(Statement::Instruction { opcode, operands })
}

fn instruction(
    line: LineNumber,
    mnemonic: &str,
    operands: &[Token],
) -> Result<Statement, AssemblerFailure> {
    use Opcode::*;
    match mnemonic {
        "add" => arithmetic(line, mnemonic, operands, [AddRegReg, AddMemReg, AddRegMem, AddImmMem]),
        "sub" => arithmetic(line, mnemonic, operands, [SubRegReg, SubMemReg, SubRegMem, SubImmMem]),
        "imul" => Err(syntax_error(
            line,
            "the 'imul' family is reserved and unimplemented".to_string(),
        )),
        "move" => {
            let (opcode, operands) = match operands {
                [Token::MemRef(m), Token::Register(r)] => (
                    MoveMemReg,
                    vec![
                        Operand::SymbolRef(m.clone()),
                        Operand::Value(register_id(line, r)?),
                    ],
                ),
                [Token::Register(r), Token::MemRef(m)] => (
                    MoveRegMem,
                    vec![
                        Operand::Value(register_id(line, r)?),
                        Operand::SymbolRef(m.clone()),
                    ],
                ),
                [Token::Register(a), Token::Register(b)] => (
                    MoveRegReg,
                    vec![
                        Operand::Value(register_id(line, a)?),
                        Operand::Value(register_id(line, b)?),
                    ],
                ),
                [Token::Number(n), Token::Register(r)] => (
                    MoveImmReg,
                    vec![Operand::Value(*n), Operand::Value(register_id(line, r)?)],
                ),
                _ => {
                    return Err(syntax_error(
                        line,
                        "'move' takes one of: &mem %reg, %reg &mem, %reg %reg, literal %reg"
                            .to_string(),
                    ));
                }
            };
            Ok(Statement::Instruction { opcode, operands })
        }
        "inc" => {
            let (opcode, operands) = match operands {
                [Token::Register(r)] => {
                    (IncReg, vec![Operand::Value(register_id(line, r)?)])
                }
                [Token::MemRef(m)] => (IncMem, vec![Operand::SymbolRef(m.clone())]),
                _ => {
                    return Err(syntax_error(
                        line,
                        "'inc' takes one operand, %reg or &mem".to_string(),
                    ));
                }
            };
            Ok(Statement::Instruction { opcode, operands })
        }
        "jmp" | "jn" | "jz" | "jnz" => {
            let opcode = match mnemonic {
                "jmp" => Jmp,
                "jn" => Jn,
                "jz" => Jz,
                _ => Jnz,
            };
            match operands {
                [target] => Ok(Statement::Instruction {
                    opcode,
                    operands: vec![jump_target(line, target)?],
                }),
                _ => Err(syntax_error(
                    line,
                    format!("'{mnemonic}' takes exactly one jump target"),
                )),
            }
        }
        "jeq" | "jgt" | "jlw" => {
            let opcode = match mnemonic {
                "jeq" => Jeq,
                "jgt" => Jgt,
                _ => Jlw,
            };
            match operands {
                [Token::Register(a), Token::Register(b), target] => {
                    Ok(Statement::Instruction {
                        opcode,
                        operands: vec![
                            Operand::Value(register_id(line, a)?),
                            Operand::Value(register_id(line, b)?),
                            jump_target(line, target)?,
                        ],
                    })
                }
                _ => Err(syntax_error(
                    line,
                    format!("'{mnemonic}' takes %reg %reg and a jump target"),
                )),
            }
        }
        "ldi" => match operands {
            [Token::Register(r), Token::Number(n)] => Ok(Statement::Instruction {
                opcode: Ldi,
                operands: vec![Operand::Value(register_id(line, r)?), Operand::Value(*n)],
            }),
            _ => Err(syntax_error(
                line,
                "'ldi' takes %reg and an integer literal".to_string(),
            )),
        },
        _ => unreachable!("mnemonic families and dispatch arms disagree"),
    }
}

/// Parse one source line.  `Ok(None)` means the line was blank.
pub(crate) fn parse_line(
    line: LineNumber,
    text: &str,
) -> Result<Option<Statement>, AssemblerFailure> {
    let tokens = tokenize_line(line, text)?;
    match tokens.as_slice() {
        [] => Ok(None),
        [Token::LabelDecl(name)] => Ok(Some(Statement::Label(name.clone()))),
        [Token::Symbol(name)] if !MNEMONIC_FAMILIES.contains(&name.as_str()) => {
            Ok(Some(Statement::Variable(name.clone())))
        }
        [Token::Symbol(mnemonic), operands @ ..] => {
            if MNEMONIC_FAMILIES.contains(&mnemonic.as_str()) {
                instruction(line, mnemonic, operands).map(Some)
            } else {
                Err(syntax_error(
                    line,
                    format!("'{mnemonic}' is not an instruction"),
                ))
            }
        }
        _ => Err(syntax_error(
            line,
            "a line is a label, a variable declaration, or an instruction".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_line, Operand, Statement};
    use base::prelude::Opcode;

    fn parsed(text: &str) -> Statement {
        parse_line(1, text)
            .expect("line is well-formed")
            .expect("line is not blank")
    }

    #[test]
    fn operand_prefixes_resolve_the_shape() {
        assert_eq!(
            parsed("add %0 %1"),
            Statement::Instruction {
                opcode: Opcode::AddRegReg,
                operands: vec![Operand::Value(0), Operand::Value(1)],
            }
        );
        assert_eq!(
            parsed("add &x %1"),
            Statement::Instruction {
                opcode: Opcode::AddMemReg,
                operands: vec![Operand::SymbolRef("x".to_string()), Operand::Value(1)],
            }
        );
        assert_eq!(
            parsed("sub 3 &x"),
            Statement::Instruction {
                opcode: Opcode::SubImmMem,
                operands: vec![Operand::Value(3), Operand::SymbolRef("x".to_string())],
            }
        );
        assert_eq!(
            parsed("move %R2 &y"),
            Statement::Instruction {
                opcode: Opcode::MoveRegMem,
                operands: vec![Operand::Value(2), Operand::SymbolRef("y".to_string())],
            }
        );
    }

    #[test]
    fn register_names_and_indices_are_interchangeable() {
        assert_eq!(parsed("inc %R3"), parsed("inc %3"));
        assert!(parse_line(1, "inc %R9").is_err());
        assert!(parse_line(1, "inc %7").is_err());
    }

    #[test]
    fn declarations() {
        assert_eq!(parsed("loop:"), Statement::Label("loop".to_string()));
        assert_eq!(parsed("x"), Statement::Variable("x".to_string()));
        assert_eq!(parse_line(1, "  ").expect("blank line"), None);
    }

    #[test]
    fn jumps_take_symbolic_or_literal_targets() {
        assert_eq!(
            parsed("jnz &loop"),
            Statement::Instruction {
                opcode: Opcode::Jnz,
                operands: vec![Operand::SymbolRef("loop".to_string())],
            }
        );
        assert_eq!(
            parsed("jgt %0 %1 12"),
            Statement::Instruction {
                opcode: Opcode::Jgt,
                operands: vec![
                    Operand::Value(0),
                    Operand::Value(1),
                    Operand::Value(12),
                ],
            }
        );
        assert!(parse_line(1, "jmp %0").is_err());
    }

    #[test]
    fn malformed_lines_are_fatal() {
        assert!(parse_line(1, "add %0").is_err());
        assert!(parse_line(1, "ldi 5 %0").is_err());
        assert!(parse_line(1, "frobnicate %0 %1").is_err());
        assert!(parse_line(1, "imul %0 %1").is_err());
    }
}
