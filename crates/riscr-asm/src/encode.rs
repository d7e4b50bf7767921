use riscr::decoder::OpFlags;
use riscr::instructions::{self, Form, InstrDesc};
use riscr::isa::riscr::reg_index;

use crate::error::AsmError;
use crate::parse::{SourceLine, Token};

/// Branch target slot: a label waiting for the resolver, or a displacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Unresolved(String),
    Resolved(i16),
}

/// What follows the opcode and register bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tail {
    None,
    /// Immediate or memory offset, already encoded.
    Word(u16),
    Target(Target),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub opcode: u8,
    pub regs: u8,
    pub tail: Tail,
}

impl Record {
    pub fn is_extended(&self) -> bool {
        OpFlags::from_bits_truncate(self.opcode).contains(OpFlags::EXT)
    }

    pub fn width(&self) -> u32 {
        if self.is_extended() {
            4
        } else {
            2
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.tail {
            Tail::Target(Target::Unresolved(name)) => Some(name),
            _ => None,
        }
    }

    /// Final bytes; `None` while a label is still unresolved.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        let word = match &self.tail {
            Tail::None => return Some(vec![self.opcode, self.regs]),
            Tail::Word(w) => *w,
            Tail::Target(Target::Resolved(d)) => *d as u16,
            Tail::Target(Target::Unresolved(_)) => return None,
        };
        let [lo, hi] = word.to_le_bytes();
        Some(vec![self.opcode, self.regs, lo, hi])
    }
}

fn syntax(desc: &InstrDesc) -> String {
    let operands = match desc.form {
        Form::None => "",
        Form::RegReg => " reg, reg",
        Form::RegImm => " reg, imm",
        Form::RegMem => " reg, off(reg)",
        Form::Branch => " reg, reg, label",
        Form::Jump => " label",
    };
    format!("{}{}", desc.mnemonic, operands)
}

fn reg(line: usize, tok: &Token) -> Result<u8, AsmError> {
    match tok {
        Token::Word(name) => reg_index(name).ok_or_else(|| AsmError::UnknownRegister {
            line,
            name: name.clone(),
        }),
        Token::Int(_) => Err(AsmError::ExpectedRegister {
            line,
            found: tok.to_string(),
        }),
    }
}

/// Accepts -0x8000..=0xFFFF; negatives are stored as two's complement.
fn word(line: usize, what: &'static str, tok: &Token) -> Result<u16, AsmError> {
    let Token::Int(value) = *tok else {
        return Err(AsmError::ExpectedInteger {
            line,
            found: tok.to_string(),
        });
    };
    if !(-0x8000..=0xFFFF).contains(&value) {
        return Err(AsmError::OutOfRange { line, what, value });
    }
    Ok(value as u16)
}

fn target(line: usize, tok: &Token) -> Result<Target, AsmError> {
    match tok {
        Token::Word(label) => Ok(Target::Unresolved(label.clone())),
        Token::Int(_) => Ok(Target::Resolved(word(line, "displacement", tok)? as i16)),
    }
}

pub fn encode_line(src: &SourceLine) -> Result<Record, AsmError> {
    let line = src.line;
    let desc = instructions::by_mnemonic(&src.mnemonic).ok_or_else(|| {
        AsmError::UnknownInstruction {
            line,
            mnemonic: src.mnemonic.clone(),
        }
    })?;
    let ops = &src.operands;
    let arity = |n: usize| {
        if ops.len() == n {
            Ok(())
        } else {
            Err(AsmError::Arity {
                line,
                syntax: syntax(desc),
                found: ops.len(),
            })
        }
    };
    let record = |regs: u8, tail: Tail| Record {
        line,
        opcode: desc.opcode(),
        regs,
        tail,
    };

    match desc.form {
        Form::None => {
            arity(0)?;
            Ok(record(0x00, Tail::None))
        }
        Form::RegReg => {
            arity(2)?;
            let r1 = reg(line, &ops[0])?;
            let r2 = reg(line, &ops[1])?;
            Ok(record(r1 | r2 << 4, Tail::None))
        }
        Form::RegImm => {
            let (rd, imm) = match ops.as_slice() {
                [dst, imm] => (reg(line, dst)?, imm),
                [dst, src, imm] => {
                    let rd = reg(line, dst)?;
                    if reg(line, src)? != rd {
                        return Err(AsmError::TwoAddress {
                            line,
                            mnemonic: desc.mnemonic.to_string(),
                            dst: dst.to_string(),
                            src: src.to_string(),
                        });
                    }
                    (rd, imm)
                }
                _ => {
                    return Err(AsmError::Arity {
                        line,
                        syntax: syntax(desc),
                        found: ops.len(),
                    })
                }
            };
            Ok(record(rd, Tail::Word(word(line, "immediate", imm)?)))
        }
        Form::RegMem => {
            arity(3)?;
            let rd = reg(line, &ops[0])?;
            let off = word(line, "offset", &ops[1])?;
            let rb = reg(line, &ops[2])?;
            Ok(record(rd | rb << 4, Tail::Word(off)))
        }
        Form::Branch => {
            arity(3)?;
            let r1 = reg(line, &ops[0])?;
            let r2 = reg(line, &ops[1])?;
            Ok(record(r1 | r2 << 4, Tail::Target(target(line, &ops[2])?)))
        }
        Form::Jump => {
            arity(1)?;
            Ok(record(0x00, Tail::Target(target(line, &ops[0])?)))
        }
    }
}
