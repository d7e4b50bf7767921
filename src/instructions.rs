use crate::decoder::Op;

/// Operand shape of a mnemonic; decides both the assembler syntax and the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `HLT` -> `[op, 0x00]`
    None,
    /// `ADD r1, r2` -> `[op, r1 | r2 << 4]`
    RegReg,
    /// `ADDI r, imm` -> `[op, r, lo, hi]`
    RegImm,
    /// `MSWP rd, off(rb)` -> `[op, rd | rb << 4, lo, hi]`
    RegMem,
    /// `JEQ r1, r2, target` -> `[op, r1 | r2 << 4, lo, hi]`
    Branch,
    /// `JMP target` -> `[op, 0x00, lo, hi]`
    Jump,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub form: Form,
}

impl InstrDesc {
    pub fn opcode(&self) -> u8 {
        self.op.opcode()
    }
}

const fn desc(op: Op, mnemonic: &'static str, form: Form) -> InstrDesc {
    InstrDesc { op, mnemonic, form }
}

pub const TABLE: &[InstrDesc] = &[
    desc(Op::Nop, "NOP", Form::None),
    desc(Op::Add, "ADD", Form::RegReg),
    desc(Op::Sub, "SUB", Form::RegReg),
    desc(Op::Xor, "XOR", Form::RegReg),
    desc(Op::Rol, "ROL", Form::RegReg),
    desc(Op::Ror, "ROR", Form::RegReg),
    desc(Op::Swp, "SWP", Form::RegReg),
    desc(Op::Hlt, "HLT", Form::None),
    desc(Op::AddI, "ADDI", Form::RegImm),
    desc(Op::SubI, "SUBI", Form::RegImm),
    desc(Op::XorI, "XORI", Form::RegImm),
    desc(Op::RolI, "ROLI", Form::RegImm),
    desc(Op::RorI, "RORI", Form::RegImm),
    desc(Op::Mswp, "MSWP", Form::RegMem),
    desc(Op::Jeq, "JEQ", Form::Branch),
    desc(Op::Jne, "JNE", Form::Branch),
    desc(Op::Jlt, "JLT", Form::Branch),
    desc(Op::Jgt, "JGT", Form::Branch),
    desc(Op::Jle, "JLE", Form::Branch),
    desc(Op::Jge, "JGE", Form::Branch),
    desc(Op::Jmp, "JMP", Form::Jump),
];

/// Case-insensitive mnemonic lookup.
pub fn by_mnemonic(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE
        .iter()
        .find(|d| d.mnemonic.eq_ignore_ascii_case(mnemonic))
}

/// Lookup by the 6-bit opcode (RETRO bit already stripped).
pub fn by_opcode(opcode: u8) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.opcode() == opcode)
}
