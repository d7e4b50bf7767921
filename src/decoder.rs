use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Base operations. The discriminant is the 6-bit opcode, EXTENDED bit included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Nop = 0x00,
    Add = 0x01,
    Sub = 0x02,
    Xor = 0x03,
    Rol = 0x04,
    Ror = 0x05,
    Swp = 0x08,
    Hlt = 0x0F,
    AddI = 0x21,
    SubI = 0x22,
    XorI = 0x23,
    RolI = 0x24,
    RorI = 0x25,
    Mswp = 0x29,
    Jeq = 0x30,
    Jne = 0x31,
    Jlt = 0x32,
    Jgt = 0x33,
    Jle = 0x34,
    Jge = 0x35,
    Jmp = 0x36,
}

impl Op {
    pub fn opcode(self) -> u8 {
        self as u8
    }

    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Op::Jeq | Op::Jne | Op::Jlt | Op::Jgt | Op::Jle | Op::Jge | Op::Jmp
        )
    }

    /// Width of the instruction once encoded.
    pub fn width(self) -> u8 {
        if OpFlags::from_bits_truncate(self as u8).contains(OpFlags::EXT) {
            4
        } else {
            2
        }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpFlags: u8 {
const EXT = 1 << 5;   // a 16-bit extension word follows
const RETRO = 1 << 6; // the previous instruction in program order is 4 bytes
}
}

/// Low 6 bits of the opcode byte select the operation.
pub const OPCODE_MASK: u8 = 0x3F;

/// Accumulated step length: how far the PC moves after the current instruction.
///
/// The value is carried from one decode into the next. An EXTENDED instruction
/// adds 2 for its extension word and the RETRO bit on its successor takes the 2
/// back, so in straight-line code the step always equals the width of the
/// instruction just decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLen(pub i32);

impl StepLen {
    pub const INITIAL: StepLen = StepLen(2);

    pub fn advance(self, flags: OpFlags) -> StepLen {
        let mut step = self.0;
        if flags.contains(OpFlags::EXT) {
            step += 2;
        }
        if flags.contains(OpFlags::RETRO) {
            step -= 2;
        }
        StepLen(step)
    }

    /// Carry to use when control lands on an instruction from a branch: its own
    /// RETRO bit tells how long its program-order predecessor was.
    pub fn entering(flags: OpFlags) -> StepLen {
        if flags.contains(OpFlags::RETRO) {
            StepLen(4)
        } else {
            StepLen(2)
        }
    }
}

impl Default for StepLen {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub op: Op,
    pub flags: OpFlags,
    pub r1: u8,
    pub r2: u8,
    /// Immediate, memory offset or branch displacement; 0 when not EXTENDED.
    pub ext: i16,
    /// Step length after applying this instruction's flags to the incoming carry.
    pub step: StepLen,
}

impl Decoded {
    pub fn width(&self) -> u8 {
        self.op.width()
    }
}

pub trait Decoder {
    /// `raw32` holds the instruction word in its low half and the extension
    /// word (if any) in its high half.
    fn decode(&self, raw32: u32, carry: StepLen) -> Option<Decoded>;
}
