use crate::decoder::{Decoded, Decoder, OpFlags, StepLen, OPCODE_MASK};
use crate::instructions;

/// Conventional register names; index is the 4-bit register number.
/// Roles are cosmetic, nothing is enforced (not even `zero`).
pub const REGISTERS: [&str; 16] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "s2",
    "s3",
];

pub fn reg_index(name: &str) -> Option<u8> {
    REGISTERS.iter().position(|r| *r == name).map(|i| i as u8)
}

pub fn reg_name(idx: u8) -> &'static str {
    REGISTERS[(idx & 0xF) as usize]
}

/// Decoder for the 16-bit instruction word.
///
/// Layout (little-endian word): bits 0..5 opcode (bit 5 = EXTENDED),
/// bit 6 RETRO, bit 7 unused, bits 8..11 first register, bits 12..15 second
/// register. EXTENDED instructions are followed by a signed 16-bit word.
/// Only the low six bits select the operation; bit 7 is ignored.
pub struct RiscrDecoder;

impl RiscrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RiscrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RiscrDecoder {
    fn decode(&self, raw32: u32, carry: StepLen) -> Option<Decoded> {
        let op_byte = (raw32 & 0xFF) as u8;
        let flags = OpFlags::from_bits_truncate(op_byte);
        let desc = instructions::by_opcode(op_byte & OPCODE_MASK)?;
        let ext = if flags.contains(OpFlags::EXT) {
            (raw32 >> 16) as u16 as i16
        } else {
            0
        };
        Some(Decoded {
            op: desc.op,
            flags,
            r1: ((raw32 >> 8) & 0xF) as u8,
            r2: ((raw32 >> 12) & 0xF) as u8,
            ext,
            step: carry.advance(flags),
        })
    }
}
