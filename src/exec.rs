use crate::cpu::{Cpu, Trap};
use crate::decoder::{Decoded, Op};
use crate::memory::Bus;

/// What the cursor does once an instruction has executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fall through by the decoded step length.
    Next,
    /// Branch taken: signed byte displacement from the end of the instruction.
    Branch(i16),
    Halt,
}

pub trait Executor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<Flow, Trap>;
}

pub struct IntExecutor;

impl IntExecutor {
    fn branch_if(cond: bool, d: &Decoded) -> Flow {
        if cond {
            Flow::Branch(d.ext)
        } else {
            Flow::Next
        }
    }
}

impl Executor for IntExecutor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<Flow, Trap> {
        let r1 = d.r1 as usize;
        let r2 = d.r2 as usize;
        // Immediates are sign-extended to the register width.
        let imm = d.ext as i32 as u32;
        match d.op {
            Op::Nop => {}
            Op::Add => cpu.gpr[r1] = cpu.gpr[r1].wrapping_add(cpu.gpr[r2]),
            Op::AddI => cpu.gpr[r1] = cpu.gpr[r1].wrapping_add(imm),
            Op::Sub => cpu.gpr[r1] = cpu.gpr[r1].wrapping_sub(cpu.gpr[r2]),
            Op::SubI => cpu.gpr[r1] = cpu.gpr[r1].wrapping_sub(imm),
            Op::Xor => cpu.gpr[r1] ^= cpu.gpr[r2],
            Op::XorI => cpu.gpr[r1] ^= imm,
            Op::Rol => cpu.gpr[r1] = cpu.gpr[r1].rotate_left(cpu.gpr[r2] % 32),
            Op::RolI => cpu.gpr[r1] = cpu.gpr[r1].rotate_left((d.ext as i32).rem_euclid(32) as u32),
            Op::Ror => cpu.gpr[r1] = cpu.gpr[r1].rotate_right(cpu.gpr[r2] % 32),
            Op::RorI => cpu.gpr[r1] = cpu.gpr[r1].rotate_right((d.ext as i32).rem_euclid(32) as u32),
            Op::Swp => cpu.gpr.swap(r1, r2),
            Op::Mswp => {
                let addr = cpu.gpr[r2].wrapping_add(imm);
                let old = bus
                    .read_u32(addr)
                    .map_err(|source| Trap::Bus { addr, source })?;
                bus.write_u32(addr, cpu.gpr[r1])
                    .map_err(|source| Trap::Bus { addr, source })?;
                cpu.gpr[r1] = old;
            }
            Op::Hlt => return Ok(Flow::Halt),
            Op::Jeq => return Ok(Self::branch_if(cpu.gpr[r1] == cpu.gpr[r2], &d)),
            Op::Jne => return Ok(Self::branch_if(cpu.gpr[r1] != cpu.gpr[r2], &d)),
            Op::Jlt => return Ok(Self::branch_if(cpu.gpr[r1] < cpu.gpr[r2], &d)),
            Op::Jgt => return Ok(Self::branch_if(cpu.gpr[r1] > cpu.gpr[r2], &d)),
            Op::Jle => return Ok(Self::branch_if(cpu.gpr[r1] <= cpu.gpr[r2], &d)),
            Op::Jge => return Ok(Self::branch_if(cpu.gpr[r1] >= cpu.gpr[r2], &d)),
            Op::Jmp => return Ok(Flow::Branch(d.ext)),
        }
        Ok(Flow::Next)
    }
}
