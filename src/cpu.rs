use anyhow::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::decoder::{Decoder, OpFlags, StepLen};
use crate::disasm::fmt_decoded;
use crate::exec::{Executor, Flow};
use crate::memory::{Bus, LinearMemory};

/// Default memory size: 1 MiB.
pub const DEFAULT_MEM_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    pub mem_size: usize,
    /// Upper bound on executed instructions for `Cpu::run`; `None` runs until halt.
    pub step_budget: Option<u64>,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            mem_size: DEFAULT_MEM_SIZE,
            step_budget: None,
        }
    }
}

impl CpuConfig {
    pub fn memory(&self) -> LinearMemory {
        LinearMemory::new(self.mem_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Halted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub pc: u32,
    /// Step length carried into the next decode.
    pub step_len: StepLen,
    pub gpr: [u32; 16],
    pub state: RunState,
    pub cfg: CpuConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("Invalid instruction {raw:#06x} at {pc:#010x}")]
    InvalidInstruction { pc: u32, raw: u16 },
    #[error("Bus error at {addr:#010x}: {source}")]
    Bus { addr: u32, #[source] source: Error },
    #[error("Step budget of {limit} instructions exhausted")]
    StepBudget { limit: u64 },
}

impl Cpu {
    pub fn new(cfg: CpuConfig) -> Self {
        Self {
            pc: 0,
            step_len: StepLen::INITIAL,
            gpr: [0; 16],
            state: RunState::Running,
            cfg,
        }
    }

    pub fn reset(&mut self, reset_pc: u32) {
        self.pc = reset_pc;
        self.step_len = StepLen::INITIAL;
        self.gpr = [0; 16];
        self.state = RunState::Running;
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    /// Instruction word in the low half, extension word (if EXTENDED) in the high half.
    fn fetch<B: Bus>(bus: &mut B, pc: u32) -> Result<u32, Trap> {
        let word = bus
            .read_u16(pc)
            .map_err(|source| Trap::Bus { addr: pc, source })?;
        if !OpFlags::from_bits_truncate(word as u8).contains(OpFlags::EXT) {
            return Ok(word as u32);
        }
        let addr = pc.wrapping_add(2);
        let ext = bus
            .read_u16(addr)
            .map_err(|source| Trap::Bus { addr, source })?;
        Ok(word as u32 | (ext as u32) << 16)
    }

    pub fn step<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<RunState, Trap> {
        if self.is_halted() {
            return Ok(RunState::Halted);
        }
        let pc = self.pc;
        let raw32 = Self::fetch(bus, pc)?;
        let d = dec
            .decode(raw32, self.step_len)
            .ok_or(Trap::InvalidInstruction { pc, raw: raw32 as u16 })?;
        trace!(pc = format_args!("{pc:#06x}"), step = d.step.0, "{}", fmt_decoded(&d));

        let next = pc.wrapping_add(d.step.0 as u32);
        match exec.exec(self, bus, d)? {
            Flow::Next => {
                self.pc = next;
                self.step_len = d.step;
            }
            Flow::Halt => {
                self.pc = next;
                self.step_len = d.step;
                self.state = RunState::Halted;
                debug!(pc = format_args!("{pc:#06x}"), "halted");
            }
            Flow::Branch(disp) => {
                let target = next.wrapping_add(disp as i32 as u32);
                // The step carry belongs to the program-order predecessor of the
                // target, which the target's own RETRO bit describes.
                let op_byte = bus
                    .read_u8(target)
                    .map_err(|source| Trap::Bus { addr: target, source })?;
                self.step_len = StepLen::entering(OpFlags::from_bits_truncate(op_byte));
                self.pc = target;
            }
        }
        Ok(self.state)
    }

    /// Step until HLT, a trap, or the configured step budget runs out.
    /// Returns the number of instructions executed.
    pub fn run<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<u64, Trap> {
        let mut steps = 0u64;
        while !self.is_halted() {
            if let Some(limit) = self.cfg.step_budget {
                if steps >= limit {
                    warn!(limit, pc = format_args!("{:#06x}", self.pc), "step budget exhausted");
                    return Err(Trap::StepBudget { limit });
                }
            }
            self.step(bus, dec, exec)?;
            steps += 1;
        }
        Ok(steps)
    }
}
