pub mod cpu;
pub mod decoder;
pub mod disasm;
pub mod exec;
pub mod image;
pub mod instructions;
pub mod memory;

pub mod isa {
    pub mod riscr; // register file naming and the 16-bit word decoder
}

pub use cpu::{Cpu, CpuConfig, RunState, Trap};
pub use memory::{Bus, LinearMemory};
