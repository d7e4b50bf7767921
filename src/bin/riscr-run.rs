use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use riscr::disasm::listing;
use riscr::exec::IntExecutor;
use riscr::image::parse_hex;
use riscr::isa::riscr::{RiscrDecoder, REGISTERS};
use riscr::{Cpu, CpuConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run an assembled RISCR hex image")]
struct Opts {
    /// Hex image produced by riscr-asm
    #[arg(value_name = "PROGRAM")]
    program: PathBuf,
    /// CPU configuration as JSON (mem_size, step_budget)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Stop with an error after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,
    /// Print the final CPU state as JSON instead of a register table
    #[arg(long)]
    json: bool,
    /// Print a linear disassembly of the image and exit
    #[arg(long)]
    disasm: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let text = std::fs::read_to_string(&opts.program)
        .with_context(|| format!("reading {}", opts.program.display()))?;
    let image = parse_hex(&text).with_context(|| format!("parsing {}", opts.program.display()))?;

    if opts.disasm {
        for line in listing(&image) {
            let bytes: Vec<String> = line.bytes.iter().map(|b| format!("{b:02X}")).collect();
            println!("{:06x}: {:<12} {}", line.addr, bytes.join(" "), line.text);
        }
        return Ok(());
    }

    let mut cfg = match &opts.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<CpuConfig>(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => CpuConfig {
            step_budget: Some(10_000_000),
            ..CpuConfig::default()
        },
    };
    if let Some(n) = opts.max_steps {
        cfg.step_budget = Some(n);
    }

    let mut mem = cfg.memory();
    mem.load(&image)?;
    let mut cpu = Cpu::new(cfg);
    let dec = RiscrDecoder::new();
    let exec = IntExecutor;

    let steps = cpu.run(&mut mem, &dec, &exec)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&cpu)?);
    } else {
        println!("halted after {steps} instructions, pc = {:#06x}", cpu.pc);
        for (i, name) in REGISTERS.iter().enumerate() {
            println!("{:>2} {:<4} {:#010x} ({})", i, name, cpu.gpr[i], cpu.gpr[i]);
        }
    }
    Ok(())
}
