use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use riscr::disasm::listing;
use riscr_asm::assemble;

#[derive(Parser, Debug)]
#[command(author, version, about = "RISCR assembler")]
struct Opts {
    /// Input assembly file (one instruction per line, `;` comments)
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Output hex image (default: input with a `.b` extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print an address / bytes / instruction listing of the result
    #[arg(long)]
    listing: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let text = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let program = assemble(&text).with_context(|| format!("assembling {}", opts.input.display()))?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| opts.input.with_extension("b"));
    fs::write(&output, program.to_hex())
        .with_context(|| format!("writing {}", output.display()))?;

    if opts.listing {
        for line in listing(&program.bytes()) {
            let bytes: Vec<String> = line.bytes.iter().map(|b| format!("{b:02X}")).collect();
            println!("{:06x}: {:<12} {}", line.addr, bytes.join(" "), line.text);
        }
    }
    println!("Output written to {}", output.display());
    Ok(())
}
