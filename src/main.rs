/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use weevil::cpu::{Cpu, REGISTER_PC};
use weevil::isa::Isa;
use weevil::memory::Memory;
use weevil::snapshot::Snapshot;

#[derive(Parser)]
#[command(version, about = "Toolchain for the Weevil virtual machine")]
struct Opts {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a source file into a flat object image.
    Asm {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Extra directories searched by `.include`, after the source's own.
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,
    },
    /// Disassemble an object image back into source text.
    Disasm {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Load an object image at address zero and run it.
    Run {
        #[arg(short, long)]
        input: PathBuf,
        /// A 64-byte register file blob to preload.
        #[arg(long)]
        registers: Option<PathBuf>,
        /// Memory size in bytes.
        #[arg(long, default_value_t = 0x1_0000)]
        memory: u32,
        /// Stop after this many cycles (0 = run until `stop`).
        #[arg(long, default_value_t = 0)]
        cycles: u64,
        /// Raise the timer interrupt every N cycles (0 = never).
        #[arg(long, default_value_t = 0)]
        timer: u64,
        /// Write a JSON snapshot of the final machine state here.
        #[arg(long)]
        dump: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Opts::parse().command {
        Commands::Asm {
            input,
            output,
            include,
        } => asm(&input, &output, include),
        Commands::Disasm { input, output } => disasm(&input, &output),
        Commands::Run {
            input,
            registers,
            memory,
            cycles,
            timer,
            dump,
        } => run(&input, registers, memory, cycles, timer, dump),
    }
}

fn asm(input: &Path, output: &Path, include: Vec<PathBuf>) -> Result<()> {
    let mut include_path = vec![input.parent().unwrap_or(Path::new(".")).to_path_buf()];
    include_path.extend(include);

    let image = weevil::assemble(input, &include_path)?;
    fs::write(output, &image)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Assembled {} to {} ({} words)",
        input.display(),
        output.display(),
        image.len() / 4
    );
    Ok(())
}

fn disasm(input: &Path, output: &Path) -> Result<()> {
    let lines = weevil::disassemble(input)?;
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(output, text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Disassembled {} to {}", input.display(), output.display());
    Ok(())
}

fn run(
    input: &Path,
    registers: Option<PathBuf>,
    memory_size: u32,
    cycles: u64,
    timer: u64,
    dump: Option<PathBuf>,
) -> Result<()> {
    let image =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    if image.len() as u64 > memory_size as u64 {
        bail!(
            "image ({} bytes) does not fit in {} bytes of memory",
            image.len(),
            memory_size
        );
    }

    let mut memory = Memory::new(memory_size);
    memory.write_bytes(0, &image)?;

    let mut cpu = match registers {
        Some(path) => {
            let blob = fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if blob.len() != 64 {
                bail!("register blob must be exactly 64 bytes, got {}", blob.len());
            }
            let mut register_file = Memory::new(64);
            register_file.write_bytes(0, &blob)?;
            Cpu::with_state(Isa::standard(), register_file, memory)
        }
        None => Cpu::new(memory),
    };

    let mut executed: u64 = 0;
    while cpu.running() {
        if cycles != 0 && executed >= cycles {
            break;
        }
        cpu.next()?;
        executed += 1;
        if timer != 0 && executed % timer == 0 {
            cpu.timer_interrupt()?;
        }
    }

    let snapshot = Snapshot::capture(&cpu)?;
    if let Some(path) = dump {
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!(
        "{} after {} cycles, pc = 0x{:08x}",
        if cpu.running() { "Paused" } else { "Stopped" },
        executed,
        cpu.get_reg(REGISTER_PC)?
    );
    Ok(())
}
