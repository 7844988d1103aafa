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

//! The processor: a big-endian 32-bit-word CPU with sixteen registers and a
//! 16-bit physical address space.
//!
//! Each cycle fetches the word at PC, decodes it, dispatches to the
//! registered operation and applies the returned [`Update`]. Faults raised
//! by an operation route through the interrupt vector when it is armed and
//! are swallowed otherwise; a fault raised while dispatching an interrupt
//! stops the CPU for good.

pub mod ops;

use tracing::{debug, trace};

use crate::cs::ControlStatus;
use crate::errors::{CpuError, SymbolKind};
use crate::instruction::Instruction;
use crate::isa::{self, Isa, Update};
use crate::memory::Memory;
use crate::types::{Address, Word};

pub const REGISTER_PC: u8 = 0xc;
pub const REGISTER_SP: u8 = 0xd;
pub const REGISTER_FP: u8 = 0xe;
pub const REGISTER_CS: u8 = 0xf;

const REGISTER_COUNT: u8 = 16;

pub struct Cpu {
    isa: Isa,
    registers: Memory,
    memory: Memory,
    running: bool,
}

impl Cpu {
    /// A CPU over `memory` with the standard instruction set and a zeroed
    /// register file.
    pub fn new(memory: Memory) -> Self {
        Cpu::with_state(
            Isa::standard(),
            Memory::new(REGISTER_COUNT as Address * 4),
            memory,
        )
    }

    /// A CPU over an existing register file and memory, e.g. blobs restored
    /// by the host. The register file grows to at least 64 bytes.
    pub fn with_state(isa: Isa, mut registers: Memory, memory: Memory) -> Self {
        let min_size = REGISTER_COUNT as Address * 4;
        if registers.size() < min_size {
            registers.resize(min_size);
        }

        Cpu {
            isa,
            registers,
            memory,
            running: true,
        }
    }

    pub fn isa(&self) -> &Isa {
        &self.isa
    }

    /// Mutable registry access, for installing custom instructions before a
    /// program starts.
    pub fn isa_mut(&mut self) -> &mut Isa {
        &mut self.isa
    }

    pub fn registers(&self) -> &Memory {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Run until a `stop` instruction (or an unrecoverable fault).
    pub fn execute(&mut self) -> Result<(), CpuError> {
        while self.running {
            self.next()?;
        }
        Ok(())
    }

    /// Run up to `cycles` fetch-execute cycles, returning how many were left
    /// when the CPU stopped.
    pub fn execute_cycles(&mut self, cycles: u32) -> Result<u32, CpuError> {
        let mut remaining = cycles;
        while self.running && remaining > 0 {
            self.next()?;
            remaining -= 1;
        }
        Ok(remaining)
    }

    /// Execute one instruction.
    pub fn next(&mut self) -> Result<(), CpuError> {
        if !self.running {
            return Err(CpuError::Halted);
        }

        match self.step() {
            Ok(Update::Pc) => {
                let pc = self.get_reg(REGISTER_PC)?;
                self.set_reg(REGISTER_PC, pc.wrapping_add(4))?;
            }
            Ok(Update::Interrupt) | Ok(Update::None) => {}
            Ok(Update::Stop) => self.running = false,
            Err(error) => self.recover(error)?,
        }

        Ok(())
    }

    pub fn get_reg(&self, reg: u8) -> Result<Word, CpuError> {
        self.registers.get_word(reg as Address * 4, true)
    }

    pub fn set_reg(&mut self, reg: u8, value: Word) -> Result<(), CpuError> {
        self.registers.set_word(reg as Address * 4, value, true)
    }

    pub fn get_mem(&self, address: Address) -> Result<Word, CpuError> {
        self.memory.get_word(address, true)
    }

    pub fn set_mem(&mut self, address: Address, value: Word) -> Result<(), CpuError> {
        self.memory.set_word(address, value, true)
    }

    /// External timer tick, taken at the next instruction boundary the host
    /// chooses to call it on.
    pub fn timer_interrupt(&mut self) -> Result<(), CpuError> {
        self.interrupt(isa::INTERRUPT_TIMER, 0, 0)
    }

    /// Raise interrupt `code` with the two payload words.
    ///
    /// Instruction-thrown interrupts advance PC past the raising instruction
    /// first, whether or not the interrupt is admitted. A masked interrupt
    /// (vector disarmed, budget exhausted or handler slot zero) returns
    /// silently.
    pub fn interrupt(&mut self, code: u8, r1: Word, r2: Word) -> Result<(), CpuError> {
        if self.isa.interrupt_info(code)?.thrown_by_inst {
            let pc = self.get_reg(REGISTER_PC)?;
            self.set_reg(REGISTER_PC, pc.wrapping_add(4))?;
        }

        if !self.interrupt_enabled(code)? {
            debug!(code, "interrupt masked");
            return Ok(());
        }

        let mut cs = ControlStatus::decode(self.get_reg(REGISTER_CS)?);
        let handler = self.get_mem(cs.itp as Address + 4 * code as Address)?;
        debug!(code, r1, r2, handler, "interrupt taken");

        // Save the whole register file on the stack, r0 through cs.
        for reg in 0..REGISTER_COUNT {
            let value = self.get_reg(reg)?;
            let sp = self.get_reg(REGISTER_SP)?;
            self.set_mem(sp, value)?;
            self.set_reg(REGISTER_SP, sp.wrapping_add(4))?;
        }
        let sp = self.get_reg(REGISTER_SP)?;
        self.set_reg(REGISTER_FP, sp)?;

        self.set_reg(0x0, code as Word)?;
        self.set_reg(0x1, r1)?;
        self.set_reg(0x2, r2)?;
        self.set_reg(REGISTER_PC, handler)?;

        cs.interrupt = true;
        cs.max_interrupts -= 1;
        self.set_reg(REGISTER_CS, cs.encode())
    }

    fn interrupt_enabled(&self, code: u8) -> Result<bool, CpuError> {
        let cs = ControlStatus::decode(self.get_reg(REGISTER_CS)?);
        let handler = self.get_mem(cs.itp as Address + 4 * code as Address)?;
        Ok(cs.enable && cs.max_interrupts > 0 && handler != 0)
    }

    fn step(&mut self) -> Result<Update, CpuError> {
        let pc = self.get_reg(REGISTER_PC)?;
        let inst = self.fetch_instruction()?;
        let info = self.isa.instruction_info(inst.code)?;
        trace!(pc, code = inst.code, name = %info.name, "execute");

        let func = info.func;
        func(self, inst)
    }

    fn fetch_instruction(&self) -> Result<Instruction, CpuError> {
        let pc = self.get_reg(REGISTER_PC)?;
        Ok(Instruction::decode(self.get_mem(pc)?))
    }

    fn recover(&mut self, error: CpuError) -> Result<(), CpuError> {
        if let Err(error) = self.deliver_fault(error) {
            // A fault inside the interrupt protocol itself cannot be
            // recovered from.
            self.running = false;
            return Err(error);
        }
        Ok(())
    }

    fn deliver_fault(&mut self, error: CpuError) -> Result<(), CpuError> {
        let pc = self.get_reg(REGISTER_PC)?;
        match error {
            CpuError::UnknownCode {
                kind: SymbolKind::Instruction,
                code,
            } => self.interrupt(isa::INTERRUPT_INSTRUCTION, pc, code as Word),
            CpuError::Memory { address } => self.interrupt(isa::INTERRUPT_MEMORY, pc, address),
            other => Err(other),
        }
    }
}
