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

//! The instruction set registry.
//!
//! Four bijective associations shared by the CPU, the assembler and the
//! disassembler: opcodes, register codes and interrupt codes, each mapped to
//! and from their names. The registry is built once and treated as read-only
//! by running code, but custom instructions can be added or removed before a
//! program starts.

use std::collections::{BTreeMap, HashMap};

use crate::cpu::{Cpu, ops};
use crate::errors::{CpuError, SymbolKind};
use crate::instruction::Instruction;

pub const INTERRUPT_TIMER: u8 = 0x0;
pub const INTERRUPT_SOFTWARE: u8 = 0x1;
pub const INTERRUPT_INSTRUCTION: u8 = 0x2;
pub const INTERRUPT_MEMORY: u8 = 0x3;
pub const INTERRUPT_DIVISION: u8 = 0x4;

/// How the CPU adjusts PC after an operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Advance PC by one word.
    Pc,
    /// The operation entered an interrupt; PC is already in place.
    Interrupt,
    /// Halt the CPU.
    Stop,
    /// The operation set PC itself (branches, calls).
    None,
}

/// The body of one operation.
pub type Operation = fn(&mut Cpu, Instruction) -> Result<Update, CpuError>;

#[derive(Debug, Clone)]
pub struct InstructionInfo {
    pub code: u8,
    pub name: String,
    /// Number of register operands, 0 to 3.
    pub nregs: u8,
    /// Whether the 16-bit field carries an immediate.
    pub has_immediate: bool,
    pub func: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptInfo {
    pub code: u8,
    pub name: String,
    /// True for interrupts raised by executing an instruction; such
    /// interrupts step PC past the raising instruction first.
    pub thrown_by_inst: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Isa {
    instructions: BTreeMap<u8, InstructionInfo>,
    instruction_codes: HashMap<String, u8>,
    registers: BTreeMap<u8, String>,
    register_codes: HashMap<String, u8>,
    interrupts: BTreeMap<u8, InterruptInfo>,
    interrupt_codes: HashMap<String, u8>,
}

const STANDARD_REGISTERS: &[(u8, &str)] = &[
    (0x0, "r0"),
    (0x1, "r1"),
    (0x2, "r2"),
    (0x3, "r3"),
    (0x4, "r4"),
    (0x5, "r5"),
    (0x6, "r6"),
    (0x7, "r7"),
    (0x8, "r8"),
    (0x9, "r9"),
    (0xa, "r10"),
    (0xb, "r11"),
    (0xc, "pc"),
    (0xd, "sp"),
    (0xe, "fp"),
    (0xf, "cs"),
];

const STANDARD_INTERRUPTS: &[(u8, &str, bool)] = &[
    (INTERRUPT_TIMER, "TimerInterrupt", false),
    (INTERRUPT_SOFTWARE, "SoftwareInterrupt", true),
    (INTERRUPT_INSTRUCTION, "InvalidInstruction", true),
    (INTERRUPT_MEMORY, "InvalidMemoryLocation", true),
    (INTERRUPT_DIVISION, "DivisionByZero", true),
];

const STANDARD_INSTRUCTIONS: &[(u8, &str, u8, bool, Operation)] = &[
    // Management
    (0x00, "stop", 0, false, ops::stop),
    (0x01, "restart", 0, false, ops::restart),
    // Move
    (0x10, "move", 2, false, ops::move_reg),
    (0x12, "swap", 2, false, ops::swap),
    // Stack
    (0x18, "push", 1, false, ops::push),
    (0x1a, "pop", 1, false, ops::pop),
    // Load
    (0x20, "load", 1, true, ops::load),
    (0x22, "loadrr", 3, false, ops::loadrr),
    (0x23, "loadri", 2, true, ops::loadri),
    (0x24, "loadh", 1, true, ops::loadh),
    (0x26, "loadhrr", 3, false, ops::loadhrr),
    (0x27, "loadhri", 2, true, ops::loadhri),
    (0x28, "loadq", 1, true, ops::loadq),
    (0x2a, "loadqrr", 3, false, ops::loadqrr),
    (0x2b, "loadqri", 2, true, ops::loadqri),
    (0x2c, "loadi", 1, true, ops::loadi),
    (0x2d, "loadhi", 1, true, ops::loadhi),
    (0x2e, "loada", 1, true, ops::loada),
    // Store
    (0x30, "store", 1, true, ops::store),
    (0x32, "storerr", 3, false, ops::storerr),
    (0x33, "storeri", 2, true, ops::storeri),
    (0x34, "storeh", 1, true, ops::storeh),
    (0x36, "storehrr", 3, false, ops::storehrr),
    (0x37, "storehri", 2, true, ops::storehri),
    (0x38, "storeq", 1, true, ops::storeq),
    (0x3a, "storeqrr", 3, false, ops::storeqrr),
    (0x3b, "storeqri", 2, true, ops::storeqri),
    // Branch
    (0x40, "b", 0, true, ops::b),
    (0x42, "bz", 1, true, ops::bz),
    (0x43, "bnz", 1, true, ops::bnz),
    (0x44, "beq", 2, true, ops::beq),
    (0x45, "bne", 2, true, ops::bne),
    (0x46, "blt", 2, true, ops::blt),
    (0x47, "bltu", 2, true, ops::bltu),
    (0x48, "bgt", 2, true, ops::bgt),
    (0x49, "bgtu", 2, true, ops::bgtu),
    (0x4a, "ble", 2, true, ops::ble),
    (0x4b, "bleu", 2, true, ops::bleu),
    (0x4c, "bge", 2, true, ops::bge),
    (0x4d, "bgeu", 2, true, ops::bgeu),
    // Function
    (0x50, "call", 0, true, ops::call),
    (0x51, "callr", 1, false, ops::callr),
    (0x52, "int", 0, true, ops::int),
    (0x54, "ret", 0, false, ops::ret),
    (0x55, "reti", 0, false, ops::reti),
    // Arithmetic
    (0x60, "add", 3, false, ops::add),
    (0x61, "addi", 2, true, ops::addi),
    (0x62, "sub", 3, false, ops::sub),
    (0x63, "subi", 2, true, ops::subi),
    (0x64, "multl", 3, false, ops::multl),
    (0x65, "multli", 2, true, ops::multli),
    (0x66, "multh", 3, false, ops::multh),
    (0x67, "multhi", 2, true, ops::multhi),
    (0x68, "multhu", 3, false, ops::multhu),
    (0x69, "multhui", 2, true, ops::multhui),
    (0x6a, "div", 3, false, ops::div),
    (0x6b, "divi", 2, true, ops::divi),
    (0x6c, "mod", 3, false, ops::modulo),
    (0x6d, "modi", 2, true, ops::moduloi),
    // Sign extension
    (0x70, "signh", 2, false, ops::signh),
    (0x71, "signq", 2, false, ops::signq),
    // Logic
    (0x80, "not", 2, false, ops::lnot),
    (0x88, "or", 3, false, ops::lor),
    (0x89, "ori", 2, true, ops::lori),
    (0x8a, "and", 3, false, ops::land),
    (0x8b, "andi", 2, true, ops::landi),
    (0x8c, "xor", 3, false, ops::lxor),
    (0x8d, "xori", 2, true, ops::lxori),
    // Shift
    (0x90, "sll", 3, false, ops::sll),
    (0x91, "slli", 2, true, ops::slli),
    (0x92, "srl", 3, false, ops::srl),
    (0x93, "srli", 2, true, ops::srli),
    (0x94, "sla", 3, false, ops::sla),
    (0x95, "slai", 2, true, ops::slai),
    (0x96, "sra", 3, false, ops::sra),
    (0x97, "srai", 2, true, ops::srai),
    (0x98, "rl", 3, false, ops::rl),
    (0x99, "rli", 2, true, ops::rli),
    (0x9a, "rr", 3, false, ops::rr),
    (0x9b, "rri", 2, true, ops::rri),
];

impl Isa {
    /// An empty registry.
    pub fn new() -> Self {
        Isa::default()
    }

    /// The registry with the default register, interrupt and instruction
    /// sets installed.
    pub fn standard() -> Self {
        let mut isa = Isa::new();

        for &(code, name) in STANDARD_REGISTERS {
            isa.add_register(code, name)
                .expect("the standard register set is duplicate-free");
        }
        for &(code, name, thrown_by_inst) in STANDARD_INTERRUPTS {
            isa.add_interrupt(code, name, thrown_by_inst)
                .expect("the standard interrupt set is duplicate-free");
        }
        for &(code, name, nregs, has_immediate, func) in STANDARD_INSTRUCTIONS {
            isa.add_instruction(code, name, nregs, has_immediate, func)
                .expect("the standard instruction set is duplicate-free");
        }

        isa
    }

    pub fn add_instruction(
        &mut self,
        code: u8,
        name: &str,
        nregs: u8,
        has_immediate: bool,
        func: Operation,
    ) -> Result<(), CpuError> {
        if self.instructions.contains_key(&code) {
            return Err(CpuError::DuplicateCode {
                kind: SymbolKind::Instruction,
                code,
            });
        }
        if self.instruction_codes.contains_key(name) {
            return Err(CpuError::DuplicateName {
                kind: SymbolKind::Instruction,
                name: name.to_string(),
            });
        }

        self.instructions.insert(
            code,
            InstructionInfo {
                code,
                name: name.to_string(),
                nregs,
                has_immediate,
                func,
            },
        );
        self.instruction_codes.insert(name.to_string(), code);
        Ok(())
    }

    pub fn remove_instruction(&mut self, code: u8) -> Result<(), CpuError> {
        let info = self
            .instructions
            .remove(&code)
            .ok_or(CpuError::UnknownCode {
                kind: SymbolKind::Instruction,
                code,
            })?;
        self.instruction_codes.remove(&info.name);
        Ok(())
    }

    pub fn add_register(&mut self, code: u8, name: &str) -> Result<(), CpuError> {
        if self.registers.contains_key(&code) {
            return Err(CpuError::DuplicateCode {
                kind: SymbolKind::Register,
                code,
            });
        }
        if self.register_codes.contains_key(name) {
            return Err(CpuError::DuplicateName {
                kind: SymbolKind::Register,
                name: name.to_string(),
            });
        }

        self.registers.insert(code, name.to_string());
        self.register_codes.insert(name.to_string(), code);
        Ok(())
    }

    pub fn remove_register(&mut self, code: u8) -> Result<(), CpuError> {
        let name = self.registers.remove(&code).ok_or(CpuError::UnknownCode {
            kind: SymbolKind::Register,
            code,
        })?;
        self.register_codes.remove(&name);
        Ok(())
    }

    pub fn add_interrupt(
        &mut self,
        code: u8,
        name: &str,
        thrown_by_inst: bool,
    ) -> Result<(), CpuError> {
        if self.interrupts.contains_key(&code) {
            return Err(CpuError::DuplicateCode {
                kind: SymbolKind::Interrupt,
                code,
            });
        }
        if self.interrupt_codes.contains_key(name) {
            return Err(CpuError::DuplicateName {
                kind: SymbolKind::Interrupt,
                name: name.to_string(),
            });
        }

        self.interrupts.insert(
            code,
            InterruptInfo {
                code,
                name: name.to_string(),
                thrown_by_inst,
            },
        );
        self.interrupt_codes.insert(name.to_string(), code);
        Ok(())
    }

    pub fn remove_interrupt(&mut self, code: u8) -> Result<(), CpuError> {
        let info = self.interrupts.remove(&code).ok_or(CpuError::UnknownCode {
            kind: SymbolKind::Interrupt,
            code,
        })?;
        self.interrupt_codes.remove(&info.name);
        Ok(())
    }

    pub fn instruction_info(&self, code: u8) -> Result<&InstructionInfo, CpuError> {
        self.instructions.get(&code).ok_or(CpuError::UnknownCode {
            kind: SymbolKind::Instruction,
            code,
        })
    }

    pub fn instruction_code(&self, name: &str) -> Result<u8, CpuError> {
        self.instruction_codes
            .get(name)
            .copied()
            .ok_or_else(|| CpuError::UnknownName {
                kind: SymbolKind::Instruction,
                name: name.to_string(),
            })
    }

    pub fn register_name(&self, code: u8) -> Result<&str, CpuError> {
        self.registers
            .get(&code)
            .map(String::as_str)
            .ok_or(CpuError::UnknownCode {
                kind: SymbolKind::Register,
                code,
            })
    }

    pub fn register_code(&self, name: &str) -> Result<u8, CpuError> {
        self.register_codes
            .get(name)
            .copied()
            .ok_or_else(|| CpuError::UnknownName {
                kind: SymbolKind::Register,
                name: name.to_string(),
            })
    }

    pub fn interrupt_info(&self, code: u8) -> Result<&InterruptInfo, CpuError> {
        self.interrupts.get(&code).ok_or(CpuError::UnknownCode {
            kind: SymbolKind::Interrupt,
            code,
        })
    }

    pub fn interrupt_code(&self, name: &str) -> Result<u8, CpuError> {
        self.interrupt_codes
            .get(name)
            .copied()
            .ok_or_else(|| CpuError::UnknownName {
                kind: SymbolKind::Interrupt,
                name: name.to_string(),
            })
    }

    pub fn instruction_codes(&self) -> Vec<u8> {
        self.instructions.keys().copied().collect()
    }

    pub fn register_codes(&self) -> Vec<u8> {
        self.registers.keys().copied().collect()
    }

    pub fn interrupt_codes(&self) -> Vec<u8> {
        self.interrupts.keys().copied().collect()
    }
}
