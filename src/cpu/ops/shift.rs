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

//! Shift and rotate operations. Amounts are taken mod 32; a rotate by a
//! multiple of 32 is the identity.
//!
//! `sra` ORs the saved sign bit back into the result instead of replicating
//! it across the shifted-in positions. That is the machine's contract, not
//! an approximation of two's-complement shifting.

use crate::cpu::Cpu;
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::Update;
use crate::types::Word;

const SIGN_BIT: Word = 0x8000_0000;

/// r[a] = r[b] << (r[c] % 32).
pub fn sll(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    let amount = cpu.get_reg(inst.third())? % 32;
    cpu.set_reg(inst.first, value << amount)?;
    Ok(Update::Pc)
}

pub fn slli(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value << (inst.data as Word % 32))?;
    Ok(Update::Pc)
}

/// r[a] = r[b] >> (r[c] % 32).
pub fn srl(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    let amount = cpu.get_reg(inst.third())? % 32;
    cpu.set_reg(inst.first, value >> amount)?;
    Ok(Update::Pc)
}

pub fn srli(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value >> (inst.data as Word % 32))?;
    Ok(Update::Pc)
}

/// Arithmetic shift left; identical to `sll`.
pub fn sla(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    sll(cpu, inst)
}

pub fn slai(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    slli(cpu, inst)
}

/// r[a] = (r[b] >> (r[c] % 32)) with the sign bit ORed back.
pub fn sra(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    let amount = cpu.get_reg(inst.third())? % 32;
    cpu.set_reg(inst.first, (value >> amount) | (value & SIGN_BIT))?;
    Ok(Update::Pc)
}

pub fn srai(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    let amount = inst.data as Word % 32;
    cpu.set_reg(inst.first, (value >> amount) | (value & SIGN_BIT))?;
    Ok(Update::Pc)
}

/// r[a] = r[b] rotated left by r[c] % 32.
pub fn rl(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    let amount = cpu.get_reg(inst.third())? % 32;
    cpu.set_reg(inst.first, value.rotate_left(amount))?;
    Ok(Update::Pc)
}

pub fn rli(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value.rotate_left(inst.data as u32 % 32))?;
    Ok(Update::Pc)
}

/// r[a] = r[b] rotated right by r[c] % 32.
pub fn rr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    let amount = cpu.get_reg(inst.third())? % 32;
    cpu.set_reg(inst.first, value.rotate_right(amount))?;
    Ok(Update::Pc)
}

pub fn rri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value.rotate_right(inst.data as u32 % 32))?;
    Ok(Update::Pc)
}
