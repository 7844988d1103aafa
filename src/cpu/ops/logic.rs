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

//! Bitwise operations. Named with an `l` prefix where the mnemonic would
//! collide with a keyword.

use crate::cpu::Cpu;
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::Update;
use crate::types::Word;

/// r[a] = !r[b].
pub fn lnot(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, !value)?;
    Ok(Update::Pc)
}

/// r[a] = r[b] | r[c].
pub fn lor(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    let rhs = cpu.get_reg(inst.third())?;
    cpu.set_reg(inst.first, lhs | rhs)?;
    Ok(Update::Pc)
}

pub fn lori(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, lhs | inst.data as Word)?;
    Ok(Update::Pc)
}

/// r[a] = r[b] & r[c].
pub fn land(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    let rhs = cpu.get_reg(inst.third())?;
    cpu.set_reg(inst.first, lhs & rhs)?;
    Ok(Update::Pc)
}

pub fn landi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, lhs & inst.data as Word)?;
    Ok(Update::Pc)
}

/// r[a] = r[b] ^ r[c].
pub fn lxor(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    let rhs = cpu.get_reg(inst.third())?;
    cpu.set_reg(inst.first, lhs ^ rhs)?;
    Ok(Update::Pc)
}

pub fn lxori(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, lhs ^ inst.data as Word)?;
    Ok(Update::Pc)
}
