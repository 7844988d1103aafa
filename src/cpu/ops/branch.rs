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

//! Branch operations. All branches are PC-relative with a sign-extended
//! 16-bit displacement.

use crate::cpu::{Cpu, REGISTER_PC};
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::Update;
use crate::types::Word;

fn taken(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let pc = cpu.get_reg(REGISTER_PC)?;
    cpu.set_reg(REGISTER_PC, pc.wrapping_add(inst.offset() as Word))?;
    Ok(Update::None)
}

fn branch_if(cpu: &mut Cpu, inst: Instruction, condition: bool) -> Result<Update, CpuError> {
    if condition {
        taken(cpu, inst)
    } else {
        Ok(Update::Pc)
    }
}

/// pc += offset, unconditionally.
pub fn b(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    taken(cpu, inst)
}

/// Branch if r[a] is zero.
pub fn bz(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.first)?;
    branch_if(cpu, inst, value == 0)
}

/// Branch if r[a] is not zero.
pub fn bnz(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.first)?;
    branch_if(cpu, inst, value != 0)
}

pub fn beq(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)?;
    let rhs = cpu.get_reg(inst.second)?;
    branch_if(cpu, inst, lhs == rhs)
}

pub fn bne(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)?;
    let rhs = cpu.get_reg(inst.second)?;
    branch_if(cpu, inst, lhs != rhs)
}

/// Signed r[a] < r[b].
pub fn blt(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)? as i32;
    let rhs = cpu.get_reg(inst.second)? as i32;
    branch_if(cpu, inst, lhs < rhs)
}

/// Unsigned r[a] < r[b].
pub fn bltu(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)?;
    let rhs = cpu.get_reg(inst.second)?;
    branch_if(cpu, inst, lhs < rhs)
}

pub fn bgt(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)? as i32;
    let rhs = cpu.get_reg(inst.second)? as i32;
    branch_if(cpu, inst, lhs > rhs)
}

pub fn bgtu(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)?;
    let rhs = cpu.get_reg(inst.second)?;
    branch_if(cpu, inst, lhs > rhs)
}

pub fn ble(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)? as i32;
    let rhs = cpu.get_reg(inst.second)? as i32;
    branch_if(cpu, inst, lhs <= rhs)
}

pub fn bleu(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)?;
    let rhs = cpu.get_reg(inst.second)?;
    branch_if(cpu, inst, lhs <= rhs)
}

pub fn bge(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)? as i32;
    let rhs = cpu.get_reg(inst.second)? as i32;
    branch_if(cpu, inst, lhs >= rhs)
}

pub fn bgeu(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.first)?;
    let rhs = cpu.get_reg(inst.second)?;
    branch_if(cpu, inst, lhs >= rhs)
}
