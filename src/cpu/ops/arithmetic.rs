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

//! Arithmetic operations. All results wrap at 32 bits; immediates are
//! zero-extended. Division and modulo trap to the division-by-zero vector
//! on a zero divisor and leave the destination untouched.

use crate::cpu::{Cpu, REGISTER_PC};
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::{self, Update};
use crate::types::Word;

/// r[a] = r[b] + r[c].
pub fn add(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    let rhs = cpu.get_reg(inst.third())?;
    cpu.set_reg(inst.first, lhs.wrapping_add(rhs))?;
    Ok(Update::Pc)
}

/// r[a] = r[b] + immediate.
pub fn addi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, lhs.wrapping_add(inst.data as Word))?;
    Ok(Update::Pc)
}

/// r[a] = r[b] - r[c].
pub fn sub(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    let rhs = cpu.get_reg(inst.third())?;
    cpu.set_reg(inst.first, lhs.wrapping_sub(rhs))?;
    Ok(Update::Pc)
}

/// r[a] = r[b] - immediate.
pub fn subi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, lhs.wrapping_sub(inst.data as Word))?;
    Ok(Update::Pc)
}

/// Low 32 bits of r[b] * r[c]; signedness does not matter for the low half.
pub fn multl(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    let rhs = cpu.get_reg(inst.third())?;
    cpu.set_reg(inst.first, lhs.wrapping_mul(rhs))?;
    Ok(Update::Pc)
}

pub fn multli(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, lhs.wrapping_mul(inst.data as Word))?;
    Ok(Update::Pc)
}

/// High 32 bits of the signed product r[b] * r[c].
pub fn multh(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)? as i32 as i64;
    let rhs = cpu.get_reg(inst.third())? as i32 as i64;
    cpu.set_reg(inst.first, ((lhs * rhs) >> 32) as Word)?;
    Ok(Update::Pc)
}

pub fn multhi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)? as i32 as i64;
    let rhs = inst.data as i64;
    cpu.set_reg(inst.first, ((lhs * rhs) >> 32) as Word)?;
    Ok(Update::Pc)
}

/// High 32 bits of the unsigned product r[b] * r[c].
pub fn multhu(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)? as u64;
    let rhs = cpu.get_reg(inst.third())? as u64;
    cpu.set_reg(inst.first, ((lhs * rhs) >> 32) as Word)?;
    Ok(Update::Pc)
}

pub fn multhui(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let lhs = cpu.get_reg(inst.second)? as u64;
    let rhs = inst.data as u64;
    cpu.set_reg(inst.first, ((lhs * rhs) >> 32) as Word)?;
    Ok(Update::Pc)
}

fn divide(cpu: &mut Cpu, inst: Instruction, divisor: Word, remainder: bool) -> Result<Update, CpuError> {
    let dividend = cpu.get_reg(inst.second)?;
    if divisor == 0 {
        let pc = cpu.get_reg(REGISTER_PC)?;
        cpu.interrupt(isa::INTERRUPT_DIVISION, pc, dividend)?;
        return Ok(Update::Interrupt);
    }

    let result = if remainder {
        dividend % divisor
    } else {
        dividend / divisor
    };
    cpu.set_reg(inst.first, result)?;
    Ok(Update::Pc)
}

/// r[a] = r[b] / r[c], unsigned.
pub fn div(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let divisor = cpu.get_reg(inst.third())?;
    divide(cpu, inst, divisor, false)
}

pub fn divi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    divide(cpu, inst, inst.data as Word, false)
}

/// r[a] = r[b] % r[c], unsigned.
pub fn modulo(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let divisor = cpu.get_reg(inst.third())?;
    divide(cpu, inst, divisor, true)
}

pub fn moduloi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    divide(cpu, inst, inst.data as Word, true)
}
