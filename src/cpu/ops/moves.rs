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

//! Move, stack, load and store operations.
//!
//! Half-word and quarter-word accesses address the low bits of the word at
//! the effective address: the loads zero-extend them, the stores replace
//! them and keep the rest of the word.

use crate::cpu::{Cpu, REGISTER_PC, REGISTER_SP};
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::Update;
use crate::types::{Address, Word};

const HALFWORD_MASK: Word = 0x0000_ffff;
const QUARTERWORD_MASK: Word = 0x0000_00ff;

/// r[a] = r[b].
pub fn move_reg(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value)?;
    Ok(Update::Pc)
}

/// r[a] = r[b] with its half words exchanged.
pub fn swap(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value.rotate_left(16))?;
    Ok(Update::Pc)
}

/// mem[sp] = r[a]; sp += 4. The stack grows upward.
pub fn push(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let sp = cpu.get_reg(REGISTER_SP)?;
    let value = cpu.get_reg(inst.first)?;
    cpu.set_mem(sp, value)?;
    cpu.set_reg(REGISTER_SP, sp.wrapping_add(4))?;
    Ok(Update::Pc)
}

/// sp -= 4; r[a] = mem[sp].
pub fn pop(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let sp = cpu.get_reg(REGISTER_SP)?.wrapping_sub(4);
    cpu.set_reg(REGISTER_SP, sp)?;
    let value = cpu.get_mem(sp)?;
    cpu.set_reg(inst.first, value)?;
    Ok(Update::Pc)
}

fn pc_relative(cpu: &Cpu, inst: Instruction) -> Result<Address, CpuError> {
    let pc = cpu.get_reg(REGISTER_PC)?;
    Ok(pc.wrapping_add(inst.offset() as Word))
}

fn indexed(cpu: &Cpu, inst: Instruction) -> Result<Address, CpuError> {
    let base = cpu.get_reg(inst.second)?;
    let index = cpu.get_reg(inst.third())?;
    Ok(base.wrapping_add(index))
}

fn based(cpu: &Cpu, inst: Instruction) -> Result<Address, CpuError> {
    let base = cpu.get_reg(inst.second)?;
    Ok(base.wrapping_add(inst.offset() as Word))
}

fn load_masked(cpu: &mut Cpu, inst: Instruction, addr: Address, mask: Word) -> Result<Update, CpuError> {
    let value = cpu.get_mem(addr)? & mask;
    cpu.set_reg(inst.first, value)?;
    Ok(Update::Pc)
}

/// r[a] = mem[pc + offset].
pub fn load(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    load_masked(cpu, inst, addr, !0)
}

/// r[a] = mem[r[b] + r[c]].
pub fn loadrr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = indexed(cpu, inst)?;
    load_masked(cpu, inst, addr, !0)
}

/// r[a] = mem[r[b] + offset].
pub fn loadri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = based(cpu, inst)?;
    load_masked(cpu, inst, addr, !0)
}

/// r[a] = mem[pc + offset] & 0xffff.
pub fn loadh(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    load_masked(cpu, inst, addr, HALFWORD_MASK)
}

pub fn loadhrr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = indexed(cpu, inst)?;
    load_masked(cpu, inst, addr, HALFWORD_MASK)
}

pub fn loadhri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = based(cpu, inst)?;
    load_masked(cpu, inst, addr, HALFWORD_MASK)
}

/// r[a] = mem[pc + offset] & 0xff.
pub fn loadq(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    load_masked(cpu, inst, addr, QUARTERWORD_MASK)
}

pub fn loadqrr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = indexed(cpu, inst)?;
    load_masked(cpu, inst, addr, QUARTERWORD_MASK)
}

pub fn loadqri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = based(cpu, inst)?;
    load_masked(cpu, inst, addr, QUARTERWORD_MASK)
}

/// r[a] = immediate, upper half cleared.
pub fn loadi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    cpu.set_reg(inst.first, inst.data as Word)?;
    Ok(Update::Pc)
}

/// r[a] = (r[a] & 0xffff) | immediate << 16.
pub fn loadhi(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let low = cpu.get_reg(inst.first)? & HALFWORD_MASK;
    cpu.set_reg(inst.first, low | (inst.data as Word) << 16)?;
    Ok(Update::Pc)
}

/// r[a] = pc + offset.
pub fn loada(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    cpu.set_reg(inst.first, addr)?;
    Ok(Update::Pc)
}

fn store_masked(cpu: &mut Cpu, addr: Address, src: Word, mask: Word) -> Result<Update, CpuError> {
    let dst = cpu.get_mem(addr)?;
    cpu.set_mem(addr, (dst & !mask) | (src & mask))?;
    Ok(Update::Pc)
}

/// mem[pc + offset] = r[a].
pub fn store(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    let value = cpu.get_reg(inst.first)?;
    cpu.set_mem(addr, value)?;
    Ok(Update::Pc)
}

/// mem[r[a] + r[c]] = r[b].
pub fn storerr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let base = cpu.get_reg(inst.first)?;
    let index = cpu.get_reg(inst.third())?;
    let value = cpu.get_reg(inst.second)?;
    cpu.set_mem(base.wrapping_add(index), value)?;
    Ok(Update::Pc)
}

/// mem[r[a] + offset] = r[b].
pub fn storeri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let base = cpu.get_reg(inst.first)?;
    let value = cpu.get_reg(inst.second)?;
    cpu.set_mem(base.wrapping_add(inst.offset() as Word), value)?;
    Ok(Update::Pc)
}

pub fn storeh(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    let src = cpu.get_reg(inst.first)?;
    store_masked(cpu, addr, src, HALFWORD_MASK)
}

pub fn storehrr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let base = cpu.get_reg(inst.first)?;
    let index = cpu.get_reg(inst.third())?;
    let src = cpu.get_reg(inst.second)?;
    store_masked(cpu, base.wrapping_add(index), src, HALFWORD_MASK)
}

pub fn storehri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let base = cpu.get_reg(inst.first)?;
    let src = cpu.get_reg(inst.second)?;
    store_masked(cpu, base.wrapping_add(inst.offset() as Word), src, HALFWORD_MASK)
}

pub fn storeq(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let addr = pc_relative(cpu, inst)?;
    let src = cpu.get_reg(inst.first)?;
    store_masked(cpu, addr, src, QUARTERWORD_MASK)
}

pub fn storeqrr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let base = cpu.get_reg(inst.first)?;
    let index = cpu.get_reg(inst.third())?;
    let src = cpu.get_reg(inst.second)?;
    store_masked(cpu, base.wrapping_add(index), src, QUARTERWORD_MASK)
}

pub fn storeqri(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let base = cpu.get_reg(inst.first)?;
    let src = cpu.get_reg(inst.second)?;
    store_masked(cpu, base.wrapping_add(inst.offset() as Word), src, QUARTERWORD_MASK)
}
