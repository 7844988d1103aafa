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

//! Call, return and software-interrupt operations.
//!
//! A call pushes the caller's FP and the call instruction's own PC, then
//! points FP at the new top of stack. `ret` rewinds SP from FP, restores
//! both words and advances past the call.

use crate::cpu::{Cpu, REGISTER_FP, REGISTER_PC, REGISTER_SP};
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::{self, Update};
use crate::types::{Address, Word};

fn enter_frame(cpu: &mut Cpu, address: Address) -> Result<Update, CpuError> {
    let sp = cpu.get_reg(REGISTER_SP)?;
    let fp = cpu.get_reg(REGISTER_FP)?;
    let pc = cpu.get_reg(REGISTER_PC)?;

    cpu.set_mem(sp, fp)?;
    cpu.set_mem(sp.wrapping_add(4), pc)?;
    cpu.set_reg(REGISTER_SP, sp.wrapping_add(8))?;
    cpu.set_reg(REGISTER_FP, sp.wrapping_add(8))?;
    cpu.set_reg(REGISTER_PC, address)?;
    Ok(Update::None)
}

/// Call the function at pc + offset.
pub fn call(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let pc = cpu.get_reg(REGISTER_PC)?;
    let address = pc.wrapping_add(inst.offset() as Word);
    // Probe the target so a bad address faults before the frame is built.
    cpu.get_mem(address)?;
    enter_frame(cpu, address)
}

/// Call the function at r[a].
pub fn callr(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let address = cpu.get_reg(inst.first)?;
    cpu.get_mem(address)?;
    enter_frame(cpu, address)
}

/// Raise the software interrupt with the immediate as payload.
pub fn int(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    cpu.interrupt(isa::INTERRUPT_SOFTWARE, inst.data as Word, 0)?;
    Ok(Update::Interrupt)
}

/// Tear down the frame built by `call`.
pub fn ret(cpu: &mut Cpu, _inst: Instruction) -> Result<Update, CpuError> {
    let sp = cpu.get_reg(REGISTER_FP)?.wrapping_sub(8);
    cpu.set_reg(REGISTER_SP, sp)?;

    let pc = cpu.get_mem(sp.wrapping_add(4))?;
    let fp = cpu.get_mem(sp)?;
    cpu.set_reg(REGISTER_PC, pc)?;
    cpu.set_reg(REGISTER_FP, fp)?;
    Ok(Update::Pc)
}

/// Return from an interrupt handler: pop the whole register file saved on
/// admission, cs through r0. PC and CS come back with the rest.
pub fn reti(cpu: &mut Cpu, _inst: Instruction) -> Result<Update, CpuError> {
    let fp = cpu.get_reg(REGISTER_FP)?;
    cpu.set_reg(REGISTER_SP, fp)?;

    for reg in (0..16).rev() {
        let sp = cpu.get_reg(REGISTER_SP)?.wrapping_sub(4);
        cpu.set_reg(REGISTER_SP, sp)?;
        let value = cpu.get_mem(sp)?;
        cpu.set_reg(reg, value)?;
    }

    Ok(Update::None)
}
