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

use crate::cpu::Cpu;
use crate::errors::CpuError;
use crate::instruction::Instruction;
use crate::isa::Update;
use crate::types::Word;

/// r[a] = r[b] with its low half word sign-extended.
pub fn signh(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value as u16 as i16 as i32 as Word)?;
    Ok(Update::Pc)
}

/// r[a] = r[b] with its low quarter word sign-extended.
pub fn signq(cpu: &mut Cpu, inst: Instruction) -> Result<Update, CpuError> {
    let value = cpu.get_reg(inst.second)?;
    cpu.set_reg(inst.first, value as u8 as i8 as i32 as Word)?;
    Ok(Update::Pc)
}
