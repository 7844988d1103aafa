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

/// Halt the CPU.
pub fn stop(_cpu: &mut Cpu, _inst: Instruction) -> Result<Update, CpuError> {
    Ok(Update::Stop)
}

/// Zero all sixteen registers, PC included.
pub fn restart(cpu: &mut Cpu, _inst: Instruction) -> Result<Update, CpuError> {
    for reg in 0..16 {
        cpu.set_reg(reg, 0)?;
    }
    Ok(Update::None)
}
