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

//! Machine state exported at the host boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cpu::Cpu;
use crate::errors::CpuError;
use crate::types::Word;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub running: bool,
    /// Register values keyed by their registry names.
    pub registers: BTreeMap<String, Word>,
}

impl Snapshot {
    pub fn capture(cpu: &Cpu) -> Result<Self, CpuError> {
        let mut registers = BTreeMap::new();
        for code in cpu.isa().register_codes() {
            let name = cpu.isa().register_name(code)?.to_string();
            registers.insert(name, cpu.get_reg(code)?);
        }

        Ok(Snapshot {
            running: cpu.running(),
            registers,
        })
    }
}
