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

//! The disassembler.
//!
//! Reads an object image word by word and reconstructs source text from the
//! registry. A word whose opcode or register operands cannot be resolved is
//! emitted as a raw `0x%08x` literal.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AssemblyError, CpuError, SymbolKind};
use crate::file::File;
use crate::instruction::Instruction;
use crate::isa::Isa;
use crate::types::Word;

pub struct Object<'a> {
    isa: &'a Isa,
    path: PathBuf,
}

impl<'a> Object<'a> {
    pub fn new(isa: &'a Isa, path: impl Into<PathBuf>) -> Self {
        Object {
            isa,
            path: path.into(),
        }
    }

    /// Disassemble the image and write the text to `out`.
    pub fn decompile(&self, out: &Path) -> Result<(), AssemblyError> {
        self.disassemble()?.save(out)
    }

    /// Disassemble the image into source lines, one per word.
    pub fn disassemble(&self) -> Result<File, AssemblyError> {
        let bytes = fs::read(&self.path).map_err(|source| AssemblyError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        if bytes.is_empty() || bytes.len() % 4 != 0 {
            return Err(AssemblyError::Misaligned {
                path: self.path.clone(),
                size: bytes.len() as u64,
            });
        }

        let mut file = File::new();
        for (i, chunk) in bytes.chunks_exact(4).enumerate() {
            let word = Word::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let text = self
                .decompile_word(word)
                .unwrap_or_else(|_| format!("0x{word:08x}"));
            file.insert(i, &text)?;
        }
        Ok(file)
    }

    fn decompile_word(&self, word: Word) -> Result<String, CpuError> {
        let inst = Instruction::decode(word);
        let info = self.isa.instruction_info(inst.code)?;

        let mut text = info.name.clone();
        if info.nregs > 0 {
            text.push(' ');
            text.push_str(self.isa.register_name(inst.first)?);
        }
        if info.nregs > 1 {
            text.push(' ');
            text.push_str(self.isa.register_name(inst.second)?);
        }
        if info.nregs > 2 {
            // The reserved bits above the third-register nibble must be
            // clear, or the word does not name a register at all.
            if inst.data > 0x0f {
                return Err(CpuError::UnknownCode {
                    kind: SymbolKind::Register,
                    code: inst.third(),
                });
            }
            text.push(' ');
            text.push_str(self.isa.register_name(inst.third())?);
        } else if info.has_immediate {
            text.push_str(&format!(" 0x{:x}", inst.data));
        }

        Ok(text)
    }
}
