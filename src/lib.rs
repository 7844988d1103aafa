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

//! Weevil: a big-endian, 32-bit-word virtual machine with sixteen registers
//! and a 16-bit physical address space, together with its two-pass
//! assembler and its disassembler.
//!
//! The three share one [`isa::Isa`] registry: the CPU dispatches through it,
//! the assembler encodes against it, and the disassembler decodes with it.

pub mod cpu;
pub mod cs;
pub mod errors;
pub mod file;
pub mod instruction;
pub mod isa;
pub mod memory;
pub mod object;
pub mod snapshot;
pub mod source;
pub mod types;
pub mod word;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::isa::Isa;
use crate::object::Object;
use crate::source::Source;

/// Assemble the file at `source_path` into a flat big-endian object image,
/// searching `include_path` for `.include` files.
pub fn assemble(source_path: &Path, include_path: &[PathBuf]) -> Result<Vec<u8>> {
    let isa = Isa::standard();
    let mut source = Source::new(&isa, include_path.to_vec());

    source
        .load(source_path)
        .context("Failed to read the source file")?;

    source
        .preprocess()
        .context("Failed during preprocessing")?;

    source.assemble().context("Failed during encoding")
}

/// Disassemble the object image at `object_path` into source lines.
pub fn disassemble(object_path: &Path) -> Result<Vec<String>> {
    let isa = Isa::standard();
    let object = Object::new(&isa, object_path);

    let file = object.disassemble().context("Failed during decoding")?;
    Ok(file.iter().map(str::to_string).collect())
}
