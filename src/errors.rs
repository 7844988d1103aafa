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

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Symbol domains of the ISA registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Instruction,
    Register,
    Interrupt,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Instruction => write!(f, "instruction"),
            SymbolKind::Register => write!(f, "register"),
            SymbolKind::Interrupt => write!(f, "interrupt"),
        }
    }
}

/// Faults raised by the processor core and its support types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("byte {index} of a word is out of range")]
    WordByte { index: u8 },

    #[error("address 0x{address:08X} is out of range")]
    Memory { address: u32 },

    #[error("{kind} 0x{code:02X} not found")]
    UnknownCode { kind: SymbolKind, code: u8 },

    #[error("{kind} {name} not found")]
    UnknownName { kind: SymbolKind, name: String },

    #[error("{kind} 0x{code:02X} already registered")]
    DuplicateCode { kind: SymbolKind, code: u8 },

    #[error("{kind} {name} already registered")]
    DuplicateName { kind: SymbolKind, name: String },

    #[error("the CPU is stopped")]
    Halted,
}

/// Errors raised while assembling or disassembling.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("syntax error: {0}")]
    Syntax(#[from] pest::error::Error<crate::source::line::Rule>),

    #[error("line {line} is out of range")]
    Line { line: usize },

    #[error("line: {line}\n{reason}")]
    Parse { line: String, reason: String },

    #[error("file {name} not found")]
    NotFound { name: String },

    #[error("file {path:?} is not readable")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file {path:?} is not writable")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the size of {path:?} ({size}) is not a multiple of 32 bits")]
    Misaligned { path: PathBuf, size: u64 },

    #[error(transparent)]
    Core(#[from] CpuError),
}

impl AssemblyError {
    /// Attach the offending line text to an error raised while encoding it.
    pub fn at_line(line: &str, reason: impl fmt::Display) -> Self {
        AssemblyError::Parse {
            line: line.to_string(),
            reason: reason.to_string(),
        }
    }
}
