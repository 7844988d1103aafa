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

//! The assembler.
//!
//! `preprocess` rewrites the loaded source in place over four passes
//! (include expansion, block expansion, constant substitution, label
//! resolution), after which only instructions and data words remain.
//! `assemble` then emits one big-endian word per remaining line.

pub mod line;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::AssemblyError;
use crate::file::File;
use crate::instruction::Instruction;
use crate::isa::Isa;
use crate::types::{Address, Word};

use line::{Line, classify};

pub struct Source<'a> {
    file: File,
    isa: &'a Isa,
    include_path: Vec<PathBuf>,
    includes: HashSet<PathBuf>,
    defines: BTreeMap<String, String>,
    labels: BTreeMap<String, Address>,
}

impl<'a> Source<'a> {
    pub fn new(isa: &'a Isa, include_path: Vec<PathBuf>) -> Self {
        Source {
            file: File::new(),
            isa,
            include_path,
            includes: HashSet::new(),
            defines: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }

    /// Load the main source file. The file's own canonical path is recorded
    /// so it cannot include itself.
    pub fn load(&mut self, path: &Path) -> Result<(), AssemblyError> {
        self.file.load(path)?;
        self.includes.clear();

        let absolute = fs::canonicalize(path).map_err(|source| AssemblyError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.includes.insert(absolute);
        Ok(())
    }

    /// The current text, useful after `preprocess`.
    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn preprocess(&mut self) -> Result<(), AssemblyError> {
        self.replace_includes()?;
        self.replace_blocks()?;
        self.replace_defines()?;
        self.replace_labels()
    }

    /// Preprocess and encode into a flat big-endian image.
    pub fn assemble(&mut self) -> Result<Vec<u8>, AssemblyError> {
        self.preprocess()?;

        let mut image = Vec::new();
        for i in 0..self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            match classify(&text) {
                Ok(Line::Blank) | Ok(Line::Comment) => continue,
                Ok(kind) => image.extend(self.encode_line(&text, kind)?.to_be_bytes()),
                Err(_) => return Err(AssemblyError::at_line(&text, "unrecognized line")),
            }
        }

        debug!(words = image.len() / 4, "assembled");
        Ok(image)
    }

    /// Assemble and write the image to `out`.
    pub fn compile(&mut self, out: &Path) -> Result<(), AssemblyError> {
        let image = self.assemble()?;
        fs::write(out, image).map_err(|source| AssemblyError::Unwritable {
            path: out.to_path_buf(),
            source,
        })
    }

    /// Pass 1: splice included files in place of their directives. Scanning
    /// resumes at the first spliced line, so nested includes expand too.
    fn replace_includes(&mut self) -> Result<(), AssemblyError> {
        let mut i = 0;
        while i < self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            let Ok(Line::Include(name)) = classify(&text) else {
                i += 1;
                continue;
            };

            let found = self.find_include(&name)?;
            let absolute =
                fs::canonicalize(&found).map_err(|source| AssemblyError::Unreadable {
                    path: found.clone(),
                    source,
                })?;
            if self.includes.contains(&absolute) {
                return Err(AssemblyError::at_line(
                    &text,
                    format!("file {} already included", absolute.display()),
                ));
            }

            debug!(file = %absolute.display(), "including");
            let mut included = File::new();
            included.load(&absolute)?;
            self.file.remove(i, 1)?;
            self.file.insert_file(i, &included)?;
            self.includes.insert(absolute);
        }
        Ok(())
    }

    fn find_include(&self, name: &str) -> Result<PathBuf, AssemblyError> {
        for dir in &self.include_path {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(AssemblyError::NotFound {
            name: name.to_string(),
        })
    }

    /// Pass 2: expand each `.block N` into ceil(N / 4) zero data words.
    fn replace_blocks(&mut self) -> Result<(), AssemblyError> {
        let mut i = 0;
        while i < self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            let Ok(Line::Block(size)) = classify(&text) else {
                i += 1;
                continue;
            };

            self.file.remove(i, 1)?;
            let words = size.div_ceil(4) as usize;
            for _ in 0..words {
                self.file.insert(i, "0x00000000")?;
            }
            i += words;
        }
        Ok(())
    }

    /// Pass 3: collect every `.define`, then substitute the names across all
    /// non-comment lines. Substitution is textual and does not protect
    /// inline comments.
    fn replace_defines(&mut self) -> Result<(), AssemblyError> {
        let mut i = 0;
        while i < self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            let Ok(Line::Define { name, value }) = classify(&text) else {
                i += 1;
                continue;
            };

            if self.defines.contains_key(&name) {
                return Err(AssemblyError::at_line(
                    &text,
                    format!("constant {name} already defined"),
                ));
            }
            if line::parse_number(&value, &text)? > 0xffff {
                return Err(AssemblyError::at_line(
                    &text,
                    format!("{value} does not fit in 16 bits"),
                ));
            }
            self.file.remove(i, 1)?;
            self.defines.insert(name, value);
        }

        for i in 0..self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            if matches!(classify(&text), Ok(Line::Comment)) {
                continue;
            }
            let mut replaced = text;
            for (name, value) in &self.defines {
                replaced = replace_word(&replaced, name, value);
            }
            self.file.set_line(i, &replaced)?;
        }
        Ok(())
    }

    /// Pass 4: record each `.label` at four bytes per preceding code or data
    /// line, then rewrite label uses. A label standing alone on a line
    /// becomes its absolute byte address; a label inside an instruction
    /// becomes the PC-relative word offset.
    fn replace_labels(&mut self) -> Result<(), AssemblyError> {
        let mut i = 0;
        let mut words: Address = 0;
        while i < self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            match classify(&text) {
                Ok(Line::Label(name)) => {
                    if self.labels.contains_key(&name) {
                        return Err(AssemblyError::at_line(
                            &text,
                            format!("label {name} already defined"),
                        ));
                    }
                    self.file.remove(i, 1)?;
                    self.labels.insert(name, words * 4);
                }
                Ok(Line::Data(_)) | Ok(Line::Statement(_)) => {
                    words += 1;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        let mut words: Address = 0;
        for i in 0..self.file.lines() {
            let text = self.file.get_line(i)?.to_string();
            match classify(&text) {
                Ok(Line::Statement(tokens)) => {
                    let mut replaced = text;
                    if tokens.len() == 1 {
                        for (name, address) in &self.labels {
                            replaced = replace_word(&replaced, name, &format!("{address:#x}"));
                        }
                    } else {
                        for (name, address) in &self.labels {
                            let offset = address.wrapping_sub(words * 4) as u16;
                            replaced = replace_word(&replaced, name, &format!("0x{offset:04x}"));
                        }
                    }
                    self.file.set_line(i, &replaced)?;
                    words += 1;
                }
                Ok(Line::Data(_)) => words += 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn encode_line(&self, text: &str, kind: Line) -> Result<Word, AssemblyError> {
        match kind {
            Line::Data(word) => Ok(word),
            Line::Statement(tokens) => self.encode_statement(text, &tokens),
            _ => Err(AssemblyError::at_line(
                text,
                "directive left after preprocessing",
            )),
        }
    }

    fn encode_statement(&self, text: &str, tokens: &[String]) -> Result<Word, AssemblyError> {
        let code = self
            .isa
            .instruction_code(&tokens[0])
            .map_err(|e| AssemblyError::at_line(text, e))?;
        let info = self
            .isa
            .instruction_info(code)
            .map_err(|e| AssemblyError::at_line(text, e))?;

        let expected = 1 + info.nregs as usize + info.has_immediate as usize;
        if tokens.len() != expected {
            return Err(AssemblyError::at_line(
                text,
                format!("wrong number of parameters ({})", tokens.len() - 1),
            ));
        }

        let mut inst = Instruction::new(code, 0, 0, 0);
        if info.nregs >= 1 {
            inst.first = self.register(text, &tokens[1])?;
        }
        if info.nregs >= 2 {
            inst.second = self.register(text, &tokens[2])?;
        }
        if info.nregs == 3 {
            inst.data = self.register(text, &tokens[3])? as u16;
        } else if info.has_immediate {
            let token = &tokens[expected - 1];
            let value = line::parse_number(token, text)?;
            if value > 0xffff {
                return Err(AssemblyError::at_line(
                    text,
                    format!("{token} does not fit in 16 bits"),
                ));
            }
            inst.data = value as u16;
        }

        Ok(inst.encode())
    }

    fn register(&self, text: &str, name: &str) -> Result<u8, AssemblyError> {
        self.isa
            .register_code(name)
            .map_err(|e| AssemblyError::at_line(text, e))
    }
}

/// Replace whole-word occurrences of `name` (bounded by non-identifier
/// characters) with `value`.
fn replace_word(text: &str, name: &str, value: &str) -> String {
    let bytes = text.as_bytes();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        if text[i..].starts_with(name) {
            let end = i + name.len();
            let before_ok = i == 0 || !is_word_byte(bytes[i - 1]);
            let after_ok = end == text.len() || !is_word_byte(bytes[end]);
            if before_ok && after_ok {
                result.push_str(value);
                i = end;
                continue;
            }
        }

        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        result.push(ch);
        i += ch.len_utf8();
    }

    result
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_word_respects_boundaries() {
        assert_eq!(replace_word("add r0 r0 SIZE", "SIZE", "0x4"), "add r0 r0 0x4");
        assert_eq!(replace_word("SIZE_TWO SIZE", "SIZE", "0x4"), "SIZE_TWO 0x4");
        assert_eq!(replace_word("OVERSIZE", "SIZE", "0x4"), "OVERSIZE");
        assert_eq!(
            replace_word("SIZE SIZE SIZE", "SIZE", "0x4"),
            "0x4 0x4 0x4"
        );
    }

    #[test]
    fn replace_word_reaches_inline_comments() {
        // Known quirk: the trailing comment is not protected.
        assert_eq!(
            replace_word("loadi r0 SIZE # uses SIZE", "SIZE", "0x4"),
            "loadi r0 0x4 # uses 0x4"
        );
    }
}
