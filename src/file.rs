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

//! An ordered, mutable buffer of text lines. No line holds a newline.

use std::fs;
use std::path::Path;

use crate::errors::AssemblyError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    lines: Vec<String>,
}

impl File {
    pub fn new() -> Self {
        File::default()
    }

    /// Number of lines.
    pub fn lines(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn get_line(&self, pos: usize) -> Result<&str, AssemblyError> {
        self.lines
            .get(pos)
            .map(String::as_str)
            .ok_or(AssemblyError::Line { line: pos })
    }

    pub fn set_line(&mut self, pos: usize, text: &str) -> Result<(), AssemblyError> {
        let line = self
            .lines
            .get_mut(pos)
            .ok_or(AssemblyError::Line { line: pos })?;
        *line = text.to_string();
        Ok(())
    }

    /// Insert a line before `pos`; `pos == lines()` appends.
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<(), AssemblyError> {
        if pos > self.lines.len() {
            return Err(AssemblyError::Line { line: pos });
        }
        self.lines.insert(pos, text.to_string());
        Ok(())
    }

    /// Insert another file's lines contiguously before `pos`.
    pub fn insert_file(&mut self, pos: usize, other: &File) -> Result<(), AssemblyError> {
        if pos > self.lines.len() {
            return Err(AssemblyError::Line { line: pos });
        }
        self.lines
            .splice(pos..pos, other.lines.iter().cloned());
        Ok(())
    }

    /// Remove `count` lines starting at `pos`.
    pub fn remove(&mut self, pos: usize, count: usize) -> Result<(), AssemblyError> {
        if pos >= self.lines.len() || pos + count > self.lines.len() {
            return Err(AssemblyError::Line { line: pos });
        }
        self.lines.drain(pos..pos + count);
        Ok(())
    }

    /// Replace the contents with the lines of the file at `path`.
    pub fn load(&mut self, path: &Path) -> Result<(), AssemblyError> {
        let text = fs::read_to_string(path).map_err(|source| AssemblyError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.lines = text.lines().map(str::to_string).collect();
        Ok(())
    }

    /// Write every line followed by a newline.
    pub fn save(&self, path: &Path) -> Result<(), AssemblyError> {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        fs::write(path, text).map_err(|source| AssemblyError::Unwritable {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of(lines: &[&str]) -> File {
        let mut file = File::new();
        for (i, line) in lines.iter().enumerate() {
            file.insert(i, line).unwrap();
        }
        file
    }

    #[test]
    fn insert_and_get() {
        let file = file_of(&["one", "two"]);
        assert_eq!(file.lines(), 2);
        assert_eq!(file.get_line(0).unwrap(), "one");
        assert_eq!(file.get_line(1).unwrap(), "two");
        assert!(matches!(
            file.get_line(2),
            Err(AssemblyError::Line { line: 2 })
        ));
    }

    #[test]
    fn insert_past_the_end_fails() {
        let mut file = File::new();
        assert!(file.insert(1, "x").is_err());
        file.insert(0, "x").unwrap();
        file.insert(1, "y").unwrap();
    }

    #[test]
    fn remove_a_range() {
        let mut file = file_of(&["a", "b", "c", "d"]);
        file.remove(1, 2).unwrap();
        assert_eq!(file.iter().collect::<Vec<_>>(), vec!["a", "d"]);
        assert!(file.remove(1, 2).is_err());
    }

    #[test]
    fn insert_file_splices_contiguously() {
        let mut file = file_of(&["a", "d"]);
        let other = file_of(&["b", "c"]);
        file.insert_file(1, &other).unwrap();
        assert_eq!(file.iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn load_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.swl");
        let file = file_of(&["loadi r0 0x1", "stop"]);
        file.save(&path).unwrap();

        let mut loaded = File::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded, file);
    }
}
