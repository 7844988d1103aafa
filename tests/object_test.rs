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

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use weevil::errors::AssemblyError;
use weevil::isa::Isa;
use weevil::object::Object;

fn write_image(dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("test.obj");
    fs::write(&path, bytes).unwrap();
    path
}

fn assemble(dir: &TempDir, source: &str) -> PathBuf {
    let src = dir.path().join("test.swl");
    fs::write(&src, source).unwrap();
    let image = weevil::assemble(&src, &[dir.path().to_path_buf()]).unwrap();
    write_image(dir, &image)
}

#[test]
fn test_disassemble_known_instructions() {
    let dir = tempfile::tempdir().unwrap();
    let obj = assemble(&dir, "loadi r0 0x1010\nadd r3 r1 r2\nmove r1 r2\nstop\n");

    let lines = weevil::disassemble(&obj).unwrap();
    assert_eq!(
        lines,
        vec!["loadi r0 0x1010", "add r3 r1 r2", "move r1 r2", "stop"]
    );
}

#[test]
fn test_unknown_opcode_falls_back_to_raw_words() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_image(&dir, &[0xde, 0xad, 0xbe, 0xef]);

    let lines = weevil::disassemble(&obj).unwrap();
    assert_eq!(lines, vec!["0xdeadbeef"]);
}

#[test]
fn test_zero_words_decode_as_stop() {
    // Opcode 0x00 is `stop`, so zeroed data is indistinguishable from it.
    let dir = tempfile::tempdir().unwrap();
    let obj = write_image(&dir, &[0x00, 0x00, 0x00, 0x00]);

    let lines = weevil::disassemble(&obj).unwrap();
    assert_eq!(lines, vec!["stop"]);
}

#[test]
fn test_reserved_bits_over_a_third_register_fall_back() {
    // `add` expects the immediate field to hold nothing but the register
    // nibble; 0x0012 does not name a register.
    let dir = tempfile::tempdir().unwrap();
    let obj = write_image(&dir, &[0x60, 0x31, 0x00, 0x12]);

    let lines = weevil::disassemble(&obj).unwrap();
    assert_eq!(lines, vec!["0x60310012"]);
}

#[test]
fn test_unaligned_image_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_image(&dir, &[0x00, 0x00, 0x00]);

    let isa = Isa::standard();
    let err = Object::new(&isa, &obj).disassemble().unwrap_err();
    assert!(matches!(err, AssemblyError::Misaligned { size: 3, .. }));

    let empty = write_image(&dir, &[]);
    let err = Object::new(&isa, &empty).disassemble().unwrap_err();
    assert!(matches!(err, AssemblyError::Misaligned { size: 0, .. }));
}

#[test]
fn test_decompile_writes_a_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let obj = assemble(&dir, "push r4\npop r5\nstop\n");

    let out = dir.path().join("out.swl");
    let isa = Isa::standard();
    Object::new(&isa, &obj).decompile(&out).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "push r4\npop r5\nstop\n");
}

#[test]
fn test_disassembly_reassembles_to_the_same_image() {
    // Labels are long gone, but the emitted text is still valid source and
    // must encode back byte for byte, negative branch offsets included.
    let dir = tempfile::tempdir().unwrap();
    let source = ".label start\nloadi r0 0x1\nbnz r0 start\ncall fun\nstop\n.label fun\nret\n";
    let obj = assemble(&dir, source);
    let first = fs::read(&obj).unwrap();

    let lines = weevil::disassemble(&obj).unwrap();
    let mut text = lines.join("\n");
    text.push('\n');
    let round = dir.path().join("round.swl");
    fs::write(&round, text).unwrap();

    let second = weevil::assemble(&round, &[dir.path().to_path_buf()]).unwrap();
    assert_eq!(first, second);
}
