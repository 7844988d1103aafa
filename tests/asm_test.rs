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
use weevil::source::Source;

fn write_file(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn assemble_ok(text: &str) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "test.swl", text);
    weevil::assemble(&path, &[dir.path().to_path_buf()]).unwrap()
}

fn assemble_fails(text: &str) -> bool {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "test.swl", text);
    weevil::assemble(&path, &[dir.path().to_path_buf()]).is_err()
}

#[test]
fn test_loadi() {
    let image = assemble_ok("loadi r0 0x1010\n");
    assert_eq!(image, vec![0x2c, 0x00, 0x10, 0x10]);
}

#[test]
fn test_move() {
    let image = assemble_ok("move r1 r2\n");
    assert_eq!(image, vec![0x10, 0x12, 0x00, 0x00]);
}

#[test]
fn test_three_register_form() {
    let image = assemble_ok("add r3 r1 r2\n");
    assert_eq!(image, vec![0x60, 0x31, 0x00, 0x02]);
}

#[test]
fn test_one_register_form() {
    let image = assemble_ok("push r4\n");
    assert_eq!(image, vec![0x18, 0x40, 0x00, 0x00]);
}

#[test]
fn test_data_word() {
    let image = assemble_ok("0xdeadbeef\n");
    assert_eq!(image, vec![0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn test_comments_and_blanks_produce_nothing() {
    let image = assemble_ok("# header\n\n   \nstop # trailing\n");
    assert_eq!(image, vec![0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_block_rounds_up_to_words() {
    let image = assemble_ok(".block 0x9\n");
    assert_eq!(image, vec![0u8; 12]);
}

#[test]
fn test_empty_block_disappears() {
    let image = assemble_ok(".block 0x0\nstop\n");
    assert_eq!(image, vec![0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_define_substitution() {
    let image = assemble_ok(".define LIMIT 0x1f4\nloadi r0 LIMIT\n");
    assert_eq!(image, vec![0x2c, 0x00, 0x01, 0xf4]);
}

#[test]
fn test_backward_label_becomes_negative_offset() {
    let image = assemble_ok(".label start\nloadi r0 0x1\nb start\n");
    assert_eq!(
        image,
        vec![0x2c, 0x00, 0x00, 0x01, 0x40, 0x00, 0xff, 0xfc]
    );
}

#[test]
fn test_forward_label_and_label_as_data() {
    // Word layout: b main | table data | stop | loadi | stop.
    let source = "b main\n.label table\nhandler\n.label handler\nstop\n.label main\nloadi r0 0x0\nstop\n";
    let image = assemble_ok(source);
    assert_eq!(image.len(), 20);
    // b main: offset 12 - 0.
    assert_eq!(&image[0..4], &[0x40, 0x00, 0x00, 0x0c]);
    // The lone identifier resolves to handler's absolute address.
    assert_eq!(&image[4..8], &[0x00, 0x00, 0x00, 0x08]);
}

#[test]
fn test_include_splices_lines() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "lib.swl", ".define ONE 0x1\n");
    let main = write_file(&dir, "main.swl", ".include \"lib.swl\"\nloadi r0 ONE\n");

    let image = weevil::assemble(&main, &[dir.path().to_path_buf()]).unwrap();
    assert_eq!(image, vec![0x2c, 0x00, 0x00, 0x01]);
}

#[test]
fn test_nested_include_on_the_first_line() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "inner.swl", ".define TWO 0x2\n");
    write_file(&dir, "outer.swl", ".include \"inner.swl\"\n.define ONE 0x1\n");
    let main = write_file(
        &dir,
        "main.swl",
        ".include \"outer.swl\"\nloadi r0 ONE\nloadi r1 TWO\n",
    );

    let image = weevil::assemble(&main, &[dir.path().to_path_buf()]).unwrap();
    assert_eq!(
        image,
        vec![0x2c, 0x00, 0x00, 0x01, 0x2c, 0x10, 0x00, 0x02]
    );
}

#[test]
fn test_double_include_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "lib.swl", ".define ONE 0x1\n");
    let main = write_file(
        &dir,
        "main.swl",
        ".include \"lib.swl\"\n.include \"lib.swl\"\nstop\n",
    );

    assert!(weevil::assemble(&main, &[dir.path().to_path_buf()]).is_err());
}

#[test]
fn test_missing_include_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let main = write_file(&dir, "main.swl", ".include \"nowhere.swl\"\nstop\n");

    let isa = Isa::standard();
    let mut source = Source::new(&isa, vec![dir.path().to_path_buf()]);
    source.load(&main).unwrap();
    let err = source.assemble().unwrap_err();
    assert!(matches!(err, AssemblyError::NotFound { .. }));
}

#[test]
fn test_error_cases() {
    assert!(assemble_fails("frobnicate r0\n"));
    assert!(assemble_fails("loadi r0\n"));
    assert!(assemble_fails("loadi r0 0x1 0x2\n"));
    assert!(assemble_fails("loadi r99 0x1\n"));
    assert!(assemble_fails("loadi r0 0x12345\n"));
    assert!(assemble_fails(".define A 0x1\n.define A 0x2\nstop\n"));
    assert!(assemble_fails(".label a\n.label a\nstop\n"));
    assert!(assemble_fails("b undefined_label\n"));
}

#[test]
fn test_preprocess_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let main = write_file(
        &dir,
        "main.swl",
        ".define SIZE 0x8\n.label start\nloadi r0 SIZE\nb start\n.block 0x8\n",
    );

    let isa = Isa::standard();
    let mut source = Source::new(&isa, vec![dir.path().to_path_buf()]);
    source.load(&main).unwrap();

    source.preprocess().unwrap();
    let first: Vec<String> = source.file().iter().map(str::to_string).collect();
    source.preprocess().unwrap();
    let second: Vec<String> = source.file().iter().map(str::to_string).collect();
    assert_eq!(first, second);
}

#[test]
fn test_define_reaches_inline_comments() {
    // The substitution pass does not protect text after `#`.
    let dir = tempfile::tempdir().unwrap();
    let main = write_file(
        &dir,
        "main.swl",
        ".define SIZE 0x4\nloadi r0 SIZE # allocate SIZE bytes\n",
    );

    let isa = Isa::standard();
    let mut source = Source::new(&isa, vec![dir.path().to_path_buf()]);
    source.load(&main).unwrap();
    source.preprocess().unwrap();

    let lines: Vec<&str> = source.file().iter().collect();
    assert_eq!(lines, vec!["loadi r0 0x4 # allocate 0x4 bytes"]);
}

#[test]
fn test_block_words_count_toward_labels() {
    // Data reserved by a block shifts the labels that follow it.
    let image = assemble_ok(".label start\n.block 0x10\nb start\n");
    assert_eq!(image.len(), 20);
    // b start sits at word 4; start is word 0, so the offset is -16.
    assert_eq!(&image[16..20], &[0x40, 0x00, 0xff, 0xf0]);
}
