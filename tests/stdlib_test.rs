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

//! Programs built on the standard include library, assembled with the real
//! `stdlib/` directory on the include path and run to completion.

use std::fs;
use std::path::PathBuf;

use weevil::cpu::Cpu;
use weevil::memory::Memory;
use weevil::types::Word;

fn run(source: &str) -> Cpu {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.swl");
    fs::write(&path, source).unwrap();

    let stdlib = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("stdlib");
    let image =
        weevil::assemble(&path, &[dir.path().to_path_buf(), stdlib]).unwrap();

    let mut memory = Memory::new(0x2000);
    memory.write_bytes(0, &image).unwrap();
    let mut cpu = Cpu::new(memory);
    cpu.execute().unwrap();
    cpu
}

fn reg(cpu: &Cpu, code: u8) -> Word {
    cpu.get_reg(code).unwrap()
}

#[test]
fn every_fragment_assembles_together() {
    let cpu = run(
        "b main\n.include \"def.swl\"\n.include \"math.swl\"\n.include \"alloc.swl\"\n.include \"list.swl\"\n.include \"stack.swl\"\n.include \"map.swl\"\n.include \"multimap.swl\"\n.include \"set.swl\"\n.label main\nstop\n",
    );
    assert!(!cpu.running());
}

#[test]
fn math_helpers() {
    let cpu = run(
        "b main\n.include \"math.swl\"\n.label main\nloada sp stack_area\nloadi r0 0xfffb\nloadhi r0 0xffff\ncall math_abs\nmove r10 r0\nloadi r0 0x3\nloadi r1 0x9\ncall math_min\nmove r11 r0\nloadi r0 0x3\nloadi r1 0x9\ncall math_max\nmove r9 r0\nstop\n.label stack_area\n.block 0x40\n",
    );

    // |-5| = 5, min(3, 9) = 3, max(3, 9) = 9.
    assert_eq!(reg(&cpu, 0xa), 5);
    assert_eq!(reg(&cpu, 0xb), 3);
    assert_eq!(reg(&cpu, 0x9), 9);
}

#[test]
fn allocator_hands_out_disjoint_blocks() {
    let cpu = run(
        "b main\n.include \"alloc.swl\"\n.label main\nloada sp stack_area\nloada r0 heap\ncall alloc_init\nloadi r0 0x10\ncall alloc\nmove r10 r0\nloadi r0 0x8\ncall alloc\nmove r11 r0\nsub r9 r11 r10\nstop\n.label heap\n.block 0x80\n.label stack_area\n.block 0x40\n",
    );

    // The second block starts exactly one first-block past the first.
    assert_eq!(reg(&cpu, 0x9), 0x10);
    assert_ne!(reg(&cpu, 0xa), 0);
}

#[test]
fn stack_pushes_and_pops_in_lifo_order() {
    let cpu = run(
        "b main\n.include \"alloc.swl\"\n.include \"stack.swl\"\n.label main\nloada sp stack_area\nloada r0 heap\ncall alloc_init\nloadi r0 0x8\ncall stack_new\nmove r10 r0\nloadi r1 0x15\ncall stack_push\nmove r0 r10\nloadi r1 0x2a\ncall stack_push\nmove r0 r10\ncall stack_pop\nmove r11 r0\nmove r0 r10\ncall stack_pop\nmove r9 r0\nstop\n.label heap\n.block 0x80\n.label stack_area\n.block 0x40\n",
    );

    assert_eq!(reg(&cpu, 0xb), 0x2a);
    assert_eq!(reg(&cpu, 0x9), 0x15);
}

#[test]
fn list_insert_and_find() {
    let cpu = run(
        "b main\n.include \"alloc.swl\"\n.include \"list.swl\"\n.label main\nloada sp stack_area\nloada r0 heap\ncall alloc_init\nloadi r0 0x2a\ncall list_node\nmove r10 r0\nloadi r0 0x15\ncall list_node\nmove r1 r0\nmove r0 r10\ncall list_insert\nmove r10 r0\nloadi r1 0x2a\ncall list_find\nloadri r11 r0 0x4\nmove r0 r10\nloadi r1 0x99\ncall list_find\nmove r9 r0\nstop\n.label heap\n.block 0x80\n.label stack_area\n.block 0x40\n",
    );

    // The value inserted first is found behind the new head; a value never
    // inserted comes back NULL.
    assert_eq!(reg(&cpu, 0xb), 0x2a);
    assert_eq!(reg(&cpu, 0x9), 0x0);
}

#[test]
fn map_set_get_and_overwrite() {
    let cpu = run(
        "b main\n.include \"alloc.swl\"\n.include \"map.swl\"\n.label main\nloada sp stack_area\nloada r0 heap\ncall alloc_init\ncall map_new\nmove r10 r0\nloadi r1 0x7\nloadi r2 0x63\ncall map_set\nmove r0 r10\nloadi r1 0x7\ncall map_get\nmove r11 r0\nmove r0 r10\nloadi r1 0x8\ncall map_get\nmove r9 r0\nmove r0 r10\nloadi r1 0x7\nloadi r2 0x64\ncall map_set\nmove r0 r10\nloadi r1 0x7\ncall map_get\nmove r8 r0\nstop\n.label heap\n.block 0x100\n.label stack_area\n.block 0x40\n",
    );

    assert_eq!(reg(&cpu, 0xb), 0x63);
    assert_eq!(reg(&cpu, 0x9), 0x0);
    assert_eq!(reg(&cpu, 0x8), 0x64);
}

#[test]
fn multimap_keeps_duplicate_keys() {
    let cpu = run(
        "b main\n.include \"alloc.swl\"\n.include \"multimap.swl\"\n.label main\nloada sp stack_area\nloada r0 heap\ncall alloc_init\ncall multimap_new\nmove r10 r0\nloadi r1 0x7\nloadi r2 0x63\ncall multimap_insert\nmove r0 r10\nloadi r1 0x7\nloadi r2 0x64\ncall multimap_insert\nmove r0 r10\nloadi r1 0x9\nloadi r2 0x65\ncall multimap_insert\nmove r0 r10\nloadi r1 0x7\ncall multimap_find_entry\nloadri r11 r0 0x8\ncall multimap_next\nloadri r9 r0 0x8\nmove r0 r10\nloadi r1 0x7\ncall multimap_check\nmove r8 r0\nmove r0 r10\nloadi r1 0x8\ncall multimap_check\nmove r7 r0\nmove r0 r10\nloadi r1 0x7\ncall multimap_remove\nmove r0 r10\nloadi r1 0x7\ncall multimap_get\nmove r6 r0\nmove r0 r10\nloadi r1 0x7\ncall multimap_remove\nmove r0 r10\nloadi r1 0x7\ncall multimap_check\nmove r5 r0\nmove r0 r10\nloadi r1 0x9\ncall multimap_get\nmove r4 r0\nstop\n.label heap\n.block 0x100\n.label stack_area\n.block 0x40\n",
    );

    // Both values inserted under key 7 are reachable, newest first.
    assert_eq!(reg(&cpu, 0xb), 0x64);
    assert_eq!(reg(&cpu, 0x9), 0x63);
    assert_eq!(reg(&cpu, 0x8), 1);
    assert_eq!(reg(&cpu, 0x7), 0);
    // Removing drains one duplicate at a time.
    assert_eq!(reg(&cpu, 0x6), 0x63);
    assert_eq!(reg(&cpu, 0x5), 0);
    // The unrelated key survives both removals.
    assert_eq!(reg(&cpu, 0x4), 0x65);
}

#[test]
fn set_membership() {
    let cpu = run(
        "b main\n.include \"def.swl\"\n.include \"alloc.swl\"\n.include \"map.swl\"\n.include \"set.swl\"\n.label main\nloada sp stack_area\nloada r0 heap\ncall alloc_init\ncall set_new\nmove r10 r0\nloadi r1 0x2a\ncall set_add\nmove r0 r10\nloadi r1 0x2a\ncall set_has\nmove r11 r0\nmove r0 r10\nloadi r1 0x7\ncall set_has\nmove r9 r0\nstop\n.label heap\n.block 0x100\n.label stack_area\n.block 0x40\n",
    );

    assert_eq!(reg(&cpu, 0xb), 1);
    assert_eq!(reg(&cpu, 0x9), 0);
}
