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

//! Fixed-width value types of the machine.

/// A 32-bit machine word.
pub type Word = u32;

/// A 16-bit half word.
pub type HalfWord = u16;

/// An 8-bit quarter word.
pub type QuarterWord = u8;

/// An index into main memory. Values above 0xFFFF are legal in intermediate
/// arithmetic but fault when used against a memory no larger than 64 KiB.
pub type Address = u32;

/// A signed, PC-relative 16-bit displacement.
pub type Offset = i16;
