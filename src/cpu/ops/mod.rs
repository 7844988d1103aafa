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

//! The operation set, one module per instruction family.

mod arithmetic;
mod branch;
mod function;
mod logic;
mod management;
mod moves;
mod shift;
mod sign;

pub use arithmetic::*;
pub use branch::*;
pub use function::*;
pub use logic::*;
pub use management::*;
pub use moves::*;
pub use shift::*;
pub use sign::*;
