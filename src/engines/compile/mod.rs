pub mod compiler;
pub mod instruction;
pub mod opcodes;

pub use compiler::{compile, compile_population};
pub use instruction::{CompiledProgram, Instruction, PostInstructionHook};
