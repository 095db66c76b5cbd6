//! Program representation engine for tree-structured symbolic programs.
//!
//! Two independent components operate on the same tree model:
//!
//! - the **canonicalizer** normalizes a flattened tree encoding so that
//!   structurally equivalent programs (up to commutative operand order and
//!   associative same-operator nesting) hash identically, which is what
//!   population deduplication keys on;
//! - the **compiler** linearizes a (possibly function-defining) program
//!   tree into a flat 16-bit-addressed instruction sequence with resolved
//!   call targets, for fast repeated evaluation by an interpreter.
//!
//! Neither component evaluates programs; what a symbol computes is the
//! surrounding system's concern.

pub mod config;
pub mod engines;
pub mod error;
pub mod grammar;
pub mod tree;
pub mod types;

pub use config::{ConfigManager, EngineConfig, LimitsConfig};
pub use engines::canonical::{
    canonical_hashes, canonicalize, canonicalize_with, encode_tree, program_hash, tree_hash,
    DuplicateFilter, HashRecord,
};
pub use engines::compile::{
    compile, compile_population, CompiledProgram, Instruction, PostInstructionHook,
};
pub use error::{EvotreeError, Result};
pub use grammar::{Symbol, SymbolRegistry};
pub use tree::{ProgramMetadata, ProgramNode, ProgramTree};
pub use types::{SimplifyRule, Value};
