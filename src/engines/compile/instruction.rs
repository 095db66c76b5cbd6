use serde::{Deserialize, Serialize};

use crate::tree::node::ProgramNode;

/// One compiled instruction.
///
/// `data` is overloaded the way the target bytecode overloads it: the jump
/// offset of the called definition for invocation instructions, the formal
/// argument index for argument instructions, 0 otherwise. `node` indexes
/// the childless originating-node heads owned by [`CompiledProgram`];
/// instructions never alias tree memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub op_code: u8,
    pub n_arguments: u16,
    pub data: u16,
    pub node: usize,
}

/// Result of compiling a program tree: the flat instruction sequence plus
/// the table of originating-node heads the instructions index into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub instructions: Vec<Instruction>,
    pub nodes: Vec<ProgramNode>,
}

impl CompiledProgram {
    /// The childless head of the tree node an instruction was emitted for
    pub fn origin(&self, instruction: &Instruction) -> &ProgramNode {
        &self.nodes[instruction.node]
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Ordered transformer applied to each instruction right after emission,
/// with access to the originating node's head.
pub type PostInstructionHook = Box<dyn Fn(Instruction, &ProgramNode) -> Instruction>;
