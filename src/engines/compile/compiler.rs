//! Tree-to-bytecode compilation.
//!
//! Two passes: a prefix emission pass over the main-body branches followed
//! by every function-definition branch (entry offsets recorded as they are
//! reached), then a backpatch pass resolving each invocation instruction's
//! jump target. Composites are expanded inline during emission, so the
//! instruction stream never contains a macro node.
//!
//! Jump addresses and argument counts are 16-bit fields, matching the
//! target bytecode's addressing width. Trees that do not fit are rejected
//! with a recoverable error, never truncated.

use rayon::prelude::*;
use std::collections::HashMap;

use crate::engines::compile::instruction::{CompiledProgram, Instruction, PostInstructionHook};
use crate::error::{EvotreeError, Result};
use crate::grammar::SymbolRegistry;
use crate::tree::node::{ProgramNode, ProgramTree};
use crate::tree::traversal::find_defuns;

const MAX_CODE_LEN: usize = u16::MAX as usize;
const MAX_ARITY: usize = u16::MAX as usize;

/// Compile a program tree into a flat instruction sequence with resolved
/// call addresses.
///
/// Deterministic: the same tree compiles to a byte-identical sequence, so
/// callers may cache compiled programs keyed on the tree.
pub fn compile<F>(
    tree: &ProgramTree,
    opcode_mapper: F,
    hooks: &[PostInstructionHook],
) -> Result<CompiledProgram>
where
    F: Fn(&ProgramNode) -> u8,
{
    let mut compiler = Compiler {
        opcode_mapper,
        hooks,
        code: Vec::new(),
        nodes: Vec::new(),
    };

    // Main body first; definition branches are emitted in the function pass
    for branch in tree.branches() {
        if matches!(branch, ProgramNode::Defun { .. }) {
            continue;
        }
        compiler.compile_branch(branch.clone())?;
    }

    // Function bodies follow, each entry offset recorded before its body is
    // emitted. Discovery order is stable prefix order across branches.
    let mut entry_points: HashMap<String, u16> = HashMap::new();
    for defun in find_defuns(tree) {
        if let ProgramNode::Defun { name, body } = defun {
            if entry_points.contains_key(name) {
                return Err(EvotreeError::DuplicateFunction(name.clone()));
            }
            if compiler.code.len() > MAX_CODE_LEN {
                return Err(EvotreeError::CodeTooLong {
                    count: compiler.code.len(),
                });
            }
            entry_points.insert(name.clone(), compiler.code.len() as u16);
            compiler.compile_branch((**body).clone())?;
        }
    }

    compiler.backpatch(&entry_points)?;

    Ok(CompiledProgram {
        instructions: compiler.code,
        nodes: compiler.nodes,
    })
}

/// Compile a whole population, one tree per rayon task, with the
/// registry's opcode classification and no hooks.
pub fn compile_population(
    trees: &[ProgramTree],
    registry: &SymbolRegistry,
) -> Vec<Result<CompiledProgram>> {
    trees
        .par_iter()
        .map(|tree| compile(tree, |node| registry.opcode_of(node), &[]))
        .collect()
}

struct Compiler<'a, F> {
    opcode_mapper: F,
    hooks: &'a [PostInstructionHook],
    code: Vec<Instruction>,
    nodes: Vec<ProgramNode>,
}

impl<F> Compiler<'_, F>
where
    F: Fn(&ProgramNode) -> u8,
{
    /// Emit one branch in prefix order via an explicit worklist of owned
    /// nodes. Popping a composite replaces it with its expansion; popping
    /// anything else emits an instruction and queues its children.
    fn compile_branch(&mut self, branch: ProgramNode) -> Result<()> {
        let mut work = vec![branch];

        while let Some(node) = work.pop() {
            match node {
                ProgramNode::Composite { .. } => {
                    work.push(node.expand()?);
                }
                ProgramNode::Defun { .. } => {
                    return Err(EvotreeError::InvalidProgram(format!(
                        "function definition '{}' nested inside an expression branch",
                        node.label()
                    )));
                }
                node => {
                    let arity = node.child_count();
                    if arity > MAX_ARITY {
                        return Err(EvotreeError::TreeTooWide { arity });
                    }
                    if self.code.len() >= MAX_CODE_LEN {
                        log::warn!("rejecting program: instruction limit exceeded");
                        return Err(EvotreeError::CodeTooLong {
                            count: self.code.len() + 1,
                        });
                    }

                    let (head, children) = node.into_parts();
                    let mut instruction = Instruction {
                        op_code: (self.opcode_mapper)(&head),
                        n_arguments: arity as u16,
                        data: match &head {
                            ProgramNode::Argument(index) => *index,
                            _ => 0,
                        },
                        node: self.nodes.len(),
                    };
                    for hook in self.hooks {
                        instruction = hook(instruction, &head);
                    }
                    self.nodes.push(head);
                    self.code.push(instruction);

                    // Reverse push so the leftmost child is emitted next
                    for child in children.into_iter().rev() {
                        work.push(child);
                    }
                }
            }
        }
        Ok(())
    }

    /// Fill in the jump target of every invocation instruction. Invoking a
    /// name with no definition branch is a malformed tree and fails rather
    /// than leaving a corrupt address.
    fn backpatch(&mut self, entry_points: &HashMap<String, u16>) -> Result<()> {
        for instruction in &mut self.code {
            if let ProgramNode::Invoke { name, .. } = &self.nodes[instruction.node] {
                let offset = entry_points
                    .get(name)
                    .ok_or_else(|| EvotreeError::UnresolvedFunction(name.clone()))?;
                instruction.data = *offset;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::compile::opcodes;
    use crate::types::Value;

    fn var(name: &str) -> ProgramNode {
        ProgramNode::Variable(name.to_string())
    }

    fn call(symbol: &str, args: Vec<ProgramNode>) -> ProgramNode {
        ProgramNode::Call {
            symbol: symbol.to_string(),
            args,
        }
    }

    fn int(v: i64) -> ProgramNode {
        ProgramNode::Const(Value::Integer(v))
    }

    fn mapper() -> impl Fn(&ProgramNode) -> u8 {
        let registry = SymbolRegistry::new();
        move |node: &ProgramNode| registry.opcode_of(node)
    }

    #[test]
    fn test_prefix_emission_order() {
        let tree = ProgramTree::new(vec![call(
            "Add",
            vec![var("x"), call("Mul", vec![var("y"), int(2)])],
        )]);
        let compiled = compile(&tree, mapper(), &[]).unwrap();

        let emitted: Vec<u8> = compiled.instructions.iter().map(|i| i.op_code).collect();
        assert_eq!(
            emitted,
            vec![
                opcodes::ADD,
                opcodes::VARIABLE,
                opcodes::MUL,
                opcodes::VARIABLE,
                opcodes::CONSTANT,
            ]
        );
        assert_eq!(compiled.instructions[0].n_arguments, 2);
        assert_eq!(compiled.instructions[2].n_arguments, 2);
    }

    #[test]
    fn test_argument_index_in_data_field() {
        let tree = ProgramTree::new(vec![
            ProgramNode::Invoke {
                name: "F".to_string(),
                args: vec![var("x")],
            },
            ProgramNode::Defun {
                name: "F".to_string(),
                body: Box::new(call("Not", vec![ProgramNode::Argument(0)])),
            },
        ]);
        let compiled = compile(&tree, mapper(), &[]).unwrap();

        // layout: Invoke x | Not arg0
        assert_eq!(compiled.instructions[3].op_code, opcodes::ARG);
        assert_eq!(compiled.instructions[3].data, 0);
        assert_eq!(compiled.instructions[0].op_code, opcodes::CALL);
        assert_eq!(compiled.instructions[0].data, 2); // F starts after main body
    }

    #[test]
    fn test_hooks_run_in_order() {
        let tree = ProgramTree::new(vec![var("x")]);
        let hooks: Vec<PostInstructionHook> = vec![
            Box::new(|mut instruction, _node| {
                instruction.data = 1;
                instruction
            }),
            Box::new(|mut instruction, _node| {
                instruction.data += 10;
                instruction
            }),
        ];
        let compiled = compile(&tree, mapper(), &hooks).unwrap();
        assert_eq!(compiled.instructions[0].data, 11);
    }

    #[test]
    fn test_unresolved_invocation_fails() {
        let tree = ProgramTree::new(vec![ProgramNode::Invoke {
            name: "Ghost".to_string(),
            args: vec![],
        }]);
        let result = compile(&tree, mapper(), &[]);
        assert!(matches!(
            result,
            Err(EvotreeError::UnresolvedFunction(name)) if name == "Ghost"
        ));
    }

    #[test]
    fn test_duplicate_definition_fails() {
        let defun = ProgramNode::Defun {
            name: "F".to_string(),
            body: Box::new(var("x")),
        };
        let tree = ProgramTree::new(vec![var("main"), defun.clone(), defun]);
        assert!(matches!(
            compile(&tree, mapper(), &[]),
            Err(EvotreeError::DuplicateFunction(name)) if name == "F"
        ));
    }

    #[test]
    fn test_nested_definition_fails() {
        let tree = ProgramTree::new(vec![call(
            "Not",
            vec![ProgramNode::Defun {
                name: "F".to_string(),
                body: Box::new(var("x")),
            }],
        )]);
        assert!(matches!(
            compile(&tree, mapper(), &[]),
            Err(EvotreeError::InvalidProgram(_))
        ));
    }
}
