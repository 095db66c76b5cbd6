use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EvotreeError, Result};
use crate::types::Value;

/// Program tree node.
///
/// The top level of a program is a sequence of branches (see [`ProgramTree`]);
/// function-definition branches are addressed by name from `Invoke` call
/// sites, and `Argument` nodes stand for a definition's formal parameters.
/// A `Composite` is a macro: a parameterized prototype subtree whose
/// `Argument` placeholders are substituted with the node's own children
/// before compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgramNode {
    Const(Value),
    Variable(String),
    Call {
        symbol: String,
        args: Vec<ProgramNode>,
    },
    Defun {
        name: String,
        body: Box<ProgramNode>,
    },
    Invoke {
        name: String,
        args: Vec<ProgramNode>,
    },
    Argument(u16),
    Composite {
        symbol: String,
        prototype: Box<ProgramNode>,
        args: Vec<ProgramNode>,
    },
}

impl ProgramNode {
    /// Immediate children, left to right. A composite's children are its
    /// concrete arguments; the prototype is a template, not a child.
    pub fn children(&self) -> &[ProgramNode] {
        match self {
            ProgramNode::Const(_) | ProgramNode::Variable(_) | ProgramNode::Argument(_) => &[],
            ProgramNode::Call { args, .. }
            | ProgramNode::Invoke { args, .. }
            | ProgramNode::Composite { args, .. } => args,
            ProgramNode::Defun { body, .. } => std::slice::from_ref(body),
        }
    }

    pub fn children_mut(&mut self) -> &mut [ProgramNode] {
        match self {
            ProgramNode::Const(_) | ProgramNode::Variable(_) | ProgramNode::Argument(_) => &mut [],
            ProgramNode::Call { args, .. }
            | ProgramNode::Invoke { args, .. }
            | ProgramNode::Composite { args, .. } => args,
            ProgramNode::Defun { body, .. } => std::slice::from_mut(body.as_mut()),
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Label identifying the node for hashing, ordering and display
    pub fn label(&self) -> String {
        match self {
            ProgramNode::Const(value) => value.render(),
            ProgramNode::Variable(name) => name.clone(),
            ProgramNode::Call { symbol, .. } => symbol.clone(),
            ProgramNode::Defun { name, .. } => format!("defun:{}", name),
            ProgramNode::Invoke { name, .. } => format!("invoke:{}", name),
            ProgramNode::Argument(index) => format!("arg:{}", index),
            ProgramNode::Composite { symbol, .. } => symbol.clone(),
        }
    }

    /// Split an owned node into its childless head and its children.
    /// The compiler interns heads into its node table while the children
    /// continue through the emission worklist.
    pub fn into_parts(self) -> (ProgramNode, Vec<ProgramNode>) {
        match self {
            ProgramNode::Call { symbol, args } => (
                ProgramNode::Call {
                    symbol,
                    args: Vec::new(),
                },
                args,
            ),
            ProgramNode::Invoke { name, args } => (
                ProgramNode::Invoke {
                    name,
                    args: Vec::new(),
                },
                args,
            ),
            ProgramNode::Composite {
                symbol,
                prototype,
                args,
            } => (
                ProgramNode::Composite {
                    symbol,
                    prototype,
                    args: Vec::new(),
                },
                args,
            ),
            // Definitions are never decomposed: the compiler records an entry
            // point and emits the body through its own path.
            node @ ProgramNode::Defun { .. } => (node, Vec::new()),
            leaf => (leaf, Vec::new()),
        }
    }

    /// Materialize a composite: clone the prototype and substitute every
    /// `Argument(i)` placeholder with a clone of the i-th concrete argument.
    /// Substituted content is not re-scanned, so placeholders inside an
    /// argument subtree keep whatever meaning they have in their own scope.
    pub fn expand(&self) -> Result<ProgramNode> {
        let ProgramNode::Composite {
            symbol,
            prototype,
            args,
        } = self
        else {
            return Err(EvotreeError::InvalidProgram(format!(
                "cannot expand non-composite node '{}'",
                self.label()
            )));
        };

        let mut expanded = (**prototype).clone();
        let mut stack: Vec<&mut ProgramNode> = vec![&mut expanded];

        while let Some(node) = stack.pop() {
            if let ProgramNode::Argument(index) = node {
                let i = *index as usize;
                let replacement = args.get(i).ok_or_else(|| {
                    EvotreeError::InvalidProgram(format!(
                        "composite '{}' has no argument for placeholder {}",
                        symbol, i
                    ))
                })?;
                *node = replacement.clone();
                continue;
            }
            for child in node.children_mut() {
                stack.push(child);
            }
        }

        Ok(expanded)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramMetadata {
    pub origin: String,
    pub generation: usize,
    pub properties: HashMap<String, String>,
}

/// A whole program: main-body branches in execution order, with any
/// function-definition branches as top-level members of the same sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramTree {
    pub body: Vec<ProgramNode>,
    pub metadata: ProgramMetadata,
}

impl ProgramTree {
    pub fn new(body: Vec<ProgramNode>) -> Self {
        Self {
            body,
            metadata: ProgramMetadata::default(),
        }
    }

    pub fn branches(&self) -> &[ProgramNode] {
        &self.body
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
