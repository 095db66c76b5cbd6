use serde::{Deserialize, Serialize};

/// Constant payload carried by terminal nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl Value {
    /// Stable textual form used as hashing/ordering payload
    pub fn render(&self) -> String {
        match self {
            Value::Integer(v) => v.to_string(),
            // Print the bit pattern-faithful form so 1.0 and 1.5 never collapse
            Value::Float(v) => format!("{:?}", v),
            Value::String(v) => v.clone(),
            Value::Bool(v) => v.to_string(),
        }
    }
}

/// Structural rewrite applied to a node during canonical simplification.
///
/// Selected once per symbol kind when a tree is encoded, instead of storing
/// a callback per record. Every rule must strictly shrink the record count
/// whenever it reports a change; the simplification fixpoint loop depends
/// on that to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimplifyRule {
    /// No symbol-specific rewrite
    #[default]
    None,
    /// Drop repeated operands under an idempotent operator: and(x, x, y) -> and(x, y).
    /// A node left with a single operand is replaced by that operand.
    IdempotentOperands,
    /// Collapse a self-inverse unary operator applied twice: not(not(x)) -> x
    SelfInverse,
}
