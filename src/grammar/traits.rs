use crate::types::SimplifyRule;

/// Base trait for all grammar symbols.
///
/// A symbol describes the structural properties of a node kind: how many
/// subtrees it takes, whether operand order matters, whether nested
/// applications of the same operator can be merged, which opcode it maps to,
/// and which canonical rewrite (if any) applies to it. What a symbol
/// *computes* is the interpreter's business, not this crate's.
pub trait Symbol: Send + Sync {
    /// Display name
    fn ui_name(&self) -> &'static str;

    /// Alias for use in program trees
    fn alias(&self) -> &'static str;

    /// Minimum number of subtrees
    fn min_arity(&self) -> usize;

    /// Maximum number of subtrees
    fn max_arity(&self) -> usize;

    /// Operand order is semantically irrelevant (candidate for canonical sorting)
    fn is_commutative(&self) -> bool {
        false
    }

    /// Nested same-operator subtrees can be merged into one n-ary node.
    /// Distinct from commutativity: Average is commutative but not associative.
    fn is_associative(&self) -> bool {
        false
    }

    /// Opcode emitted for this symbol during compilation
    fn op_code(&self) -> u8;

    /// Canonical rewrite applied during simplification
    fn simplify_rule(&self) -> SimplifyRule {
        SimplifyRule::None
    }
}
