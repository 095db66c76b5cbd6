use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::engines::compile::opcodes;
use crate::grammar::symbols::{
    Addition, And, Average, Division, GreaterThan, LessThan, Maximum, Minimum, Multiplication,
    Not, Or, Subtraction,
};
use crate::grammar::traits::Symbol;
use crate::tree::node::ProgramNode;
use crate::types::SimplifyRule;

/// Registry of grammar symbols, keyed by alias.
///
/// The canonicalizer asks it for commutativity/associativity flags and
/// rewrite rules; the compiler asks it for opcodes. Unknown aliases fall
/// back to inert defaults so a tree referencing a foreign symbol still
/// canonicalizes and compiles (with a NOP opcode) instead of failing.
pub struct SymbolRegistry {
    symbols: HashMap<String, Arc<dyn Symbol>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            symbols: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    pub fn get(&self, alias: &str) -> Option<Arc<dyn Symbol>> {
        self.symbols.get(alias).cloned()
    }

    /// Register a caller-supplied symbol. Aliases must be unique.
    pub fn register(&mut self, symbol: Arc<dyn Symbol>) -> Result<()> {
        let alias = symbol.alias().to_string();
        if self.symbols.contains_key(&alias) {
            bail!("symbol alias '{}' is already registered", alias);
        }
        self.symbols.insert(alias, symbol);
        Ok(())
    }

    pub fn commutative_of(&self, node: &ProgramNode) -> bool {
        match node {
            ProgramNode::Call { symbol, .. } => self
                .get(symbol)
                .map(|s| s.is_commutative())
                .unwrap_or(false),
            _ => false,
        }
    }

    pub fn associative_of(&self, node: &ProgramNode) -> bool {
        match node {
            ProgramNode::Call { symbol, .. } => self
                .get(symbol)
                .map(|s| s.is_associative())
                .unwrap_or(false),
            _ => false,
        }
    }

    pub fn rule_of(&self, node: &ProgramNode) -> SimplifyRule {
        match node {
            ProgramNode::Call { symbol, .. } => self
                .get(symbol)
                .map(|s| s.simplify_rule())
                .unwrap_or(SimplifyRule::None),
            _ => SimplifyRule::None,
        }
    }

    /// Opcode classification for every node kind. Defuns and composites are
    /// never emitted directly (the compiler records an entry point for one
    /// and expands the other), so both map to NOP.
    pub fn opcode_of(&self, node: &ProgramNode) -> u8 {
        match node {
            ProgramNode::Const(_) => opcodes::CONSTANT,
            ProgramNode::Variable(_) => opcodes::VARIABLE,
            ProgramNode::Argument(_) => opcodes::ARG,
            ProgramNode::Invoke { .. } => opcodes::CALL,
            ProgramNode::Call { symbol, .. } => self
                .get(symbol)
                .map(|s| s.op_code())
                .unwrap_or(opcodes::NOP),
            ProgramNode::Defun { .. } | ProgramNode::Composite { .. } => opcodes::NOP,
        }
    }

    fn register_defaults(&mut self) {
        let symbols: Vec<Arc<dyn Symbol>> = vec![
            Arc::new(Addition {}),
            Arc::new(Subtraction {}),
            Arc::new(Multiplication {}),
            Arc::new(Division {}),
            Arc::new(Minimum {}),
            Arc::new(Maximum {}),
            Arc::new(Average {}),
            Arc::new(And {}),
            Arc::new(Or {}),
            Arc::new(Not {}),
            Arc::new(GreaterThan {}),
            Arc::new(LessThan {}),
        ];

        for symbol in symbols {
            self.symbols.insert(symbol.alias().to_string(), symbol);
        }
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_symbol_retrieval() {
        let registry = SymbolRegistry::new();
        let add = registry.get("Add");
        assert!(add.is_some());
        assert_eq!(add.unwrap().alias(), "Add");
    }

    #[test]
    fn test_symbol_not_found() {
        let registry = SymbolRegistry::new();
        assert!(registry.get("NonExistent").is_none());
    }

    #[test]
    fn test_commutative_and_associative_are_distinct() {
        let registry = SymbolRegistry::new();
        let avg = registry.get("Avg").unwrap();
        assert!(avg.is_commutative());
        assert!(!avg.is_associative());

        let add = registry.get("Add").unwrap();
        assert!(add.is_commutative());
        assert!(add.is_associative());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        use crate::grammar::symbols::Addition;
        let mut registry = SymbolRegistry::new();
        assert!(registry.register(Arc::new(Addition {})).is_err());
    }
}
