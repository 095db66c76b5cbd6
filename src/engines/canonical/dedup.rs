use rayon::prelude::*;
use std::collections::HashSet;

use crate::engines::canonical::canonicalizer::tree_hash;
use crate::engines::canonical::hashing;
use crate::grammar::SymbolRegistry;
use crate::tree::node::ProgramTree;

/// Canonical hash of a whole program: order-sensitive combination of its
/// branches' canonical root hashes. Programs that differ only by operand
/// order or same-operator nesting inside a branch hash identically.
pub fn program_hash(tree: &ProgramTree, registry: &SymbolRegistry) -> u64 {
    let branch_hashes: Vec<u64> = tree
        .branches()
        .iter()
        .map(|branch| tree_hash(branch, registry))
        .collect();
    hashing::combine(&branch_hashes, hashing::seed_of("program"))
}

/// Canonical hashes for a whole population, one tree per rayon task.
/// Nothing is shared between invocations, so this is safe to fan out.
pub fn canonical_hashes(trees: &[ProgramTree], registry: &SymbolRegistry) -> Vec<u64> {
    trees
        .par_iter()
        .map(|tree| program_hash(tree, registry))
        .collect()
}

/// Rejects programs whose canonical hash has been seen before.
///
/// Used to keep elite collections and offspring pools free of structural
/// duplicates that differ only in operand order.
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    seen: HashSet<u64>,
}

impl DuplicateFilter {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Returns true if the program is new; false if a structural duplicate
    /// was already admitted.
    pub fn try_add(&mut self, tree: &ProgramTree, registry: &SymbolRegistry) -> bool {
        self.try_add_hash(program_hash(tree, registry))
    }

    pub fn try_add_hash(&mut self, hash: u64) -> bool {
        self.seen.insert(hash)
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.seen.contains(&hash)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
