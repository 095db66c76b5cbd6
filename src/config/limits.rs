use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::error::EvotreeError;
use crate::tree::node::ProgramTree;
use crate::tree::traversal::{depth, program_size};

/// Size bounds applied to program trees before the representation engine
/// touches them.
///
/// The engine itself has no iteration cap; callers bound canonicalization
/// cost by rejecting oversized trees up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_tree_nodes: usize,
    pub max_tree_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_tree_nodes: 2000,
            max_tree_depth: 64,
        }
    }
}

impl LimitsConfig {
    /// Reject a program exceeding the configured bounds
    pub fn check_tree(&self, tree: &ProgramTree) -> Result<(), EvotreeError> {
        let nodes = program_size(tree);
        if nodes > self.max_tree_nodes {
            return Err(EvotreeError::InvalidProgram(format!(
                "program has {} nodes, limit is {}",
                nodes, self.max_tree_nodes
            )));
        }
        for branch in tree.branches() {
            let branch_depth = depth(branch);
            if branch_depth > self.max_tree_depth {
                return Err(EvotreeError::InvalidProgram(format!(
                    "branch depth {} exceeds limit {}",
                    branch_depth, self.max_tree_depth
                )));
            }
        }
        Ok(())
    }
}

impl ConfigSection for LimitsConfig {
    fn section_name() -> &'static str {
        "limits"
    }

    fn validate(&self) -> Result<(), EvotreeError> {
        if self.max_tree_nodes == 0 {
            return Err(EvotreeError::Configuration(
                "max_tree_nodes must be at least 1".to_string(),
            ));
        }
        if self.max_tree_depth == 0 {
            return Err(EvotreeError::Configuration(
                "max_tree_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
