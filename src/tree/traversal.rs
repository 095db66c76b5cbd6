use crate::tree::node::{ProgramNode, ProgramTree};

/// Prefix (pre-order) iterator over a node and its descendants.
///
/// Stack-based rather than recursive, so arbitrarily deep trees cannot
/// overflow the call stack.
pub struct PrefixIter<'a> {
    stack: Vec<&'a ProgramNode>,
}

impl<'a> Iterator for PrefixIter<'a> {
    type Item = &'a ProgramNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse push so the leftmost child pops first
        for child in node.children().iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

pub fn iterate_prefix(node: &ProgramNode) -> PrefixIter<'_> {
    PrefixIter { stack: vec![node] }
}

/// Number of nodes in the subtree rooted at `node`, including itself
pub fn subtree_count(node: &ProgramNode) -> usize {
    iterate_prefix(node).count()
}

/// Depth of the subtree rooted at `node`; a leaf has depth 1
pub fn depth(node: &ProgramNode) -> usize {
    let mut max_depth = 0;
    let mut stack = vec![(node, 1usize)];
    while let Some((n, d)) = stack.pop() {
        max_depth = max_depth.max(d);
        for child in n.children() {
            stack.push((child, d + 1));
        }
    }
    max_depth
}

/// Total node count across all branches of a program
pub fn program_size(tree: &ProgramTree) -> usize {
    tree.branches().iter().map(subtree_count).sum()
}

/// Every function-definition node anywhere in the program, in stable
/// prefix order across branches. Compilation relies on this order being
/// deterministic for a given tree.
pub fn find_defuns(tree: &ProgramTree) -> Vec<&ProgramNode> {
    tree.branches()
        .iter()
        .flat_map(iterate_prefix)
        .filter(|node| matches!(node, ProgramNode::Defun { .. }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::ProgramNode;

    fn var(name: &str) -> ProgramNode {
        ProgramNode::Variable(name.to_string())
    }

    fn call(symbol: &str, args: Vec<ProgramNode>) -> ProgramNode {
        ProgramNode::Call {
            symbol: symbol.to_string(),
            args,
        }
    }

    #[test]
    fn test_prefix_order() {
        let tree = call("Add", vec![var("a"), call("Mul", vec![var("b"), var("c")])]);
        let labels: Vec<String> = iterate_prefix(&tree).map(|n| n.label()).collect();
        assert_eq!(labels, vec!["Add", "a", "Mul", "b", "c"]);
    }

    #[test]
    fn test_subtree_count_and_depth() {
        let tree = call("Add", vec![var("a"), call("Mul", vec![var("b"), var("c")])]);
        assert_eq!(subtree_count(&tree), 5);
        assert_eq!(depth(&tree), 3);
        assert_eq!(depth(&var("x")), 1);
    }

    #[test]
    fn test_find_defuns_in_stable_order() {
        let tree = ProgramTree::new(vec![
            var("main"),
            ProgramNode::Defun {
                name: "F".to_string(),
                body: Box::new(var("x")),
            },
            ProgramNode::Defun {
                name: "G".to_string(),
                body: Box::new(var("y")),
            },
        ]);

        let defuns = find_defuns(&tree);
        let names: Vec<String> = defuns.iter().map(|n| n.label()).collect();
        assert_eq!(names, vec!["defun:F", "defun:G"]);
    }
}
