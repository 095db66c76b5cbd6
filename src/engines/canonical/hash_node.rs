use crate::engines::canonical::hashing;
use crate::grammar::SymbolRegistry;
use crate::tree::node::ProgramNode;
use crate::types::SimplifyRule;

/// One node of a flattened tree encoding.
///
/// Records are laid out in postfix order: for a record at index `i` with
/// subtree size `s`, indices `i-s .. i-1` hold exactly its descendants, and
/// its immediate children are found by stepping back from `i-1` by
/// `1 + child.size` repeatedly. `size` excludes the record itself and must
/// be refreshed (via `update_sizes`) after any arity change before children
/// are iterated again.
#[derive(Debug, Clone)]
pub struct HashRecord<T> {
    /// Payload identifying the original symbol/value; compared during sorting
    pub data: T,
    /// Current number of children; shrinks/grows as operands are absorbed
    pub arity: usize,
    /// Records occupied by the subtree, excluding this record; 0 for leaves
    pub size: usize,
    pub commutative: bool,
    pub associative: bool,
    /// Liveness flag; disabled records are dropped at the next compaction
    pub enabled: bool,
    /// Intrinsic hash of the node itself, independent of children
    pub seed: u64,
    /// Hash incorporating all descendant hashes; valid after a sort pass
    pub hash: u64,
    pub rule: SimplifyRule,
}

impl<T> HashRecord<T> {
    pub fn new(data: T, arity: usize, seed: u64) -> Self {
        Self {
            data,
            arity,
            size: 0,
            commutative: false,
            associative: false,
            enabled: true,
            seed,
            hash: 0,
            rule: SimplifyRule::None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.arity == 0
    }
}

/// Flatten a tree into postfix record order (children blocks left to right,
/// then the parent), with structural flags taken from the registry and
/// sizes already computed.
pub fn encode_tree(root: &ProgramNode, registry: &SymbolRegistry) -> Vec<HashRecord<String>> {
    let mut records = Vec::new();
    let mut stack: Vec<(&ProgramNode, bool)> = vec![(root, false)];

    while let Some((node, visited)) = stack.pop() {
        if visited {
            let label = node.label();
            let mut record =
                HashRecord::new(label.clone(), node.child_count(), hashing::seed_of(&label));
            record.commutative = registry.commutative_of(node);
            record.associative = registry.associative_of(node);
            record.rule = registry.rule_of(node);
            records.push(record);
        } else {
            stack.push((node, true));
            for child in node.children().iter().rev() {
                stack.push((child, false));
            }
        }
    }

    super::canonicalizer::update_sizes(&mut records);
    records
}
