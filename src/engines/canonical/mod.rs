pub mod canonicalizer;
pub mod dedup;
pub mod hash_node;
pub mod hashing;
pub mod rewrite;

pub use canonicalizer::{canonicalize, canonicalize_with, child_indices, tree_hash, update_sizes};
pub use dedup::{canonical_hashes, program_hash, DuplicateFilter};
pub use hash_node::{encode_tree, HashRecord};
