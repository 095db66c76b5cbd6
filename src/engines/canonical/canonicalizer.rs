//! Canonical form for flattened tree encodings.
//!
//! The pipeline is `update_sizes -> reduce -> sort_and_hash`, then the
//! per-symbol rewrite rules; any rewrite that disables records triggers a
//! compaction and a re-run of the whole pipeline until a fixpoint is
//! reached. Equal programs end up with identical record sequences and an
//! identical root hash regardless of operand order or same-operator
//! nesting.

use std::cmp::Ordering;

use crate::engines::canonical::hash_node::{encode_tree, HashRecord};
use crate::engines::canonical::hashing;
use crate::engines::canonical::rewrite::apply_rules;
use crate::grammar::SymbolRegistry;
use crate::tree::node::ProgramNode;

/// Recompute every record's subtree size from its current arity.
///
/// Must run after any arity change before children are iterated again.
/// Ascending order guarantees children are sized before their parents.
pub fn update_sizes<T>(records: &mut [HashRecord<T>]) {
    for i in 0..records.len() {
        if records[i].arity == 0 {
            records[i].size = 0;
            continue;
        }
        let mut size = records[i].arity;
        let mut cursor = i;
        for _ in 0..records[i].arity {
            assert!(cursor > 0, "stale sizes: ran past start of encoding");
            let child = cursor - 1;
            assert!(
                records[child].size <= child,
                "stale sizes: child subtree overruns start of encoding"
            );
            size += records[child].size;
            cursor = child - records[child].size;
        }
        records[i].size = size;
    }
}

/// Indices of a record's immediate children, left to right.
///
/// Sizes must be current; stepping off the start of the array is a caller
/// invariant violation and panics.
pub fn child_indices<T>(records: &[HashRecord<T>], index: usize) -> Vec<usize> {
    let mut children = Vec::with_capacity(records[index].arity);
    let mut cursor = index;
    for _ in 0..records[index].arity {
        assert!(cursor > 0, "stale sizes: ran past start of encoding");
        let child = cursor - 1;
        assert!(
            records[child].size <= child,
            "stale sizes: child subtree overruns start of encoding"
        );
        children.push(child);
        cursor = child - records[child].size;
    }
    children.reverse();
    children
}

/// Flatten same-operator nesting under associative nodes: a child carrying
/// the same seed as its parent is absorbed, its operands becoming the
/// parent's. One ascending sweep settles arbitrarily deep nesting because
/// an inner node has already absorbed its own same-seed children by the
/// time its parent is visited.
///
/// Returns the compacted records and whether anything changed; an unchanged
/// input is returned as-is so callers can detect the fixpoint.
pub(crate) fn reduce<T>(records: Vec<HashRecord<T>>) -> (Vec<HashRecord<T>>, bool) {
    let mut records = records;
    let mut changed = false;

    for i in 0..records.len() {
        if !records[i].enabled || records[i].is_leaf() || !records[i].associative {
            continue;
        }
        for child in child_indices(&records, i) {
            if records[child].enabled
                && !records[child].is_leaf()
                && records[child].seed == records[i].seed
            {
                records[child].enabled = false;
                records[i].arity += records[child].arity - 1;
                changed = true;
            }
        }
    }

    if !changed {
        return (records, false);
    }
    let mut compacted: Vec<HashRecord<T>> = records.into_iter().filter(|r| r.enabled).collect();
    update_sizes(&mut compacted);
    (compacted, true)
}

/// Re-splice the subtree segment of `index` so its children's blocks appear
/// in `order`.
fn splice<T: Clone>(records: &mut [HashRecord<T>], index: usize, order: &[usize]) {
    let start = index - records[index].size;
    let mut segment = Vec::with_capacity(records[index].size);
    for &child in order {
        let block_start = child - records[child].size;
        segment.extend_from_slice(&records[block_start..=child]);
    }
    records[start..index].clone_from_slice(&segment);
}

/// Sort commutative operands into canonical order and assign every record
/// its combined hash, bottom-up.
pub(crate) fn sort_and_hash<T, F>(records: &mut [HashRecord<T>], comparer: &F)
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    for i in 0..records.len() {
        if records[i].is_leaf() {
            records[i].hash = hashing::combine(&[], records[i].seed);
            continue;
        }

        if records[i].commutative {
            let children = child_indices(records, i);
            if children.iter().all(|&c| records[c].is_leaf()) {
                // all operands are single records: sort them in place
                let start = i - records[i].size;
                records[start..i].sort_by(|a, b| comparer(&a.data, &b.data));
            } else {
                let mut order = children.clone();
                order.sort_by(|&a, &b| {
                    comparer(&records[a].data, &records[b].data)
                        .then_with(|| records[a].hash.cmp(&records[b].hash))
                });
                if order != children {
                    splice(records, i, &order);
                }
            }
        }

        let child_hashes: Vec<u64> = child_indices(records, i)
            .into_iter()
            .map(|c| records[c].hash)
            .collect();
        records[i].hash = hashing::combine(&child_hashes, records[i].seed);
    }
}

/// Canonicalize a flattened encoding using the payload's total order.
pub fn canonicalize<T: Clone + Ord>(records: &[HashRecord<T>]) -> Vec<HashRecord<T>> {
    canonicalize_with(records, T::cmp)
}

/// Canonicalize with an injected payload ordering.
///
/// Pure with respect to the input; the returned records satisfy the size
/// invariant, carry valid combined hashes, and are at a simplification
/// fixpoint.
pub fn canonicalize_with<T, F>(records: &[HashRecord<T>], comparer: F) -> Vec<HashRecord<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut current: Vec<HashRecord<T>> = records.to_vec();
    let mut pass = 0usize;

    loop {
        update_sizes(&mut current);
        let (reduced, _) = reduce(current);
        current = reduced;
        sort_and_hash(&mut current, &comparer);

        let disabled = apply_rules(&mut current);
        if disabled == 0 {
            return current;
        }

        pass += 1;
        log::debug!("simplification pass {}: {} records disabled", pass, disabled);

        let before = current.len();
        current.retain(|r| r.enabled);
        // Rewrite rules must strictly shrink the encoding or the fixpoint
        // loop would never terminate.
        debug_assert!(current.len() < before);
    }
}

/// Canonical hash of a single tree: encode, canonicalize, read the root
/// (final) record's combined hash.
pub fn tree_hash(node: &ProgramNode, registry: &SymbolRegistry) -> u64 {
    let records = encode_tree(node, registry);
    let canonical = canonicalize(&records);
    canonical.last().map(|r| r.hash).unwrap_or_default()
}
