//! Symbol-specific rewrites applied during canonical simplification.
//!
//! Dispatch is a closed enum chosen at encoding time ([`SimplifyRule`]),
//! not a per-record callback. Rules only disable records; the orchestrator
//! compacts and re-runs the pipeline afterwards. Every rule must strictly
//! shrink the record count whenever it reports a change.

use crate::engines::canonical::canonicalizer::child_indices;
use crate::engines::canonical::hash_node::HashRecord;
use crate::types::SimplifyRule;

/// Run each enabled non-leaf record's rewrite rule. Returns how many
/// records were disabled. Requires current sizes and hashes (i.e. runs
/// right after a sort pass).
pub(crate) fn apply_rules<T>(records: &mut [HashRecord<T>]) -> usize {
    let mut disabled = 0;
    for i in 0..records.len() {
        if !records[i].enabled || records[i].is_leaf() {
            continue;
        }
        match records[i].rule {
            SimplifyRule::None => {}
            SimplifyRule::IdempotentOperands => disabled += drop_duplicate_operands(records, i),
            SimplifyRule::SelfInverse => disabled += collapse_double_application(records, i),
        }
    }
    disabled
}

/// and(x, x, y) -> and(x, y). Operands are already in canonical order, so
/// structurally equal operands sit adjacent and share a combined hash.
/// If a single operand survives it replaces the node entirely.
fn drop_duplicate_operands<T>(records: &mut [HashRecord<T>], index: usize) -> usize {
    let children = child_indices(records, index);
    let mut kept_hash: Option<u64> = None;
    let mut disabled = 0;

    for &child in &children {
        if !records[child].enabled {
            continue;
        }
        if kept_hash == Some(records[child].hash) {
            disabled += disable_subtree(records, child);
            records[index].arity -= 1;
        } else {
            kept_hash = Some(records[child].hash);
        }
    }

    if records[index].arity == 1 {
        records[index].enabled = false;
        disabled += 1;
    }
    disabled
}

/// not(not(x)) -> x. A unary node whose single operand carries the same
/// seed (the same operator applied again) cancels with it; the inner
/// operand takes their place.
fn collapse_double_application<T>(records: &mut [HashRecord<T>], index: usize) -> usize {
    if records[index].arity != 1 {
        return 0;
    }
    let child = index - 1;
    if !records[child].enabled
        || records[child].arity != 1
        || records[child].seed != records[index].seed
    {
        return 0;
    }
    records[index].enabled = false;
    records[child].enabled = false;
    2
}

/// Disable a record and every record of its subtree
fn disable_subtree<T>(records: &mut [HashRecord<T>], index: usize) -> usize {
    let start = index - records[index].size;
    let mut disabled = 0;
    for record in &mut records[start..=index] {
        if record.enabled {
            record.enabled = false;
            disabled += 1;
        }
    }
    disabled
}
