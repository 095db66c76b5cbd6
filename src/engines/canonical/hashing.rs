//! Rolling hash used for canonical tree fingerprints.
//!
//! JSHash variant widened to 64 bits. Order-sensitive, so sorting operands
//! into canonical order must happen before combining.

pub fn js_hash(data: &[u8]) -> u64 {
    let mut hash: u64 = 1_315_423_911;
    for &byte in data {
        hash ^= (hash << 5)
            .wrapping_add(u64::from(byte))
            .wrapping_add(hash >> 2);
    }
    hash
}

/// Intrinsic hash of a node, independent of its children
pub fn seed_of(label: &str) -> u64 {
    js_hash(label.as_bytes())
}

/// Combined hash of a node: rolling hash over its children's combined
/// hashes followed by its own seed. Leaves combine an empty child list,
/// which still differs from the bare seed.
pub fn combine(child_hashes: &[u64], seed: u64) -> u64 {
    let mut buffer = Vec::with_capacity((child_hashes.len() + 1) * 8);
    for hash in child_hashes {
        buffer.extend_from_slice(&hash.to_le_bytes());
    }
    buffer.extend_from_slice(&seed.to_le_bytes());
    js_hash(&buffer)
}
