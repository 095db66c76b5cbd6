use evotree::engines::canonical::{canonicalize, encode_tree, tree_hash, HashRecord};
use evotree::grammar::SymbolRegistry;
use evotree::tree::ProgramNode;
use evotree::types::Value;

fn var(name: &str) -> ProgramNode {
    ProgramNode::Variable(name.to_string())
}

fn int(v: i64) -> ProgramNode {
    ProgramNode::Const(Value::Integer(v))
}

fn call(symbol: &str, args: Vec<ProgramNode>) -> ProgramNode {
    ProgramNode::Call {
        symbol: symbol.to_string(),
        args,
    }
}

/// Structural fingerprint of a canonical encoding, for exact comparisons
fn shape(records: &[HashRecord<String>]) -> Vec<(String, usize, usize, u64)> {
    records
        .iter()
        .map(|r| (r.data.clone(), r.arity, r.size, r.hash))
        .collect()
}

#[test]
fn commutative_operand_order_is_invariant() {
    let registry = SymbolRegistry::new();
    let subtree = call("Mul", vec![var("x"), var("y")]);

    let orderings = [
        call("Add", vec![var("a"), int(3), subtree.clone()]),
        call("Add", vec![int(3), var("a"), subtree.clone()]),
        call("Add", vec![subtree.clone(), int(3), var("a")]),
        call("Add", vec![var("a"), subtree, int(3)]),
    ];

    let hashes: Vec<u64> = orderings
        .iter()
        .map(|tree| tree_hash(tree, &registry))
        .collect();
    assert!(hashes.windows(2).all(|w| w[0] == w[1]), "{:?}", hashes);
}

#[test]
fn non_commutative_operand_order_matters() {
    let registry = SymbolRegistry::new();
    assert_ne!(
        tree_hash(&call("Sub", vec![var("a"), var("b")]), &registry),
        tree_hash(&call("Sub", vec![var("b"), var("a")]), &registry),
    );
    assert_ne!(
        tree_hash(&call("Div", vec![var("a"), var("b")]), &registry),
        tree_hash(&call("Div", vec![var("b"), var("a")]), &registry),
    );
}

#[test]
fn nested_associative_operator_flattens_to_nary() {
    let registry = SymbolRegistry::new();

    let nested = call("Add", vec![var("a"), call("Add", vec![var("b"), var("c")])]);
    let flat = call("Add", vec![var("a"), var("b"), var("c")]);

    let canonical_nested = canonicalize(&encode_tree(&nested, &registry));
    let canonical_flat = canonicalize(&encode_tree(&flat, &registry));

    assert_eq!(shape(&canonical_nested), shape(&canonical_flat));

    let root = canonical_nested.last().unwrap();
    assert_eq!(root.arity, 3);
    assert_eq!(canonical_nested.len(), 4);
}

#[test]
fn commutative_non_associative_sorts_without_flattening() {
    let registry = SymbolRegistry::new();

    // Operand order is irrelevant for Average...
    assert_eq!(
        tree_hash(&call("Avg", vec![var("a"), var("b")]), &registry),
        tree_hash(&call("Avg", vec![var("b"), var("a")]), &registry),
    );

    // ...but nesting is not: avg(avg(a, b), c) != avg(a, b, c)
    let nested = call("Avg", vec![call("Avg", vec![var("a"), var("b")]), var("c")]);
    let flat = call("Avg", vec![var("a"), var("b"), var("c")]);
    assert_ne!(tree_hash(&nested, &registry), tree_hash(&flat, &registry));

    let canonical = canonicalize(&encode_tree(&nested, &registry));
    assert_eq!(canonical.len(), 5);
}

#[test]
fn canonicalization_is_idempotent() {
    let registry = SymbolRegistry::new();

    let trees = [
        call("Add", vec![var("c"), call("Add", vec![var("b"), var("a")])]),
        call("And", vec![var("x"), var("x"), var("y")]),
        call("Not", vec![call("Not", vec![call("Mul", vec![var("q"), int(7)])])]),
        call(
            "Max",
            vec![
                call("Min", vec![var("a"), var("b")]),
                call("Min", vec![var("b"), var("a")]),
            ],
        ),
    ];

    for tree in &trees {
        let once = canonicalize(&encode_tree(tree, &registry));
        let twice = canonicalize(&once);
        assert_eq!(shape(&once), shape(&twice), "not idempotent: {:?}", tree);
    }
}

#[test]
fn idempotent_operator_merges_equal_operands_across_nesting() {
    let registry = SymbolRegistry::new();

    // max(max(a, b), b, a) flattens to max(a, b, b, a), sorts, and drops
    // the duplicates
    let tree = call(
        "Max",
        vec![call("Max", vec![var("a"), var("b")]), var("b"), var("a")],
    );
    let canonical = canonicalize(&encode_tree(&tree, &registry));

    let labels: Vec<&str> = canonical.iter().map(|r| r.data.as_str()).collect();
    assert_eq!(labels, vec!["a", "b", "Max"]);

    assert_eq!(
        canonical.last().unwrap().hash,
        tree_hash(&call("Max", vec![var("b"), var("a")]), &registry)
    );
}

#[test]
fn equal_subtrees_under_idempotent_operator_collapse_entirely() {
    let registry = SymbolRegistry::new();

    // Two copies of the same comparison under And
    let left = call("Gt", vec![var("p"), var("q")]);
    let tree = call("And", vec![left.clone(), left.clone()]);
    let canonical = canonicalize(&encode_tree(&tree, &registry));

    // The And disappears; only one comparison survives
    assert_eq!(canonical.last().unwrap().hash, tree_hash(&left, &registry));
}

#[test]
fn deep_commutative_trees_sort_whole_subtrees() {
    let registry = SymbolRegistry::new();

    let tree_one = call(
        "Mul",
        vec![
            call("Sub", vec![var("z"), var("a")]),
            call("Add", vec![var("m"), var("n")]),
        ],
    );
    let tree_two = call(
        "Mul",
        vec![
            call("Add", vec![var("n"), var("m")]),
            call("Sub", vec![var("z"), var("a")]),
        ],
    );

    assert_eq!(
        tree_hash(&tree_one, &registry),
        tree_hash(&tree_two, &registry)
    );
}
