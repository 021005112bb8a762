use crate::merkle::{leaf_hash, node_hash, verify_proof, Tree};

fn rand_leaf(seed: u8) -> [u8; 32] {
  leaf_hash(u64::from(seed) + 1000, [seed; 32])
}

#[test]
fn single_leaf_tree_roots_to_itself() {
  let leaf = rand_leaf(1);
  let tree = Tree::build(vec![leaf]);
  assert_eq!(tree.root(), leaf);
  assert!(verify_proof(tree.root(), leaf, &tree.proof(0)));
}

#[test]
fn proofs_verify_for_every_leaf_in_odd_sized_tree() {
  let leaves: Vec<_> = (0 .. 5).map(rand_leaf).collect();
  let tree = Tree::build(leaves.clone());
  for (i, leaf) in leaves.iter().enumerate() {
    assert!(verify_proof(tree.root(), *leaf, &tree.proof(i)), "leaf {i} failed to verify");
  }
}

#[test]
fn proof_fails_against_wrong_root() {
  let leaves: Vec<_> = (0 .. 4).map(rand_leaf).collect();
  let tree = Tree::build(leaves.clone());
  let other_root = rand_leaf(99);
  assert!(!verify_proof(other_root, leaves[0], &tree.proof(0)));
}

#[test]
fn node_hash_is_order_independent() {
  let a = rand_leaf(1);
  let b = rand_leaf(2);
  assert_eq!(node_hash(a, b), node_hash(b, a));
}
