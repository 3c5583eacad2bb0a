use ark_bn254::Fr;
use light_poseidon::PoseidonError;

use crate::hashing::poseidon;

/// Depth of the Semaphore group tree the circuit is compiled for.
pub const TREE_DEPTH: usize = 20;

/// Inclusion proof in a binary Poseidon tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MerkleProof {
    pub root: Fr,
    pub siblings: Vec<Fr>,
    /// `0` if the path goes through the left child at that level, `1` otherwise.
    pub path_indices: Vec<u8>,
}

impl MerkleProof {
    /// Proof for `leaf` in a tree of `depth` levels holding no other leaf. Every sibling is the
    /// root of an empty subtree of the corresponding height.
    pub fn single_leaf(depth: usize, zero_value: Fr, leaf: Fr) -> Result<Self, PoseidonError> {
        let siblings = zero_hashes(depth, zero_value)?;
        let path_indices = vec![0; depth];
        let root = fold_path(leaf, &siblings, &path_indices)?;

        Ok(Self {
            root,
            siblings,
            path_indices,
        })
    }

    /// Root reached by hashing `leaf` up along this path.
    pub fn compute_root(&self, leaf: Fr) -> Result<Fr, PoseidonError> {
        fold_path(leaf, &self.siblings, &self.path_indices)
    }
}

/// Roots of empty subtrees of height `0..depth`.
pub fn zero_hashes(depth: usize, zero_value: Fr) -> Result<Vec<Fr>, PoseidonError> {
    let mut zeros = Vec::with_capacity(depth);
    let mut zero = zero_value;
    for _ in 0..depth {
        zeros.push(zero);
        zero = poseidon(&[zero, zero])?;
    }
    Ok(zeros)
}

pub fn fold_path(leaf: Fr, siblings: &[Fr], path_indices: &[u8]) -> Result<Fr, PoseidonError> {
    siblings
        .iter()
        .zip(path_indices)
        .try_fold(leaf, |node, (sibling, index)| match index {
            0 => poseidon(&[node, *sibling]),
            _ => poseidon(&[*sibling, node]),
        })
}

#[cfg(test)]
mod tests {
    use ark_ff::Zero;

    use super::*;

    #[test]
    fn single_leaf_proof_has_full_depth() {
        let proof = MerkleProof::single_leaf(TREE_DEPTH, Fr::zero(), Fr::from(7u64)).unwrap();

        assert_eq!(proof.siblings.len(), TREE_DEPTH);
        assert_eq!(proof.path_indices, vec![0; TREE_DEPTH]);
    }

    #[test]
    fn siblings_are_empty_subtree_roots() {
        let proof = MerkleProof::single_leaf(4, Fr::zero(), Fr::from(7u64)).unwrap();

        assert_eq!(proof.siblings[0], Fr::zero());
        for level in 1..4 {
            let below = proof.siblings[level - 1];
            assert_eq!(proof.siblings[level], poseidon(&[below, below]).unwrap());
        }
    }

    #[test]
    fn root_folds_leaf_with_siblings() {
        let leaf = Fr::from(7u64);
        let proof = MerkleProof::single_leaf(2, Fr::zero(), leaf).unwrap();

        let level_one = poseidon(&[leaf, Fr::zero()]).unwrap();
        let zero_one = poseidon(&[Fr::zero(), Fr::zero()]).unwrap();
        assert_eq!(proof.root, poseidon(&[level_one, zero_one]).unwrap());
        assert_eq!(proof.compute_root(leaf).unwrap(), proof.root);
    }

    #[test]
    fn other_leaves_do_not_reach_the_root() {
        let proof = MerkleProof::single_leaf(TREE_DEPTH, Fr::zero(), Fr::from(7u64)).unwrap();
        assert_ne!(proof.compute_root(Fr::from(8u64)).unwrap(), proof.root);
    }

    #[test]
    fn right_child_is_hashed_second() {
        let (leaf, sibling) = (Fr::from(1u64), Fr::from(2u64));

        assert_eq!(
            fold_path(leaf, &[sibling], &[1]).unwrap(),
            poseidon(&[sibling, leaf]).unwrap()
        );
    }
}
