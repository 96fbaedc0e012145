// Packed trie node record.
//
// Nodes form a left-child / right-sibling tree stored in one Vec. All
// references are u32 indices with NONE as the null value, so the node table
// is plain data and can be written to and read from an index image directly.

use bytemuck::{Pod, Zeroable};

/// Null reference for `first_child`, `next_sibling` and `word`.
pub const NONE: u32 = u32::MAX;

/// Score of a node that does not end a word and has no scored descendants.
pub const NO_SCORE: f64 = f64::NEG_INFINITY;

/// One node of a [`PackedTrie`](crate::PackedTrie) (32 bytes).
///
/// - `label`: the case-folded character on the edge into this node
///   (unused for the root)
/// - `first_child`: index of the child with the smallest label
/// - `next_sibling`: index of the next sibling in ascending label order
/// - `word`: index into the word table if this node ends a word
/// - `score`: score of the word ending here
/// - `max_score`: maximum score in this node's subtree, used for pruning
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedNode {
    pub label: u32,
    pub first_child: u32,
    pub next_sibling: u32,
    pub word: u32,
    pub score: f64,
    pub max_score: f64,
}

impl PackedNode {
    pub fn new(label: char) -> Self {
        Self {
            label: label as u32,
            first_child: NONE,
            next_sibling: NONE,
            word: NONE,
            score: NO_SCORE,
            max_score: NO_SCORE,
        }
    }

    pub fn root() -> Self {
        Self::new('\0')
    }

    #[inline]
    pub fn label_char(&self) -> Option<char> {
        char::from_u32(self.label)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.word != NONE
    }
}

const _: () = assert!(size_of::<PackedNode>() == 32);
