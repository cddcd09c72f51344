use crate::types::{KeyNode, Node};

/// Per-key bookkeeping carried alongside every table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occurrences {
    /// Number of times the key has been seen. Starts at 1.
    pub count: u32,
    /// Line numbers, in the order they were appended. Duplicates allowed.
    pub lines: Vec<u32>,
    /// Page numbers derived from appended lines, in append order.
    pub pages: Vec<u32>,
}

impl Default for Occurrences {
    fn default() -> Self {
        Self {
            count: 1,
            lines: Vec::new(),
            pages: Vec::new(),
        }
    }
}

/// Arena node of an [`AvlTable`](super::AvlTable).
#[derive(Clone, Debug)]
pub struct AvlNode<K> {
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    /// Cached subtree height. A leaf has height 0, an absent child counts as -1.
    pub h: i32,
    /// Tombstone. Erased nodes keep their place in the tree.
    pub erased: bool,
    pub info: Occurrences,
}

impl<K> AvlNode<K> {
    pub fn new(k: K) -> Self {
        Self {
            l: None,
            r: None,
            k,
            h: 0,
            erased: false,
            info: Occurrences::default(),
        }
    }
}

impl<K> Node for AvlNode<K> {
    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<K> KeyNode<K> for AvlNode<K> {
    fn key(&self) -> &K {
        &self.k
    }
}

/// AVL-specific node behavior.
pub trait AvlNodeLike<K>: KeyNode<K> {
    fn height(&self) -> i32;
    fn set_height(&mut self, h: i32);
    fn erased(&self) -> bool;
}

impl<K> AvlNodeLike<K> for AvlNode<K> {
    fn height(&self) -> i32 {
        self.h
    }

    fn set_height(&mut self, h: i32) {
        self.h = h;
    }

    fn erased(&self) -> bool {
        self.erased
    }
}
