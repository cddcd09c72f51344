use std::iter::FusedIterator;

use super::types::AvlNode;

/// Borrowed view of one live table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'a, K> {
    pub key: &'a K,
    pub occurrence: u32,
    pub lines: &'a [u32],
    pub pages: &'a [u32],
}

/// In-order iterator over the live entries of an [`AvlTable`](super::AvlTable).
///
/// Tombstoned nodes are walked through but never yielded.
pub struct Entries<'a, K> {
    arena: &'a [AvlNode<K>],
    stack: Vec<u32>,
    remaining: usize,
}

impl<'a, K> Entries<'a, K> {
    pub(crate) fn new(arena: &'a [AvlNode<K>], root: Option<u32>, live: usize) -> Self {
        let mut entries = Self {
            arena,
            stack: Vec::new(),
            remaining: live,
        };
        entries.push_left(root);
        entries
    }

    fn push_left(&mut self, mut node: Option<u32>) {
        while let Some(i) = node {
            self.stack.push(i);
            node = self.arena[i as usize].l;
        }
    }
}

impl<'a, K> Iterator for Entries<'a, K> {
    type Item = Entry<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let i = self.stack.pop()?;
            let n = &arena[i as usize];
            self.push_left(n.r);
            if n.erased {
                continue;
            }
            self.remaining -= 1;
            return Some(Entry {
                key: &n.k,
                occurrence: n.info.count,
                lines: &n.info.lines,
                pages: &n.info.pages,
            });
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Entries<'_, K> {}

impl<K> FusedIterator for Entries<'_, K> {}
