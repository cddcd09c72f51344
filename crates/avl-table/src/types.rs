//! Node trait definitions.
//!
//! Nodes are stored in a [`Vec`]-backed arena and every child "pointer" is an
//! `Option<u32>` index into that arena. All tree-manipulation functions take
//! the arena as `&mut Vec<N>` (or `&[N]` when read-only) and work with
//! indices.
//!
//! Links only run downwards: a node knows its left and right child but not its
//! parent. Each index is held by exactly one child slot (or the root slot), so
//! the arena always describes a strict tree.

/// Child links (`l`, `r`).
pub trait Node {
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Keyed node interface used by the balancing engine.
///
/// The engine only ever reads keys; a node's key never changes once it has
/// been placed in the arena.
pub trait KeyNode<K>: Node {
    fn key(&self) -> &K;
}
