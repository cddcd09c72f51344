use std::cmp::Ordering;
use std::fmt::Debug;

use super::types::AvlNodeLike;
use crate::tracing_helpers::{debug_log, trace_log};

#[inline]
fn get_l<K, N>(arena: &[N], i: u32) -> Option<u32>
where
    N: AvlNodeLike<K>,
{
    arena[i as usize].l()
}

#[inline]
fn get_r<K, N>(arena: &[N], i: u32) -> Option<u32>
where
    N: AvlNodeLike<K>,
{
    arena[i as usize].r()
}

#[inline]
fn set_l<K, N>(arena: &mut [N], i: u32, v: Option<u32>)
where
    N: AvlNodeLike<K>,
{
    arena[i as usize].set_l(v);
}

#[inline]
fn set_r<K, N>(arena: &mut [N], i: u32, v: Option<u32>)
where
    N: AvlNodeLike<K>,
{
    arena[i as usize].set_r(v);
}

/// Cached height of the subtree rooted at `node`, `-1` when absent.
#[inline]
pub fn height<K, N>(arena: &[N], node: Option<u32>) -> i32
where
    N: AvlNodeLike<K>,
{
    node.map_or(-1, |i| arena[i as usize].height())
}

/// Recomputes the cached height of `i` from its children's cached heights.
#[inline]
pub fn update_height<K, N>(arena: &mut [N], i: u32)
where
    N: AvlNodeLike<K>,
{
    let lh = height(arena, get_l(arena, i));
    let rh = height(arena, get_r(arena, i));
    arena[i as usize].set_height(1 + lh.max(rh));
}

/// Where an [`insert`] call landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A new leaf was pushed onto the arena at this index.
    Created(u32),
    /// A node with an equal key already exists at this index.
    Existing(u32),
}

impl Placement {
    pub fn index(self) -> u32 {
        match self {
            Placement::Created(i) | Placement::Existing(i) => i,
        }
    }
}

/// Single rotation with the left child (left-left case).
///
/// `k2` is the unbalanced node and `k1` its left child. Returns `k1`, the new
/// subtree root.
fn rotate_with_left_child<K, N>(arena: &mut [N], k2: u32, k1: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let k1r = get_r(arena, k1);
    set_l(arena, k2, k1r);
    set_r(arena, k1, Some(k2));
    update_height(arena, k2);
    update_height(arena, k1);
    k1
}

/// Single rotation with the right child (right-right case).
///
/// `k1` is the unbalanced node and `k2` its right child. Returns `k2`.
fn rotate_with_right_child<K, N>(arena: &mut [N], k1: u32, k2: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let k2l = get_l(arena, k2);
    set_r(arena, k1, k2l);
    set_l(arena, k2, Some(k1));
    update_height(arena, k1);
    update_height(arena, k2);
    k2
}

/// Double rotation for the left-right case: `k1` (left child of `k3`) is
/// rotated with its right child `k2`, then `k3` with its new left child.
fn double_with_left_child<K, N>(arena: &mut [N], k3: u32, k1: u32, k2: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let l = rotate_with_right_child(arena, k1, k2);
    set_l(arena, k3, Some(l));
    rotate_with_left_child(arena, k3, l)
}

/// Mirror of [`double_with_left_child`] for the right-left case.
fn double_with_right_child<K, N>(arena: &mut [N], k1: u32, k3: u32, k2: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let r = rotate_with_left_child(arena, k3, k2);
    set_r(arena, k1, Some(r));
    rotate_with_right_child(arena, k1, r)
}

/// Restores balance at `n` whose left subtree `l` is two levels too deep.
fn balance_left<K, N>(arena: &mut [N], n: u32, l: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let ll = get_l(arena, l);
    match get_r(arena, l) {
        Some(lr) if height(arena, ll) < height(arena, Some(lr)) => {
            debug_log!(node = n, "left-right double rotation");
            double_with_left_child(arena, n, l, lr)
        }
        _ => {
            debug_log!(node = n, "left-left single rotation");
            rotate_with_left_child(arena, n, l)
        }
    }
}

fn balance_right<K, N>(arena: &mut [N], n: u32, r: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let rr = get_r(arena, r);
    match get_l(arena, r) {
        Some(rl) if height(arena, rr) < height(arena, Some(rl)) => {
            debug_log!(node = n, "right-left double rotation");
            double_with_right_child(arena, n, r, rl)
        }
        _ => {
            debug_log!(node = n, "right-right single rotation");
            rotate_with_right_child(arena, n, r)
        }
    }
}

/// Inserts `node` into the subtree rooted at `root`.
///
/// Returns the (possibly new) subtree root and where the key ended up. When
/// an equal key is already present `node` is dropped and the tree is left
/// untouched. Otherwise `node` is pushed onto the arena as a leaf and every
/// node on the way back up has its height refreshed, rotating wherever the
/// two child heights have drifted apart by 2.
pub fn insert<K, N, C>(arena: &mut Vec<N>, root: Option<u32>, node: N, cmp: &C) -> (u32, Placement)
where
    N: AvlNodeLike<K>,
    C: Fn(&K, &K) -> Ordering,
{
    let Some(t) = root else {
        let idx = arena.len() as u32;
        arena.push(node);
        trace_log!(index = idx, "leaf created");
        return (idx, Placement::Created(idx));
    };

    match cmp(node.key(), arena[t as usize].key()) {
        Ordering::Less => {
            let (l, placement) = insert(arena, get_l(arena, t), node, cmp);
            set_l(arena, t, Some(l));
            if height(arena, Some(l)) - height(arena, get_r(arena, t)) == 2 {
                (balance_left(arena, t, l), placement)
            } else {
                update_height(arena, t);
                (t, placement)
            }
        }
        Ordering::Greater => {
            let (r, placement) = insert(arena, get_r(arena, t), node, cmp);
            set_r(arena, t, Some(r));
            if height(arena, Some(r)) - height(arena, get_l(arena, t)) == 2 {
                (balance_right(arena, t, r), placement)
            } else {
                update_height(arena, t);
                (t, placement)
            }
        }
        Ordering::Equal => (t, Placement::Existing(t)),
    }
}

/// Binary search. `probe` compares the sought key against a node's key.
/// Tombstoned nodes are found like any other.
pub fn find<K, N, P>(arena: &[N], root: Option<u32>, probe: P) -> Option<u32>
where
    N: AvlNodeLike<K>,
    P: Fn(&K) -> Ordering,
{
    let mut curr = root;
    while let Some(i) = curr {
        curr = match probe(arena[i as usize].key()) {
            Ordering::Less => get_l(arena, i),
            Ordering::Greater => get_r(arena, i),
            Ordering::Equal => return Some(i),
        };
    }
    None
}

/// Checks BST order, AVL balance and height-cache correctness, and that every
/// arena slot is reachable from `root` exactly once.
pub fn assert_avl_tree<K, N, C>(arena: &[N], root: Option<u32>, cmp: &C) -> Result<(), String>
where
    N: AvlNodeLike<K>,
    C: Fn(&K, &K) -> Ordering,
{
    fn validate<'a, K, N, C>(
        arena: &'a [N],
        node: Option<u32>,
        lo: Option<&'a K>,
        hi: Option<&'a K>,
        seen: &mut [bool],
        cmp: &C,
    ) -> Result<i32, String>
    where
        N: AvlNodeLike<K>,
        C: Fn(&K, &K) -> Ordering,
    {
        let Some(i) = node else {
            return Ok(-1);
        };
        let Some(slot) = seen.get_mut(i as usize) else {
            return Err(format!("Node[{i}] is outside the arena"));
        };
        if *slot {
            return Err(format!("Node[{i}] is linked more than once"));
        }
        *slot = true;

        let n = &arena[i as usize];
        if let Some(lo) = lo {
            if cmp(lo, n.key()) != Ordering::Less {
                return Err(format!("Node[{i}] order violated against lower bound"));
            }
        }
        if let Some(hi) = hi {
            if cmp(n.key(), hi) != Ordering::Less {
                return Err(format!("Node[{i}] order violated against upper bound"));
            }
        }

        let lh = validate(arena, n.l(), lo, Some(n.key()), seen, cmp)?;
        let rh = validate(arena, n.r(), Some(n.key()), hi, seen, cmp)?;
        let expected = 1 + lh.max(rh);
        if n.height() != expected {
            return Err(format!(
                "Node[{i}] height mismatch: expected {expected}, got {}",
                n.height()
            ));
        }
        if (lh - rh).abs() > 1 {
            return Err(format!(
                "Node[{i}] AVL balance violated: left {lh}, right {rh}"
            ));
        }
        Ok(expected)
    }

    let mut seen = vec![false; arena.len()];
    validate(arena, root, None, None, &mut seen, cmp)?;
    if let Some(orphan) = seen.iter().position(|s| !s) {
        return Err(format!("Node[{orphan}] is not reachable from the root"));
    }
    Ok(())
}

/// Debug printer for AVL tables. Tombstoned nodes are printed and flagged.
pub fn print<K, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    N: AvlNodeLike<K>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print::<K, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<K, N>(arena, n.r(), &format!("{tab}  "));
            let erased = if n.erased() { " [erased]" } else { "" };
            format!(
                "Node[{i}] [h={}]{erased} {:?}\n{tab}L={left}\n{tab}R={right}",
                n.height(),
                n.key(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::types::AvlNode;

    fn build(keys: &[u32]) -> (Vec<AvlNode<u32>>, Option<u32>) {
        let mut arena = Vec::new();
        let mut root = None;
        for &k in keys {
            let (r, _) = insert(&mut arena, root, AvlNode::new(k), &u32::cmp);
            root = Some(r);
            assert_avl_tree(&arena, root, &u32::cmp).unwrap();
        }
        (arena, root)
    }

    fn shape(arena: &[AvlNode<u32>], root: Option<u32>) -> (u32, Option<u32>, Option<u32>) {
        let n = &arena[root.unwrap() as usize];
        (
            n.k,
            n.l.map(|i| arena[i as usize].k),
            n.r.map(|i| arena[i as usize].k),
        )
    }

    #[test]
    fn right_right_single_rotation() {
        let (arena, root) = build(&[1, 2, 3]);
        assert_eq!(shape(&arena, root), (2, Some(1), Some(3)));
        let r = &arena[root.unwrap() as usize];
        assert_eq!(r.h, 1);
        assert_eq!(arena[r.l.unwrap() as usize].h, 0);
        assert_eq!(arena[r.r.unwrap() as usize].h, 0);
    }

    #[test]
    fn left_left_single_rotation() {
        let (arena, root) = build(&[3, 2, 1]);
        assert_eq!(shape(&arena, root), (2, Some(1), Some(3)));
    }

    #[test]
    fn left_right_double_rotation() {
        let (arena, root) = build(&[3, 1, 2]);
        assert_eq!(shape(&arena, root), (2, Some(1), Some(3)));
        assert_eq!(height(&arena, root), 1);
    }

    #[test]
    fn right_left_double_rotation() {
        let (arena, root) = build(&[1, 3, 2]);
        assert_eq!(shape(&arena, root), (2, Some(1), Some(3)));
        assert_eq!(height(&arena, root), 1);
    }

    #[test]
    fn rotation_below_root_relinks_parent() {
        let (arena, root) = build(&[5, 3, 8, 1, 0]);
        assert_eq!(shape(&arena, root), (5, Some(1), Some(8)));
        let one = arena[root.unwrap() as usize].l;
        assert_eq!(shape(&arena, one), (1, Some(0), Some(3)));
        assert_eq!(height(&arena, root), 2);
    }

    #[test]
    fn duplicate_insert_reports_existing_node() {
        let (mut arena, root) = build(&[2, 1, 3]);
        let before = arena.len();
        let (new_root, placement) = insert(&mut arena, root, AvlNode::new(3), &u32::cmp);
        assert_eq!(Some(new_root), root);
        assert!(matches!(placement, Placement::Existing(_)));
        assert_eq!(arena[placement.index() as usize].k, 3);
        assert_eq!(arena.len(), before);
    }

    #[test]
    fn find_walks_both_sides() {
        let (arena, root) = build(&[10, 20, 30, 40, 50, 25]);
        for k in [10, 20, 25, 30, 40, 50] {
            let i = find(&arena, root, |n: &u32| k.cmp(n)).unwrap();
            assert_eq!(arena[i as usize].k, k);
        }
        assert_eq!(find(&arena, root, |n: &u32| 35.cmp(n)), None);
        assert_eq!(find(&arena, None, |n: &u32| 35.cmp(n)), None);
    }

    #[test]
    fn assert_avl_tree_detects_stale_height() {
        let (mut arena, root) = build(&[2, 1, 3]);
        arena[root.unwrap() as usize].h = 5;
        assert!(assert_avl_tree(&arena, root, &u32::cmp)
            .unwrap_err()
            .contains("height mismatch"));
    }

    #[test]
    fn assert_avl_tree_detects_order_violation() {
        let (mut arena, root) = build(&[2, 1, 3]);
        let l = arena[root.unwrap() as usize].l.unwrap();
        arena[l as usize].k = 9;
        assert!(assert_avl_tree(&arena, root, &u32::cmp)
            .unwrap_err()
            .contains("order violated"));
    }

    #[test]
    fn print_marks_erased_nodes() {
        let (mut arena, root) = build(&[2, 1, 3]);
        let l = arena[root.unwrap() as usize].l.unwrap();
        arena[l as usize].erased = true;
        let out = print(&arena, root, "");
        assert!(out.starts_with("Node[0] [h=1] 2"));
        assert!(out.contains("[erased] 1"));
    }
}
