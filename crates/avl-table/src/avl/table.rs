use std::borrow::Borrow;
use std::fmt::Debug;

use super::iter::Entries;
use super::types::AvlNode;
use super::util::{assert_avl_tree, find, height, insert, print, Placement};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::tracing_helpers::debug_log;

/// Ordered table of keys, each carrying an occurrence count and the lines
/// and pages it was seen on.
///
/// Backed by a height-balanced (AVL) binary search tree stored in an index
/// arena. Removal is lazy: [`remove`](Self::remove) only tombstones a node,
/// which stays in the tree, keeps its metadata, is still returned by
/// [`find`](Self::find), and is skipped by [`traverse`](Self::traverse),
/// [`entries`](Self::entries) and [`size`](Self::size). Nothing is rebalanced
/// on removal. Inserting a tombstoned key brings it back to life with its
/// metadata intact.
///
/// Lookups that miss return the `not_found` sentinel given at construction.
///
/// The table has no interior synchronisation. Share it across threads behind a
/// single lock (for example `Mutex<AvlTable<K>>`).
///
/// ```
/// use avl_table::AvlTable;
///
/// let mut table = AvlTable::new("<NF>".to_string());
/// for word in ["dog", "cat", "bird"] {
///     table.insert(word.to_string());
/// }
/// assert_eq!(table.find("cat"), "cat");
/// assert_eq!(table.find("fish"), "<NF>");
///
/// let mut keys = Vec::new();
/// table.traverse(|key, _, _, _| keys.push(key.clone()));
/// assert_eq!(keys, ["bird", "cat", "dog"]);
/// ```
#[derive(Clone, Debug)]
pub struct AvlTable<K> {
    arena: Vec<AvlNode<K>>,
    root: Option<u32>,
    not_found: K,
    live: usize,
    config: TableConfig,
}

impl<K: Ord> AvlTable<K> {
    /// Empty table with the default [`TableConfig`].
    pub fn new(not_found: K) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            not_found,
            live: 0,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(not_found: K, config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(not_found)
        })
    }

    /// Places `key` in the tree, resurrecting a tombstoned node if needed.
    /// The flag is `true` when the set of live keys changed.
    fn place(&mut self, key: K) -> (u32, bool) {
        let (root, placement) = insert(&mut self.arena, self.root, AvlNode::new(key), &K::cmp);
        self.root = Some(root);
        match placement {
            Placement::Created(i) => {
                self.live += 1;
                (i, true)
            }
            Placement::Existing(i) => {
                let node = &mut self.arena[i as usize];
                if !node.erased {
                    return (i, false);
                }
                node.erased = false;
                self.live += 1;
                debug_log!(index = i, "tombstoned key resurrected");
                (i, true)
            }
        }
    }

    /// Inserts `key`.
    ///
    /// A live equal key makes this a no-op that leaves its metadata alone. A
    /// tombstoned equal key is resurrected. Returns `true` when the set of
    /// live keys changed.
    pub fn insert(&mut self, key: K) -> bool {
        self.place(key).1
    }

    /// Feeds one token occurrence on `line` into the table.
    ///
    /// Increments the occurrence count if the key is already known (live or
    /// tombstoned), inserts it otherwise, then appends `line` and its page.
    pub fn record(&mut self, key: K, line: u32) {
        let seen = self.get(&key).is_some();
        let page = self.config.page_of(line);
        let (i, _) = self.place(key);
        let info = &mut self.arena[i as usize].info;
        if seen {
            info.count += 1;
        }
        info.lines.push(line);
        info.pages.push(page);
    }

    fn index_of<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        find(&self.arena, self.root, |k: &K| key.cmp(k.borrow()))
    }

    /// Stored key equal to `key`, or `None`. Tombstoned keys are returned.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index_of(key).map(|i| &self.arena[i as usize].k)
    }

    /// Stored key equal to `key`, or the `not_found` sentinel. Tombstoned keys
    /// are returned.
    pub fn find<Q>(&self, key: &Q) -> &K
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).unwrap_or(&self.not_found)
    }

    /// Whether a node for `key` exists, tombstoned or not.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index_of(key).is_some()
    }

    /// Whether `key` is present and not tombstoned.
    pub fn is_live<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index_of(key)
            .is_some_and(|i| !self.arena[i as usize].erased)
    }

    /// Tombstones `key`. Returns `true` if a live node was tombstoned; absent
    /// and already tombstoned keys are left alone.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(i) = self.index_of(key) else {
            return false;
        };
        let node = &mut self.arena[i as usize];
        if node.erased {
            return false;
        }
        node.erased = true;
        self.live -= 1;
        debug_log!(index = i, live = self.live, "key tombstoned");
        true
    }

    fn node<Q>(&self, key: &Q) -> Result<&AvlNode<K>, TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let i = self.index_of(key).ok_or(TableError::KeyNotPresent)?;
        Ok(&self.arena[i as usize])
    }

    fn node_mut<Q>(&mut self, key: &Q) -> Result<&mut AvlNode<K>, TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let i = self.index_of(key).ok_or(TableError::KeyNotPresent)?;
        Ok(&mut self.arena[i as usize])
    }

    /// Bumps the occurrence count of `key` and returns the new count.
    pub fn inc_occurrence<Q>(&mut self, key: &Q) -> Result<u32, TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let info = &mut self.node_mut(key)?.info;
        info.count += 1;
        Ok(info.count)
    }

    pub fn occurrence<Q>(&self, key: &Q) -> Result<u32, TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(self.node(key)?.info.count)
    }

    /// Appends `line` to the line list of `key`.
    pub fn set_lines<Q>(&mut self, line: u32, key: &Q) -> Result<(), TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.node_mut(key)?.info.lines.push(line);
        Ok(())
    }

    pub fn lines<Q>(&self, key: &Q) -> Result<&[u32], TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(&self.node(key)?.info.lines)
    }

    /// Appends the page holding `line` to the page list of `key`.
    pub fn set_pages<Q>(&mut self, line: u32, key: &Q) -> Result<(), TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let page = self.config.page_of(line);
        self.node_mut(key)?.info.pages.push(page);
        Ok(())
    }

    pub fn pages<Q>(&self, key: &Q) -> Result<&[u32], TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(&self.node(key)?.info.pages)
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        assert_avl_tree(&self.arena, self.root, &K::cmp)?;
        let live = self.arena.iter().filter(|n| !n.erased).count();
        if live != self.live {
            return Err(format!(
                "Live count mismatch: expected {live}, got {}",
                self.live
            ));
        }
        Ok(())
    }
}

impl<K> AvlTable<K> {
    /// Number of live (non-tombstoned) keys.
    pub fn size(&self) -> usize {
        self.live
    }

    /// Whether the tree holds no nodes at all. A table whose every key is
    /// tombstoned is not empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Releases every node, tombstoned ones included.
    pub fn make_empty(&mut self) {
        debug_log!(nodes = self.arena.len(), "table emptied");
        self.arena.clear();
        self.root = None;
        self.live = 0;
    }

    /// Live entries in ascending key order.
    pub fn entries(&self) -> Entries<'_, K> {
        Entries::new(&self.arena, self.root, self.live)
    }

    /// Calls `visitor` with the key, occurrence count, lines and pages of
    /// every live entry, in ascending key order.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, u32, &[u32], &[u32]),
    {
        for entry in self.entries() {
            visitor(entry.key, entry.occurrence, entry.lines, entry.pages);
        }
    }

    pub fn not_found(&self) -> &K {
        &self.not_found
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Height of the tree, `-1` when empty.
    pub fn height(&self) -> i32 {
        height(&self.arena, self.root)
    }

    /// Arena index of the root node.
    pub fn root(&self) -> Option<u32> {
        self.root
    }

    pub fn node_at(&self, idx: u32) -> Option<&AvlNode<K>> {
        self.arena.get(idx as usize)
    }
}

impl<K: Debug> AvlTable<K> {
    /// Dumps the tree structure, tombstoned nodes included.
    pub fn print_tree(&self) -> String {
        print(&self.arena, self.root, "")
    }
}
