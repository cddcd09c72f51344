//! Arena-based AVL table with per-key occurrence bookkeeping.
//!
//! [`AvlTable`] is an ordered set of keys kept in a height-balanced binary
//! search tree. Every key carries an occurrence count plus the lines and pages
//! it was recorded on, which makes the table a fit for word-frequency and
//! spell-check style indexes: feed tokens in with [`AvlTable::record`], strike
//! known words with [`AvlTable::remove`], and walk what is left in sorted
//! order with [`AvlTable::traverse`] or [`AvlTable::entries`].
//!
//! Nodes live in a `Vec` arena and children are `Option<u32>` indices into it,
//! so the whole tree is released (or deep-copied) in one go with the `Vec`.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] / [`KeyNode`] link traits |
//! [`avl::types`] | [`AvlNode`], [`Occurrences`], [`AvlNodeLike`] |
//! [`avl::util`] | Rotations, recursive insert, search, validation, printing |
//! [`avl::table`] | [`AvlTable`] |
//! [`avl::iter`] | [`Entries`] in-order iterator |
//! [`config`] | [`TableConfig`] |
//! [`error`] | [`TableError`] |

mod tracing_helpers;

pub mod avl;
pub mod config;
pub mod error;
pub mod types;

pub use avl::{AvlNode, AvlNodeLike, AvlTable, Entries, Entry, Occurrences};
pub use config::{TableConfig, DEFAULT_LINES_PER_PAGE};
pub use error::TableError;
pub use types::{KeyNode, Node};
