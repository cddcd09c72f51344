//! AVL table: balancing engine, node types and the public table.

pub mod iter;
pub mod table;
pub mod types;
pub mod util;

pub use iter::{Entries, Entry};
pub use table::AvlTable;
pub use types::{AvlNode, AvlNodeLike, Occurrences};
pub use util::{assert_avl_tree, find, height, insert, print, update_height, Placement};
