//! Implements reference-counted generic trees and interfaces to work with them.
//!
//! ------------------------
//!
//! # Overview
//! Driftwood implements a single hierarchical container: a tree whose nodes are addressed by
//! *paths* — sequences of keys — where any node may hold an optional value and any number of
//! keyed children. Unlike arena-allocated tree designs, which buy insertion/removal throughput
//! at the price of tying every node reference to the arena's lifetime, driftwood nodes are
//! individually reference-counted: a [`Node`] handle keeps its subtree alive on its own, stays
//! valid across arbitrary structural mutation of the rest of the tree, and can be detached,
//! re-attached or observed weakly without bookkeeping. That makes the crate a fit for building
//! nested namespaces, configuration trees and path-indexed caches, where handles are held long
//! term and structure changes underneath them.
//!
//! Ownership flows strictly downward: a parent's child mapping and any live [`Node`] handles
//! co-own a node, while the node refers back to its parent through a non-owning reference.
//! A child can therefore never keep its parent alive, and reference cycles cannot form —
//! [`Node::parent`] navigation still works for as long as the parent is owned by anyone.
//! [`WeakNode`] observes a node without owning it and reports liveness exactly: it stays valid
//! while *any* strong owner exists and goes dead with the last one.
//!
//! # Mappings
//! The collection holding a node's children is pluggable, chosen by a type parameter on
//! [`Tree`] and [`Node`] — see the [`mapping`] module. Two strategies ship with the crate:
//! - [`Sorted`] (the default) — children enumerate in ascending key order, backed by
//!   `BTreeMap`; traversal over an [`OrderedTree`] is fully deterministic.
//! - [`Hashed`] — children are stored in an `FxHashMap`; enumeration order is unspecified,
//!   lookup asks only for `K: Eq + Hash`. This is [`UnorderedTree`].
//!
//! All algorithms are written against the [`Mapping`] contract alone, so a custom collection
//! (for example an insertion-ordered one) only has to implement that trait and a
//! [`MappingFamily`] selector.
//!
//! # Traversal
//! A [`Cursor`] walks every node below the root — value-bearing or not — in pre-order, and
//! moves in both directions; [`Tree::nodes`] wraps one into a plain forward [`Iterator`].
//!
//! # Example
//! ```rust
//! use driftwood::OrderedTree;
//!
//! let mut tree = OrderedTree::<&str, String>::new();
//!
//! // Mutating access auto-vivifies: missing intermediate nodes are created value-less.
//! *tree.get_or_insert(&["usr", "bin"]).value_mut() = "binaries".to_owned();
//! *tree.get_or_insert(&["usr", "lib"]).value_mut() = "libraries".to_owned();
//!
//! // Read-only access never creates.
//! assert!(tree.find(&["usr", "sbin"]).is_none());
//!
//! // Handles are attached to nodes, not to positions: they survive restructuring.
//! let bin = tree.find(&["usr", "bin"]).unwrap();
//! bin.detach();
//! assert!(!tree.contains(&["usr", "bin"]));
//! assert_eq!(bin.value_or(String::new()), "binaries");
//! ```
//!
//! # Absence, not errors
//! The API has no error type: a missing node is a `None` handle, a missing value is a `None`
//! (or a caller-supplied default), removing an absent child reports `false`. The one
//! precondition — rooting a tree at a node which still has a parent — is a programmer error
//! and panics; see [`Tree::from_root`].
//!
//! # Concurrency
//! None. Nodes are `Rc`-owned and `RefCell`-guarded, so trees are single-threaded by
//! construction; wrap a whole [`Tree`] in external synchronization if it has to cross threads.
//!
//! # Public dependencies
//! - `rustc-hash` (**required**) — `^2`, supplies the hasher behind [`Hashed`]
//!
//! [`Mapping`]: mapping::Mapping " "
//! [`MappingFamily`]: mapping::MappingFamily " "

#![warn(
    rust_2018_idioms,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::cast_lossless,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::fn_params_excessive_bools,
    clippy::implicit_hasher,
    clippy::items_after_statements,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::mut_mut,
    clippy::needless_continue,
    clippy::option_option,
    clippy::redundant_closure_for_method_calls,
    clippy::single_match_else,
    clippy::trivially_copy_pass_by_ref,
    clippy::unnested_or_patterns,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::get_unwrap,
    clippy::unwrap_used, // Only .expect() allowed
    clippy::use_debug,
)]
#![deny(anonymous_parameters, bare_trait_objects, clippy::exit)]

pub mod mapping;
#[doc(no_inline)]
pub use mapping::{Hashed, Mapping, MappingFamily, Sorted};

pub mod node;
#[doc(no_inline)]
pub use node::{Node, WeakNode};

pub mod cursor;
#[doc(no_inline)]
pub use cursor::{Cursor, Nodes};

mod tree;
pub use tree::{OrderedTree, Tree, UnorderedTree};

/// A prelude for using Driftwood, containing the most used types in a renamed form for safe
/// glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        cursor::Cursor as TreeCursor,
        node::{Node as TreeNode, WeakNode as WeakTreeNode},
        tree::{OrderedTree, Tree, UnorderedTree},
    };
}
