//! Domain layer: records, menu nodes and the tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod collaborators;
pub mod entities;
pub mod error;
pub mod link;
pub mod materializer;
pub mod node;
pub mod validate;

pub use arena::{ArenaNode, TreeArena};
pub use builder::{RecordIndex, TreeBuilder};
pub use collaborators::{AccessCheck, AllowAll, Catalog, Identity, RoleSet, Translate};
pub use entities::{sort_records, FlatRecord, Link, MenuMode, RecordId, TreeNode};
pub use error::DomainError;
pub use link::LinkResolver;
pub use materializer::{materialize, Materializer};
pub use node::NodeFactory;
pub use validate::validate;
