//! Turn flat adjacency-list records into nested navigation menu trees.
//!
//! Records carry an `id`, a `parent_id` and display attributes. Two
//! strategies assemble them:
//!
//! - [`domain::Materializer`]: forward scan over records whose children
//!   follow their parent (e.g. sorted by `parent_id`).
//! - [`domain::TreeBuilder`]: `parent_id` index plus explicit stack, any
//!   input order.
//!
//! Access checks and translations are injected through
//! [`domain::AccessCheck`] and [`domain::Translate`].
//!
//! ```
//! use std::convert::Infallible;
//! use menutree::domain::{AllowAll, FlatRecord, Identity, Materializer, MenuMode};
//!
//! let records = vec![
//!     FlatRecord::new(1, 0, "Home").with_route("home"),
//!     FlatRecord::new(2, 1, "Profile").with_route("profile"),
//!     FlatRecord::new(3, 0, "About").with_route("about"),
//! ];
//! let scan: Materializer<Infallible> = Materializer::new(MenuMode::Native, &AllowAll, &Identity);
//! let menu = scan.materialize_tree(&records, &0).unwrap();
//! assert_eq!(menu.len(), 2);
//! assert_eq!(menu[0].children[0].label, "Profile");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    materialize, FlatRecord, Link, Materializer, MenuMode, TreeBuilder, TreeNode,
};
