//! Menu service
//!
//! Loads flat records from a JSON file and materializes them into menu trees
//! using the configured strategy, access grants and translations.

use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{
    render_forest, ApplicationError, ApplicationResult, IoResultExt, JsonResultExt,
};
use crate::config::Settings;
use crate::domain::{
    sort_records, validate, Catalog, DomainError, FlatRecord, Materializer, MenuMode, RecordIndex,
    RoleSet, TreeBuilder, TreeNode,
};
use crate::infrastructure::traits::FileSystem;

/// Which algorithm assembles the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Forward scan; children must follow their parent
    Scan,
    /// `parent_id` index; any order
    #[default]
    Indexed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Scan => write!(f, "scan"),
            Strategy::Indexed => write!(f, "indexed"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scan" => Ok(Strategy::Scan),
            "indexed" => Ok(Strategy::Indexed),
            other => Err(format!("unknown strategy: {other} (expected scan|indexed)")),
        }
    }
}

/// Per-build knobs; defaults come from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOptions {
    pub root_id: i64,
    pub mode: MenuMode,
    pub strategy: Strategy,
    /// Sort by `parent_id`, `sort_order` before building
    pub sort: bool,
    /// Reject malformed input instead of building a partial tree
    pub strict: bool,
    /// Deepest menu accepted; assembly and rendering recurse per level
    pub max_depth: usize,
}

impl MenuOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            root_id: settings.root_id,
            mode: settings.mode,
            strategy: settings.strategy,
            sort: settings.sort,
            strict: settings.strict,
            max_depth: settings.max_depth,
        }
    }
}

/// Result of a build.
#[derive(Debug, Clone)]
pub struct MenuOutput {
    /// Top-level menu nodes
    pub nodes: Vec<TreeNode>,
    /// Number of input records
    pub record_count: usize,
    /// Number of records placed in the tree
    pub node_count: usize,
}

/// Service for turning record files into menu trees.
pub struct MenuService {
    fs: Arc<dyn FileSystem>,
    roles: RoleSet,
    catalog: Catalog,
}

impl MenuService {
    /// Create a menu service with grants and translations from `settings`.
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self {
            fs,
            roles: RoleSet::new(settings.granted.iter().cloned()),
            catalog: Catalog::new(settings.translations.clone()),
        }
    }

    /// Read a JSON array of records; a missing path or a directory is
    /// reported as input not found.
    #[instrument(level = "debug", skip(self))]
    pub fn load_records(&self, path: &Path) -> ApplicationResult<Vec<FlatRecord>> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;
        let records: Vec<FlatRecord> = serde_json::from_str(&content).with_parse_context(path)?;
        debug!("load_records: {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Check records against the forward-scan preconditions.
    pub fn validate(&self, records: &[FlatRecord], root_id: i64) -> ApplicationResult<()> {
        validate(records, &root_id)?;
        Ok(())
    }

    /// Materialize `records` into a menu tree.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(
        &self,
        mut records: Vec<FlatRecord>,
        options: &MenuOptions,
    ) -> ApplicationResult<MenuOutput> {
        if options.sort {
            sort_records(&mut records);
        }
        if options.strict {
            self.validate(&records, options.root_id)?;
        }

        let depth = RecordIndex::new(&records).depth_below(&records, &options.root_id);
        if depth > options.max_depth {
            return Err(DomainError::TooDeep {
                depth,
                max_depth: options.max_depth,
            }
            .into());
        }

        let result: Result<Vec<TreeNode>, Infallible> = match options.strategy {
            Strategy::Scan => Materializer::new(options.mode, &self.roles, &self.catalog)
                .materialize_tree(&records, &options.root_id),
            Strategy::Indexed => TreeBuilder::new(options.mode, &self.roles, &self.catalog)
                .build(&records, &options.root_id),
        };
        let nodes = match result {
            Ok(nodes) => nodes,
            Err(never) => match never {},
        };

        let node_count = nodes.iter().map(TreeNode::count).sum();
        info!(
            strategy = %options.strategy,
            mode = %options.mode,
            "built menu: {} of {} records placed",
            node_count,
            records.len()
        );
        Ok(MenuOutput {
            nodes,
            record_count: records.len(),
            node_count,
        })
    }

    /// Render nodes as the JSON `items` array of a menu widget.
    pub fn render_json(&self, nodes: &[TreeNode]) -> ApplicationResult<String> {
        serde_json::to_string_pretty(nodes).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize menu".to_string(),
            source: Box::new(e),
        })
    }

    /// Render nodes as an indented text tree.
    pub fn render_tree(&self, title: &str, nodes: &[TreeNode]) -> String {
        render_forest(title, nodes)
    }
}
