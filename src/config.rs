//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/menutree/menutree.toml`
//! 3. Local config: `<dir>/.menutree.toml` (usually the working directory)
//! 4. Environment variables: `MENUTREE_*` prefix

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::Strategy;
use crate::application::ApplicationError;
use crate::domain::MenuMode;

/// Menus nested deeper than this are rejected unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Translation table: `category -> source text -> translation`.
pub type Translations = BTreeMap<String, BTreeMap<String, String>>;

/// Raw settings for intermediate parsing.
///
/// Every field is optional to distinguish "not specified" from an explicit value:
/// - `None` → inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_id: Option<i64>,
    pub mode: Option<MenuMode>,
    pub strategy: Option<Strategy>,
    pub sort: Option<bool>,
    pub strict: Option<bool>,
    pub max_depth: Option<usize>,
    pub input: Option<PathBuf>,
    pub granted: Option<Vec<String>>,
    pub translations: Option<Translations>,
}

/// Unified configuration for menutree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Parent id of top-level records (default: 0)
    pub root_id: i64,
    /// Output shape (default: native)
    pub mode: MenuMode,
    /// Tree assembly algorithm (default: indexed)
    pub strategy: Strategy,
    /// Sort records by parent_id, sort_order before building
    pub sort: bool,
    /// Validate records and fail on malformed input
    pub strict: bool,
    /// Deepest menu accepted for building (default: 1000)
    pub max_depth: usize,
    /// Records file used when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Access-control keys granted to the current user
    pub granted: Vec<String>,
    /// Label translations used in extended mode
    pub translations: Translations,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_id: 0,
            mode: MenuMode::Native,
            strategy: Strategy::Indexed,
            sort: false,
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
            input: None,
            granted: vec![],
            translations: Translations::new(),
        }
    }
}

/// Get the XDG config directory for menutree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "menutree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("menutree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".menutree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Unresolvable variables leave the input untouched.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Merge translation tables; overlay entries win per text.
    pub fn merge_translations(base: &Translations, overlay: &Translations) -> Translations {
        let mut merged = base.clone();
        for (category, texts) in overlay {
            let entry = merged.entry(category.clone()).or_default();
            for (text, translation) in texts {
                entry.insert(text.clone(), translation.clone());
            }
        }
        merged
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(input) = &self.input {
            let expanded = expand_path(input.to_string_lossy().as_ref());
            self.input = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base) with union semantics.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `granted`: union merge with negation support
    /// - `translations`: merged per category, overlay wins per text
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            granted: overlay
                .granted
                .as_ref()
                .map(|o| Self::merge_array(&self.granted, o))
                .unwrap_or_else(|| self.granted.clone()),
            translations: overlay
                .translations
                .as_ref()
                .map(|o| Self::merge_translations(&self.translations, o))
                .unwrap_or_else(|| self.translations.clone()),
            ..self.apply_scalars(overlay)
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for collections.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// `granted` and `translations` entirely if the global config specifies them.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            granted: global
                .granted
                .clone()
                .unwrap_or_else(|| self.granted.clone()),
            translations: global
                .translations
                .clone()
                .unwrap_or_else(|| self.translations.clone()),
            ..self.apply_scalars(global)
        }
    }

    fn apply_scalars(&self, overlay: &RawSettings) -> Self {
        Self {
            root_id: overlay.root_id.unwrap_or(self.root_id),
            mode: overlay.mode.unwrap_or(self.mode),
            strategy: overlay.strategy.unwrap_or(self.strategy),
            sort: overlay.sort.unwrap_or(self.sort),
            strict: overlay.strict.unwrap_or(self.strict),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            input: overlay.input.clone().or_else(|| self.input.clone()),
            granted: self.granted.clone(),
            translations: self.translations.clone(),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.menutree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/menutree/menutree.toml` (collections REPLACE defaults)
    /// 3. Local config: `<local_dir>/.menutree.toml` (collections UNION with global)
    /// 4. Environment variables: `MENUTREE_*` prefix (REPLACES - explicit override)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply MENUTREE_* environment variables as explicit overrides.
    ///
    /// `MENUTREE_GRANTED` takes a comma-separated list.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("MENUTREE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("granted")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_int("root_id") {
            settings.root_id = val;
        }
        if let Ok(val) = config.get_string("mode") {
            settings.mode = val.parse().map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("strategy") {
            settings.strategy = val.parse().map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_bool("sort") {
            settings.sort = val;
        }
        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }
        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("max_depth must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("input") {
            settings.input = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<Vec<String>>("granted") {
            settings.granted = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# menutree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/menutree/menutree.toml  (defines your baseline)
#   Local:  ./.menutree.toml                  (project-specific additions)
#   Env:    MENUTREE_* environment variables   (explicit overrides)
#
# Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS `granted` with global; use "!key" to REMOVE an inherited grant.
#   Local translations are merged per category, local entries win.

# Parent id of top-level records
# root_id = 0

# Output shape: "native" (label/url/visible/items) or "extended" (+ icon/class, translated labels)
# mode = "native"

# Tree assembly: "indexed" (any input order) or "scan" (children must follow their parent)
# strategy = "indexed"

# Sort records by parent_id, sort_order before building
# sort = false

# Reject duplicate ids, unsorted parents and orphan references
# strict = false

# Deepest menu accepted; deeper input is rejected before building
# max_depth = 1000

# Records file used when none is passed on the command line
# input = "~/menus/main.json"

# Access-control keys granted to the current user
# granted = ["admin.access"]

# Translations applied in extended mode to records with a translation_category
# [translations.app]
# Home = "Startseite"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
