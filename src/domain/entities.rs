//! Domain entities: flat records in, menu nodes out

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier usable as record id and parent id.
///
/// `Default` is the root scope: a record without `parent_id` hangs off it
/// (`0` for integers, `""` for strings).
pub trait RecordId: Ord + Clone + Default + fmt::Debug + fmt::Display {}

impl<T: Ord + Clone + Default + fmt::Debug + fmt::Display> RecordId for T {}

/// One adjacency-list row as delivered by the data layer.
///
/// Only `id`, `parent_id` and `name` carry meaning for the hierarchy; every
/// other attribute is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "I: Serialize",
    deserialize = "I: Deserialize<'de> + Default"
))]
pub struct FlatRecord<I = i64> {
    pub id: I,
    /// Missing or `null` means the root scope
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_id: I,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Takes precedence over `url` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Access-control key; when present the node gets a `visible` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rbac_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Overrides `class` in extended mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_category: Option<String>,
    /// Sibling order key, only consulted by [`sort_records`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl<I> FlatRecord<I> {
    pub fn new(id: I, parent_id: I, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            url: None,
            route: None,
            rbac_check: None,
            icon: None,
            class: None,
            css_class: None,
            translation_category: None,
            sort_order: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_rbac_check(mut self, key: impl Into<String>) -> Self {
        self.rbac_check = Some(key.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }

    pub fn with_translation_category(mut self, category: impl Into<String>) -> Self {
        self.translation_category = Some(category.into());
        self
    }

    pub fn with_sort_order(mut self, order: i64) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Raw link target: `route` if set, otherwise `url`.
    pub fn raw_link(&self) -> Option<&str> {
        self.route.as_deref().or(self.url.as_deref())
    }
}

/// Order records the way the materializer expects them:
/// `parent_id` ascending, then `sort_order` ascending.
///
/// Records without a sort key follow those with one. The sort is stable, so
/// ties keep their input order.
pub fn sort_records<I: RecordId>(records: &mut [FlatRecord<I>]) {
    records.sort_by(|a, b| {
        a.parent_id
            .cmp(&b.parent_id)
            .then_with(|| compare_sort_order(a.sort_order, b.sort_order))
    });
}

fn compare_sort_order(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Resolved link target of a menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Absolute path or `http(s)://` URL, used verbatim
    Url(String),
    /// Internal route, already prefixed with `/`
    Route(String),
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Url(url) => write!(f, "{}", url),
            Link::Route(route) => write!(f, "[{}]", route),
        }
    }
}

/// Urls serialize as plain strings, routes as the one-element route array
/// menu widgets understand (`["/about"]`).
impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Link::Url(url) => serializer.serialize_str(url),
            Link::Route(route) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(route)?;
                seq.end()
            }
        }
    }
}

/// A node of the materialized menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub label: String,
    #[serde(rename = "url", skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(rename = "items")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: None,
            visible: None,
            icon: None,
            class: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}

/// Children are released with an explicit stack so arbitrarily deep trees
/// drop without exhausting the call stack.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Output shape of the materializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuMode {
    /// label, url, visible and items only
    #[default]
    Native,
    /// additionally translates labels and carries icon/class
    Extended,
}

impl MenuMode {
    pub fn is_extended(self) -> bool {
        self == MenuMode::Extended
    }
}

impl fmt::Display for MenuMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuMode::Native => write!(f, "native"),
            MenuMode::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for MenuMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(MenuMode::Native),
            "extended" => Ok(MenuMode::Extended),
            other => Err(format!("unknown menu mode: {other} (expected native|extended)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_record_without_parent_when_deserializing_then_parent_is_root() {
        let record: FlatRecord = serde_json::from_str(r#"{"id": 4, "name": "Top"}"#).unwrap();
        assert_eq!(record.parent_id, 0);

        let record: FlatRecord =
            serde_json::from_str(r#"{"id": 4, "parent_id": null, "name": "Top"}"#).unwrap();
        assert_eq!(record.parent_id, 0);
    }

    #[test]
    fn given_string_ids_when_deserializing_then_missing_parent_is_empty() {
        let record: FlatRecord<String> =
            serde_json::from_str(r#"{"id": "about", "name": "About"}"#).unwrap();
        assert_eq!(record.parent_id, "");
    }

    #[test]
    fn given_route_and_url_when_reading_raw_link_then_route_wins() {
        let record = FlatRecord::new(1, 0, "Home")
            .with_url("/index.php")
            .with_route("site/index");
        assert_eq!(record.raw_link(), Some("site/index"));

        let record = FlatRecord::new(1, 0, "Home").with_url("/index.php");
        assert_eq!(record.raw_link(), Some("/index.php"));
    }

    #[test]
    fn given_links_when_serializing_then_route_is_array() {
        let url = serde_json::to_value(Link::Url("http://example.com/x".into())).unwrap();
        let route = serde_json::to_value(Link::Route("/about".into())).unwrap();
        assert_eq!(url, serde_json::json!("http://example.com/x"));
        assert_eq!(route, serde_json::json!(["/about"]));
    }

    #[test]
    fn given_bare_node_when_serializing_then_only_label_and_items() {
        let value = serde_json::to_value(TreeNode::new("Home")).unwrap();
        assert_eq!(value, serde_json::json!({"label": "Home", "items": []}));
    }

    #[test]
    fn given_unsorted_records_when_sorting_then_parent_then_sort_key() {
        let mut records = vec![
            FlatRecord::new(5, 1, "b").with_sort_order(2),
            FlatRecord::new(4, 1, "a").with_sort_order(1),
            FlatRecord::new(6, 1, "unkeyed"),
            FlatRecord::new(1, 0, "root"),
        ];
        sort_records(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "b", "unkeyed"]);
    }

    #[test]
    fn given_mode_strings_when_parsing_then_case_insensitive() {
        assert_eq!("Extended".parse::<MenuMode>().unwrap(), MenuMode::Extended);
        assert_eq!("native".parse::<MenuMode>().unwrap(), MenuMode::Native);
        assert!("fancy".parse::<MenuMode>().is_err());
    }
}
