//! Link classification for menu nodes.

use regex::{Regex, RegexBuilder};

use crate::domain::entities::Link;

/// Decides whether a raw `url`/`route` value is used verbatim or wrapped as
/// an internal route.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    absolute_pattern: Regex,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkResolver {
    pub fn new() -> Self {
        Self {
            absolute_pattern: RegexBuilder::new(r"^(/|https?://)")
                .case_insensitive(true)
                .build()
                .expect("absolute link pattern compiles"),
        }
    }

    /// Missing values, `""` and `"0"` yield no link at all.
    pub fn resolve(&self, raw: Option<&str>) -> Option<Link> {
        let raw = raw.filter(|s| !s.is_empty() && *s != "0")?;
        if self.absolute_pattern.is_match(raw) {
            Some(Link::Url(raw.to_string()))
        } else {
            Some(Link::Route(format!("/{}", raw)))
        }
    }
}
