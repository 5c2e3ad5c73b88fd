//! Seams to the host application: access control and translation.
//!
//! Both traits are generic over the host's error type `E`. Errors returned by
//! an implementation travel through the materializer to its caller unchanged.
//! Plain closures implement the traits, so a host can pass
//! `&|key: &str| -> Result<bool, MyError> { ... }` directly.

use std::collections::{BTreeMap, BTreeSet};

/// Authorization check keyed by an arbitrary string (e.g. `"admin.access"`).
pub trait AccessCheck<E> {
    fn can(&self, key: &str) -> Result<bool, E>;
}

impl<E, F> AccessCheck<E> for F
where
    F: Fn(&str) -> Result<bool, E>,
{
    fn can(&self, key: &str) -> Result<bool, E> {
        self(key)
    }
}

/// Localization lookup for a `(category, text)` pair.
pub trait Translate<E> {
    fn translate(&self, category: &str, text: &str) -> Result<String, E>;
}

impl<E, F> Translate<E> for F
where
    F: Fn(&str, &str) -> Result<String, E>,
{
    fn translate(&self, category: &str, text: &str) -> Result<String, E> {
        self(category, text)
    }
}

/// Grants every key.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<E> AccessCheck<E> for AllowAll {
    fn can(&self, _key: &str) -> Result<bool, E> {
        Ok(true)
    }
}

/// Grants exactly the keys it was built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    granted: BTreeSet<String>,
}

impl RoleSet {
    pub fn new<S: Into<String>>(granted: impl IntoIterator<Item = S>) -> Self {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.granted.contains(key)
    }
}

impl<E> AccessCheck<E> for RoleSet {
    fn can(&self, key: &str) -> Result<bool, E> {
        Ok(self.contains(key))
    }
}

/// Returns the text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<E> Translate<E> for Identity {
    fn translate(&self, _category: &str, text: &str) -> Result<String, E> {
        Ok(text.to_string())
    }
}

/// In-memory message catalog: `category -> source text -> translation`.
///
/// Unknown categories or texts fall back to the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl Catalog {
    pub fn new(messages: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { messages }
    }

    pub fn insert(
        &mut self,
        category: impl Into<String>,
        text: impl Into<String>,
        translation: impl Into<String>,
    ) {
        self.messages
            .entry(category.into())
            .or_default()
            .insert(text.into(), translation.into());
    }

    pub fn lookup(&self, category: &str, text: &str) -> Option<&str> {
        self.messages
            .get(category)
            .and_then(|texts| texts.get(text))
            .map(String::as_str)
    }
}

impl<E> Translate<E> for Catalog {
    fn translate(&self, category: &str, text: &str) -> Result<String, E> {
        Ok(self.lookup(category, text).unwrap_or(text).to_string())
    }
}
