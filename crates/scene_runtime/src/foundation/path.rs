//! Scene paths
//!
//! A path is an ordered sequence of name segments locating an element from a
//! scene's root. Segment 0 is always the distinguished root name, so a path
//! of length 1 addresses the root itself, while a path with no segments
//! addresses nothing and never resolves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the distinguished root segment.
pub const ROOT_NAME: &str = "/";

/// Ordered sequence of name segments addressing an element from a scene's
/// root.
///
/// Paths are plain values: cheap to clone, comparable, hashable, and usable
/// as map keys. They carry no reference to any scene; resolution happens
/// through [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenePath {
    segments: Vec<String>,
}

impl ScenePath {
    /// The path denoting no location. Never resolves.
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// The path of a scene's root.
    pub fn root() -> Self {
        Self {
            segments: vec![ROOT_NAME.to_string()],
        }
    }

    /// Parse a path string.
    ///
    /// `"/a/b"` and `"a/b"` both address from the root; `"/"` is the root
    /// itself and `""` is the empty path.
    pub fn new(path: &str) -> Self {
        if path.is_empty() {
            return Self::empty();
        }
        let mut segments = vec![ROOT_NAME.to_string()];
        segments.extend(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
        );
        Self { segments }
    }

    /// Number of segments, counting the root segment.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the no-location path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// The trailing segment, or the empty string for the empty path.
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Drop the trailing segment.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Append a segment.
    pub fn push(&mut self, name: &str) {
        self.segments.push(name.to_string());
    }

    /// New path with `name` appended.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.push(name);
        path
    }

    /// The parent path. The root's parent is the empty path.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut path = self.clone();
        path.pop();
        path
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return Ok(());
        }
        if self.segments.len() == 1 {
            return f.write_str(ROOT_NAME);
        }
        for segment in &self.segments[1..] {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_absolute_and_relative() {
        let absolute = ScenePath::new("/a/b");
        let relative = ScenePath::new("a/b");
        assert_eq!(absolute, relative);
        assert_eq!(absolute.len(), 3);
        assert_eq!(absolute.get(0), Some(ROOT_NAME));
        assert_eq!(absolute.get(1), Some("a"));
        assert_eq!(absolute.get(2), Some("b"));
        assert_eq!(absolute.get(3), None);
    }

    #[test]
    fn root_and_empty_forms() {
        assert_eq!(ScenePath::new("/"), ScenePath::root());
        assert_eq!(ScenePath::new(""), ScenePath::empty());
        assert!(ScenePath::empty().is_empty());
        assert_eq!(ScenePath::root().len(), 1);
    }

    #[test]
    fn name_pop_child_parent() {
        let mut path = ScenePath::new("/a/b");
        assert_eq!(path.name(), "b");
        path.pop();
        assert_eq!(path, ScenePath::new("/a"));
        assert_eq!(path.child("c"), ScenePath::new("/a/c"));
        assert_eq!(ScenePath::new("/a").parent(), ScenePath::root());
        assert_eq!(ScenePath::root().parent(), ScenePath::empty());
        assert_eq!(ScenePath::empty().name(), "");
    }

    #[test]
    fn display_round_trip() {
        assert_eq!(ScenePath::new("/a/b").to_string(), "/a/b");
        assert_eq!(ScenePath::root().to_string(), "/");
        assert_eq!(ScenePath::empty().to_string(), "");
    }
}
