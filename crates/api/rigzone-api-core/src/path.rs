//! NodePath parsing and formatting.
//!
//! Grammar (simple, engine-agnostic):
//!   segment/segment/.../segment
//! - '/' separates node segments from the rig root downward
//! - the empty path (no segments) denotes the rig root itself
//!
//! NodePath is intentionally simple and string-based; the placement service
//! resolves it into engine-specific scene handles outside this core.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid node path: empty segment")]
    EmptySegment,
    #[error("invalid node path: segment contains whitespace")]
    Whitespace,
}

/// Slash-delimited path to a node on the rig, relative to the rig root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// The rig root (empty path).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path string according to the grammar above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for seg in s.split('/') {
            if seg.is_empty() {
                return Err(PathError::EmptySegment);
            }
            if seg.chars().any(char::is_whitespace) {
                return Err(PathError::Whitespace);
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, or None for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path with the last segment removed, or None for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one segment, returning the child path.
    pub fn child(&self, name: &str) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// True when `self` equals `other` or lies somewhere below it.
    pub fn is_within(&self, other: &NodePath) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for NodePath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        let p = NodePath::parse("Armature/Hips/Spine").unwrap();
        assert_eq!(p.segments().len(), 3);
        assert_eq!(p.to_string(), "Armature/Hips/Spine");
        assert_eq!(p.name(), Some("Spine"));
        assert_eq!(p.parent().unwrap().to_string(), "Armature/Hips");
    }

    #[test]
    fn rejects_malformed_segments() {
        assert!(NodePath::parse("a//b").is_err());
        assert!(NodePath::parse("a/b c").is_err());
        assert!(NodePath::parse("").unwrap().is_root());
    }

    #[test]
    fn containment() {
        let root = NodePath::parse("Armature").unwrap();
        let deep = root.child("Hips").child("Spine");
        assert!(deep.is_within(&root));
        assert!(deep.is_within(&NodePath::root()));
        assert!(!root.is_within(&deep));
    }
}
