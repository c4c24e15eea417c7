//! Precomputed skeleton index.
//!
//! Replaces runtime scene introspection with an explicit map built once
//! from `(path, name, parent)` rows and passed by reference into the zone
//! baker. Membership checks use bounded iterative ascent over the path,
//! never recursion; resolution of a name to more than one surviving
//! candidate is an error, not a guess.

use hashbrown::{HashMap, HashSet};

use rigzone_api_core::NodePath;

use crate::error::SynthError;

/// One skeleton node as reported by the external rig description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoneRow {
    pub path: NodePath,
    pub name: String,
    /// Name of the parent node, when the parent is not the rig root.
    pub parent: Option<String>,
}

/// Subtree membership query used by clip emptiness checks.
pub trait NodeScope {
    fn contains(&self, path: &NodePath) -> bool;
}

#[derive(Debug, Default)]
pub struct SkeletonIndex {
    by_name: HashMap<String, Vec<usize>>,
    paths: HashSet<NodePath>,
    rows: Vec<BoneRow>,
}

impl SkeletonIndex {
    pub fn from_rows(rows: Vec<BoneRow>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut paths = HashSet::new();
        for (idx, row) in rows.iter().enumerate() {
            by_name.entry(row.name.clone()).or_default().push(idx);
            paths.insert(row.path.clone());
        }
        Self {
            by_name,
            paths,
            rows,
        }
    }

    /// True when every ancestor of `path` up to the rig root is itself a
    /// known skeleton node. Iterative ascent, bounded by path depth.
    fn in_skeleton(&self, path: &NodePath) -> bool {
        let mut cursor = path.clone();
        for _ in 0..path.segments().len() + 1 {
            if cursor.is_root() {
                return true;
            }
            if !self.paths.contains(&cursor) {
                return false;
            }
            match cursor.parent() {
                Some(parent) => cursor = parent,
                None => return true,
            }
        }
        false
    }

    /// Resolve a node name to its unique skeleton path.
    ///
    /// Returns Ok(None) when no plausible candidate exists (callers decide
    /// whether that aborts their bake) and an error when the name is
    /// ambiguous.
    pub fn resolve(&self, name: &str) -> Result<Option<NodePath>, SynthError> {
        let candidates: Vec<&BoneRow> = self
            .by_name
            .get(name)
            .map(|idxs| idxs.iter().map(|&i| &self.rows[i]).collect())
            .unwrap_or_default();
        let surviving: Vec<&BoneRow> = candidates
            .into_iter()
            .filter(|row| self.row_consistent(row) && self.in_skeleton(&row.path))
            .collect();
        match surviving.len() {
            0 => Ok(None),
            1 => Ok(Some(surviving[0].path.clone())),
            n => Err(SynthError::AmbiguousNodeResolution {
                name: name.to_string(),
                candidates: n,
            }),
        }
    }

    /// A row is consistent when its declared parent name matches the
    /// parent segment of its path (rows directly under the root carry no
    /// parent name).
    fn row_consistent(&self, row: &BoneRow) -> bool {
        let parent_path = match row.path.parent() {
            Some(p) => p,
            None => return false,
        };
        match (&row.parent, parent_path.name()) {
            (None, None) => true,
            (Some(declared), Some(actual)) => declared == actual,
            _ => false,
        }
    }
}

impl NodeScope for SkeletonIndex {
    fn contains(&self, path: &NodePath) -> bool {
        self.paths.contains(path)
    }
}
