//! Authored zone descriptors: the read-only snapshot synthesis consumes.
//!
//! Descriptors are declarative; how they were persisted or edited is out of
//! scope. Declaration order is significant: it drives name disambiguation,
//! exclusivity-pair enumeration and tournament pair indexing.

use serde::{Deserialize, Serialize};

use rigzone_api_core::{Clip, NodePath};

/// How long past the minimum a degenerate depth range extends by default.
pub const DEFAULT_DEPTH_SPAN: f32 = 0.25;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Hole,
    Ring,
}

/// Where a zone sits on the rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Resolve a named bone through the skeleton index.
    Bone(String),
    /// Explicit node path, already resolved by the author.
    Node(NodePath),
}

/// A depth-driven animation declared on a zone. `min_depth`/`max_depth`
/// are normalized fractions of the zone's sensed axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthAction {
    pub clip: Clip,
    pub min_depth: f32,
    pub max_depth: f32,
    /// Allow the avatar's own emitters to trigger this action.
    #[serde(default)]
    pub allow_self: bool,
}

impl DepthAction {
    /// Effective `(min, max)` range after applying the degenerate-range
    /// default, or None when the action must be dropped.
    ///
    /// A `max_depth` at or below `min_depth` defaults to
    /// `min_depth + 0.25`; if the result still is not strictly greater, or
    /// it exceeds the zone's sensed-axis domain, the action is dropped.
    pub fn effective_range(&self, depth_limit: f32) -> Option<(f32, f32)> {
        let min = self.min_depth;
        let mut max = self.max_depth;
        if max <= min {
            max = min + DEFAULT_DEPTH_SPAN;
        }
        if !(max > min) {
            return None;
        }
        if max > depth_limit {
            return None;
        }
        Some((min, max))
    }
}

/// A proximity-triggered region of interest on the rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub kind: ZoneKind,
    pub placement: Placement,
    /// Expose a user-facing toggle and participate in the mode layers.
    pub add_menu_item: bool,
    /// Participate in auto arbitration (requires a menu item).
    pub enable_auto: bool,
    pub depth_actions: Vec<DepthAction>,
    /// Upper bound of the sensed-axis domain for depth ranges.
    #[serde(default = "default_depth_limit")]
    pub depth_limit: f32,
}

fn default_depth_limit() -> f32 {
    1.0
}

impl Zone {
    pub fn new(name: impl Into<String>, kind: ZoneKind, placement: Placement) -> Self {
        Self {
            name: name.into(),
            kind,
            placement,
            add_menu_item: false,
            enable_auto: false,
            depth_actions: Vec::new(),
            depth_limit: default_depth_limit(),
        }
    }

    /// Auto-eligible zones are the ones the arbitration tournament ranks.
    pub fn auto_eligible(&self) -> bool {
        self.add_menu_item && self.enable_auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(min: f32, max: f32) -> DepthAction {
        DepthAction {
            clip: Clip::new("a"),
            min_depth: min,
            max_depth: max,
            allow_self: false,
        }
    }

    #[test]
    fn inverted_range_defaults_past_min() {
        assert_eq!(action(0.5, 0.3).effective_range(1.0), Some((0.5, 0.75)));
    }

    #[test]
    fn equal_range_defaults_past_min() {
        assert_eq!(action(0.5, 0.5).effective_range(1.0), Some((0.5, 0.75)));
    }

    #[test]
    fn defaulted_range_beyond_axis_domain_is_dropped() {
        // 0.8 defaults to 1.05, which only survives when the axis allows
        // readings past 1.
        assert_eq!(action(0.8, 0.8).effective_range(1.0), None);
        assert_eq!(action(0.8, 0.8).effective_range(1.1), Some((0.8, 1.05)));
    }

    #[test]
    fn well_formed_range_passes_through() {
        assert_eq!(action(0.1, 0.9).effective_range(1.0), Some((0.1, 0.9)));
    }

    #[test]
    fn non_finite_min_is_dropped() {
        assert_eq!(action(f32::INFINITY, 0.0).effective_range(1.0), None);
    }
}
