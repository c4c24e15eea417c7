//! Keyframed clip model.
//!
//! A clip is an ordered set of curves, each addressed by a `CurveBinding`
//! (node path + animated property). Float curves hold `(time, value)`
//! keyframes; object curves hold `(time, asset-reference)` keyframes.
//! Curve order is insertion order and is part of the build artifact, so
//! identical synthesis passes produce identical clips.

use serde::{Deserialize, Serialize};

use crate::path::NodePath;

/// Property animated on every node to toggle it on or off.
pub const ACTIVE_PROP: &str = "active";

/// Reserved first path segment marking pass-through ("proxy") bindings.
pub const PROXY_SEGMENT: &str = "proxy";

/// Address of one animated curve: which node, which property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveBinding {
    pub path: NodePath,
    pub property: String,
}

impl CurveBinding {
    pub fn new(path: NodePath, property: impl Into<String>) -> Self {
        Self {
            path,
            property: property.into(),
        }
    }

    /// Binding for a node's active toggle.
    pub fn node_active(path: NodePath) -> Self {
        Self::new(path, ACTIVE_PROP)
    }

    /// Binding that writes an animator parameter directly (root path).
    pub fn animator_param(name: &str) -> Self {
        Self::new(NodePath::root(), name)
    }

    /// Pass-through bindings resolve against an externally-supplied
    /// animation set rather than the rig itself.
    pub fn is_proxy(&self) -> bool {
        self.path.segments().first().map(String::as_str) == Some(PROXY_SEGMENT)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectKeyframe {
    pub time: f32,
    /// Opaque asset reference (resolved by the packaging pipeline).
    pub value: String,
}

/// A generated animation clip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    pub float_curves: Vec<(CurveBinding, Vec<Keyframe>)>,
    pub object_curves: Vec<(CurveBinding, Vec<ObjectKeyframe>)>,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Replace (or insert) the float curve for `binding`.
    pub fn set_curve(&mut self, binding: CurveBinding, keys: Vec<Keyframe>) {
        if let Some((_, existing)) = self.float_curves.iter_mut().find(|(b, _)| *b == binding) {
            *existing = keys;
        } else {
            self.float_curves.push((binding, keys));
        }
    }

    /// Single keyframe at time zero.
    pub fn set_constant(&mut self, binding: CurveBinding, value: f32) {
        self.set_curve(binding, vec![Keyframe::new(0.0, value)]);
    }

    /// Toggle a node on or off for the duration of the clip.
    pub fn enable(&mut self, path: NodePath, active: bool) {
        self.set_constant(
            CurveBinding::node_active(path),
            if active { 1.0 } else { 0.0 },
        );
    }

    pub fn set_object_curve(&mut self, binding: CurveBinding, keys: Vec<ObjectKeyframe>) {
        if let Some((_, existing)) = self.object_curves.iter_mut().find(|(b, _)| *b == binding) {
            *existing = keys;
        } else {
            self.object_curves.push((binding, keys));
        }
    }

    pub fn float_curve(&self, binding: &CurveBinding) -> Option<&[Keyframe]> {
        self.float_curves
            .iter()
            .find(|(b, _)| b == binding)
            .map(|(_, keys)| keys.as_slice())
    }

    pub fn object_curve(&self, binding: &CurveBinding) -> Option<&[ObjectKeyframe]> {
        self.object_curves
            .iter()
            .find(|(b, _)| b == binding)
            .map(|(_, keys)| keys.as_slice())
    }

    /// All bindings in insertion order, float curves first.
    pub fn bindings(&self) -> impl Iterator<Item = &CurveBinding> {
        self.float_curves
            .iter()
            .map(|(b, _)| b)
            .chain(self.object_curves.iter().map(|(b, _)| b))
    }

    pub fn is_empty(&self) -> bool {
        self.float_curves.is_empty() && self.object_curves.is_empty()
    }

    /// Distinct keyframe times across all curves, ascending.
    pub fn key_times(&self) -> Vec<f32> {
        let mut times: Vec<f32> = Vec::new();
        let mut push = |t: f32| {
            if !times.iter().any(|x| *x == t) {
                times.push(t);
            }
        };
        for (_, keys) in &self.float_curves {
            for k in keys {
                push(k.time);
            }
        }
        for (_, keys) in &self.object_curves {
            for k in keys {
                push(k.time);
            }
        }
        times.sort_by(f32::total_cmp);
        times
    }
}
