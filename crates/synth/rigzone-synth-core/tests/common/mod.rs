#![allow(dead_code)]

use rigzone_api_core::{
    BlendKind, FxGraph, Layer, LayerId, Motion, NodePath, ParamId, ParamValue, StateId,
};
use rigzone_synth_core::{
    BakeRoot, BoneRow, Placement, ReceiverKind, ReceiverSpec, RigService, SkeletonIndex,
    SynthError, Zone, ZoneKind,
};

/// One receiver request as the rig service saw it.
#[derive(Clone, Debug)]
pub struct ReceiverRecord {
    pub path: NodePath,
    pub param: String,
    pub label: String,
    pub offset: f32,
    pub radius: f32,
    pub allow_self: bool,
    pub kind: ReceiverKind,
}

/// Deterministic in-memory rig: bakes every zone under
/// `<placement>/Zone_<name>` with the full group set and one contact
/// receiver node, and records everything it is asked to do.
#[derive(Default)]
pub struct TestRig {
    pub receivers: Vec<ReceiverRecord>,
    pub initial_active: Vec<(NodePath, bool)>,
}

impl RigService for TestRig {
    fn bake_zone(
        &mut self,
        _zone: &Zone,
        name: &str,
        placement: &NodePath,
    ) -> Result<BakeRoot, SynthError> {
        let root = placement.child(&format!("Zone_{name}"));
        let receivers = root.child("Receivers");
        Ok(BakeRoot {
            emitters: Some(root.child("Emitters")),
            receivers: Some(receivers.clone()),
            visuals: Some(root.child("Visuals")),
            local_marker: Some(root.child("LocalMarker")),
            beacon: Some(root.child("Beacon")),
            receiver_nodes: vec![receivers.child("Contact")],
            root,
        })
    }

    fn add_receiver(&mut self, root: &BakeRoot, spec: &ReceiverSpec<'_>) -> NodePath {
        let path = root.root.child(spec.label);
        self.receivers.push(ReceiverRecord {
            path: path.clone(),
            param: spec.param.to_string(),
            label: spec.label.to_string(),
            offset: spec.offset,
            radius: spec.radius,
            allow_self: spec.allow_self,
            kind: spec.kind,
        });
        path
    }

    fn set_initial_active(&mut self, path: &NodePath, active: bool) {
        self.initial_active.push((path.clone(), active));
    }
}

pub fn skeleton() -> SkeletonIndex {
    fn row(path: &str, parent: Option<&str>) -> BoneRow {
        let path = NodePath::parse(path).unwrap();
        BoneRow {
            name: path.name().unwrap().to_string(),
            parent: parent.map(str::to_string),
            path,
        }
    }
    SkeletonIndex::from_rows(vec![
        row("Armature", None),
        row("Armature/Hips", Some("Armature")),
        row("Armature/Hips/Spine", Some("Hips")),
        row("Armature/Hips/Spine/Chest", Some("Spine")),
    ])
}

pub fn menu_zone(name: &str) -> Zone {
    let mut zone = Zone::new(
        name,
        ZoneKind::Hole,
        Placement::Node(NodePath::parse("Armature/Hips").unwrap()),
    );
    zone.add_menu_item = true;
    zone
}

pub fn auto_zone(name: &str) -> Zone {
    let mut zone = menu_zone(name);
    zone.enable_auto = true;
    zone
}

/// Single-layer interpreter for transition-driven layers.
///
/// Each `step` models one evaluation tick: blend outputs are refreshed
/// from the current parameter values, the first open transition fires and
/// the entered state's drives are applied. A two-child freeform blend
/// over constant clips 0 and 1 is modeled as `y / (x + y)`, the second
/// input's share of the combined reading.
pub struct LayerSim<'a> {
    fx: &'a FxGraph,
    layer: &'a Layer,
    pub values: Vec<ParamValue>,
    pub at: StateId,
}

impl<'a> LayerSim<'a> {
    pub fn new(fx: &'a FxGraph, layer: LayerId, at: StateId) -> Self {
        Self {
            fx,
            layer: fx.layer(layer),
            values: fx.params.iter().map(|p| p.default).collect(),
            at,
        }
    }

    pub fn set(&mut self, param: ParamId, value: ParamValue) {
        self.values[param.0 as usize] = value;
    }

    pub fn state_name(&self) -> &str {
        &self.layer.state(self.at).name
    }

    fn read(&self, param: ParamId) -> ParamValue {
        self.values[param.0 as usize]
    }

    fn write_blend_outputs(&mut self) {
        let Some(Motion::Tree(tree_id)) = self.layer.state(self.at).motion else {
            return;
        };
        let tree = self.fx.tree(tree_id);
        if tree.kind != BlendKind::FreeformCartesian2D {
            return;
        }
        let x = self.read(tree.param_x).as_float();
        let y = tree.param_y.map(|p| self.read(p).as_float()).unwrap_or(0.0);
        let out = if x + y > 0.0 { y / (x + y) } else { 0.0 };
        // The constant children all write the same output parameter; read
        // its name off the first child's clip.
        if let Some(Motion::Clip(clip)) = tree.children.first().map(|c| c.motion) {
            if let Some((binding, _)) = self.fx.clip(clip).float_curves.first() {
                if let Some(param) = self.fx.find_param(&binding.property) {
                    self.set(param, ParamValue::Float(out));
                }
            }
        }
    }

    /// Returns false when no transition fires (the layer is at rest).
    pub fn step(&mut self) -> bool {
        self.write_blend_outputs();
        let values = self.values.clone();
        let read = |p: ParamId| values[p.0 as usize];
        let state = self.layer.state(self.at);
        for t in &state.transitions {
            if t.guard.eval(&read) {
                self.at = t.to;
                for d in &self.layer.state(self.at).drives {
                    self.values[d.param.0 as usize] = d.value;
                }
                return true;
            }
        }
        false
    }
}
