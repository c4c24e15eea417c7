//! State-machine graph model and the `FxGraph` sink.
//!
//! `FxGraph` owns everything a synthesis pass produces: parameters, clips,
//! blend trees, layers and the menu tree. Storage is arena-style `Vec`s
//! addressed by newtype ids; insertion order is deterministic and part of
//! the artifact. `StateId` is local to its owning layer (transitions never
//! cross layers; cross-layer effects go through drive actions on shared
//! parameters).

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::menu::MenuTree;
use crate::value::{ParamKind, ParamValue};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ParamId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u32);

/// Index of a state within its owning layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

/// A declared animator parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: ParamValue,
    /// Synced parameters replicate to remote viewers.
    pub synced: bool,
}

/// One boolean condition over a parameter.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cond {
    BoolIs(ParamId, bool),
    /// Strictly greater than the threshold.
    FloatAbove(ParamId, f32),
    /// Not greater than the threshold.
    FloatAtMost(ParamId, f32),
    Never,
}

impl Cond {
    fn negated(self) -> Option<Cond> {
        match self {
            Cond::BoolIs(p, b) => Some(Cond::BoolIs(p, !b)),
            Cond::FloatAbove(p, t) => Some(Cond::FloatAtMost(p, t)),
            Cond::FloatAtMost(p, t) => Some(Cond::FloatAbove(p, t)),
            // not(Never) is Always, which has no atom form
            Cond::Never => None,
        }
    }
}

/// Conjunction of conditions. An empty conjunction is always true.
/// Disjunction is expressed as multiple transitions to the same target,
/// so negating a guard yields one guard per negated atom (De Morgan).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub all: Vec<Cond>,
}

impl Guard {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn never() -> Self {
        Self {
            all: vec![Cond::Never],
        }
    }

    pub fn when(cond: Cond) -> Self {
        Self { all: vec![cond] }
    }

    pub fn and(mut self, cond: Cond) -> Self {
        self.all.push(cond);
        self
    }

    pub fn is_always(&self) -> bool {
        self.all.is_empty()
    }

    /// Negate the conjunction into a list of alternative guards.
    pub fn negate(&self) -> Vec<Guard> {
        if self.all.is_empty() {
            return vec![Guard::never()];
        }
        let mut out = Vec::new();
        for cond in &self.all {
            match cond.negated() {
                Some(neg) => out.push(Guard::when(neg)),
                // One atom was Never, so the negation is always true.
                None => return vec![Guard::always()],
            }
        }
        out
    }

    /// Evaluate against a parameter environment.
    pub fn eval(&self, read: &dyn Fn(ParamId) -> ParamValue) -> bool {
        self.all.iter().all(|cond| match *cond {
            Cond::BoolIs(p, b) => read(p).as_bool() == b,
            Cond::FloatAbove(p, t) => read(p).as_float() > t,
            Cond::FloatAtMost(p, t) => read(p).as_float() <= t,
            Cond::Never => false,
        })
    }
}

/// Side-effecting parameter write executed on state entry.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriveAction {
    pub param: ParamId,
    pub value: ParamValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub to: StateId,
    pub guard: Guard,
    /// Fraction of the state's motion to hold before the transition may
    /// fire; used for timed unconditional fallbacks.
    pub exit_time: Option<f32>,
}

impl Transition {
    pub fn when(to: StateId, guard: Guard) -> Self {
        Self {
            to,
            guard,
            exit_time: None,
        }
    }

    pub fn after(to: StateId, exit_time: f32) -> Self {
        Self {
            to,
            guard: Guard::always(),
            exit_time: Some(exit_time),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendKind {
    Simple1D,
    FreeformCartesian2D,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Clip(ClipId),
    Tree(TreeId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeChild {
    pub motion: Motion,
    /// Blend-space position; Simple1D reads only the x component.
    pub position: [f32; 2],
}

/// Parametric node interpolating among child motions by one or two
/// continuous inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendTree {
    pub name: String,
    pub kind: BlendKind,
    pub param_x: ParamId,
    pub param_y: Option<ParamId>,
    pub children: Vec<TreeChild>,
}

/// Role tag attached to arbitration states so the produced graph stays
/// inspectable after synthesis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateTag {
    Start,
    Stopped,
    Stopping,
    RemoteTrap,
    TriggerOn(usize),
    TriggerOff(usize),
    Comparison(usize, usize),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub motion: Option<Motion>,
    /// When set, the motion's internal playback position is driven by this
    /// parameter instead of wall time.
    pub motion_time: Option<ParamId>,
    pub drives: Vec<DriveAction>,
    pub transitions: Vec<Transition>,
    pub tag: Option<StateTag>,
}

impl State {
    pub fn drive(&mut self, param: ParamId, value: ParamValue) {
        self.drives.push(DriveAction { param, value });
    }

    pub fn transition(&mut self, t: Transition) {
        self.transitions.push(t);
    }
}

/// An independently evaluated parallel state machine track.
///
/// `dispatch` is the priority cascade: an ordered `(guard, target)` list
/// evaluated top-down on every tick, independent of the current state; the
/// first satisfied guard wins. The last entry is expected to be an
/// unconditional fallback. Layers without a cascade use per-state
/// transitions only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub states: Vec<State>,
    pub dispatch: Vec<(Guard, StateId)>,
}

impl Layer {
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0 as usize]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.0 as usize]
    }

    /// First state carrying the given tag, in declaration order.
    pub fn find_tagged(&self, tag: StateTag) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.tag == Some(tag))
            .map(|i| StateId(i as u32))
    }
}

/// The in-memory state-machine sink: everything one synthesis pass emits.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FxGraph {
    pub params: Vec<Param>,
    pub clips: Vec<Clip>,
    pub trees: Vec<BlendTree>,
    pub layers: Vec<Layer>,
    pub menu: MenuTree,
}

impl FxGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_param(&mut self, name: &str, kind: ParamKind, default: ParamValue, synced: bool) -> ParamId {
        if let Some(idx) = self.params.iter().position(|p| p.name == name) {
            debug_assert_eq!(self.params[idx].kind, kind, "parameter kind clash: {name}");
            return ParamId(idx as u32);
        }
        self.params.push(Param {
            name: name.to_string(),
            kind,
            default,
            synced,
        });
        ParamId((self.params.len() - 1) as u32)
    }

    /// Declare (or fetch) a boolean parameter.
    pub fn new_bool(&mut self, name: &str, synced: bool) -> ParamId {
        self.new_param(name, ParamKind::Bool, ParamValue::Bool(false), synced)
    }

    /// Declare (or fetch) a float parameter.
    pub fn new_float(&mut self, name: &str, synced: bool) -> ParamId {
        self.new_param(name, ParamKind::Float, ParamValue::Float(0.0), synced)
    }

    pub fn param(&self, id: ParamId) -> &Param {
        &self.params[id.0 as usize]
    }

    pub fn find_param(&self, name: &str) -> Option<ParamId> {
        self.params
            .iter()
            .position(|p| p.name == name)
            .map(|i| ParamId(i as u32))
    }

    pub fn new_clip(&mut self, name: &str) -> ClipId {
        self.add_clip(Clip::new(name))
    }

    /// Adopt an externally-built clip into the graph.
    pub fn add_clip(&mut self, clip: Clip) -> ClipId {
        self.clips.push(clip);
        ClipId((self.clips.len() - 1) as u32)
    }

    pub fn find_clip(&self, name: &str) -> Option<ClipId> {
        self.clips
            .iter()
            .position(|c| c.name == name)
            .map(|i| ClipId(i as u32))
    }

    pub fn clip(&self, id: ClipId) -> &Clip {
        &self.clips[id.0 as usize]
    }

    pub fn clip_mut(&mut self, id: ClipId) -> &mut Clip {
        &mut self.clips[id.0 as usize]
    }

    pub fn new_tree(&mut self, tree: BlendTree) -> TreeId {
        self.trees.push(tree);
        TreeId((self.trees.len() - 1) as u32)
    }

    pub fn tree(&self, id: TreeId) -> &BlendTree {
        &self.trees[id.0 as usize]
    }

    pub fn new_layer(&mut self, name: &str) -> LayerId {
        self.layers.push(Layer {
            name: name.to_string(),
            ..Default::default()
        });
        LayerId((self.layers.len() - 1) as u32)
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.0 as usize]
    }

    pub fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        &mut self.layers[id.0 as usize]
    }

    pub fn find_layer(&self, name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .position(|l| l.name == name)
            .map(|i| LayerId(i as u32))
    }

    pub fn new_state(&mut self, layer: LayerId, name: &str) -> StateId {
        let states = &mut self.layers[layer.0 as usize].states;
        states.push(State {
            name: name.to_string(),
            ..Default::default()
        });
        StateId((states.len() - 1) as u32)
    }

    pub fn state(&self, layer: LayerId, state: StateId) -> &State {
        self.layer(layer).state(state)
    }

    pub fn state_mut(&mut self, layer: LayerId, state: StateId) -> &mut State {
        self.layer_mut(layer).state_mut(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_declaration_dedupes_by_name() {
        let mut fx = FxGraph::new();
        let a = fx.new_bool("stealth", true);
        let b = fx.new_bool("stealth", true);
        assert_eq!(a, b);
        assert_eq!(fx.params.len(), 1);
    }

    #[test]
    fn guard_negation_demorgan() {
        let p = ParamId(0);
        let q = ParamId(1);
        let g = Guard::when(Cond::BoolIs(p, true)).and(Cond::FloatAbove(q, 0.5));
        let neg = g.negate();
        assert_eq!(neg.len(), 2);
        assert_eq!(neg[0], Guard::when(Cond::BoolIs(p, false)));
        assert_eq!(neg[1], Guard::when(Cond::FloatAtMost(q, 0.5)));
        assert_eq!(Guard::always().negate(), vec![Guard::never()]);
    }

    #[test]
    fn guard_eval_conjunction() {
        let p = ParamId(0);
        let q = ParamId(1);
        let g = Guard::when(Cond::BoolIs(p, true)).and(Cond::FloatAbove(q, 0.51));
        // Exactly at the threshold is not strictly above it.
        let env = |id: ParamId| {
            if id == p {
                ParamValue::Bool(true)
            } else {
                ParamValue::Float(0.51)
            }
        };
        assert!(!g.eval(&env));
        let env2 = |id: ParamId| {
            if id == p {
                ParamValue::Bool(true)
            } else {
                ParamValue::Float(0.52)
            }
        };
        assert!(g.eval(&env2));
    }
}
