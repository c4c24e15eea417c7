//! rigzone-api-core: shared data model for rigzone build artifacts.
//!
//! This crate defines the node-path grammar, the keyframed clip model, and
//! the state-machine graph (parameters, layers, states, transitions, guards,
//! drive actions, blend trees) that the synthesis passes write into. It is
//! the in-memory form of the "sink" consumed by downstream packaging; it
//! carries no synthesis logic of its own.

pub mod clip;
pub mod machine;
pub mod menu;
pub mod path;
pub mod value;

pub use clip::{Clip, CurveBinding, Keyframe, ObjectKeyframe};
pub use machine::{
    BlendKind, BlendTree, Cond, DriveAction, FxGraph, Guard, Layer, Motion, Param, State, StateTag,
    Transition, TreeChild,
};
pub use machine::{ClipId, LayerId, ParamId, StateId, TreeId};
pub use menu::{MenuItem, MenuPath, MenuTree};
pub use path::{NodePath, PathError};
pub use value::{ParamKind, ParamValue};
