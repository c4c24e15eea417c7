//! Compiler passes that turn a declarative list of proximity zones into
//! the layered animation state machine described by `rigzone-api-core`.
//!
//! The entry point is [`builder::synthesize`]; the other modules are the
//! individual passes it runs, in order: name claiming, per-zone baking,
//! depth actions, exclusivity wiring, auto arbitration and cold-start
//! suppression.

pub mod baker;
pub mod builder;
pub mod clip_algebra;
pub mod coldstart;
pub mod depth;
pub mod descriptors;
pub mod error;
pub mod exclusivity;
pub mod names;
pub mod rig;
pub mod skeleton;
pub mod tournament;

pub use baker::{AutoEntry, GlobalToggles, ZoneArtifacts};
pub use builder::{synthesize, SynthOptions};
pub use clip_algebra::{is_empty_motion, is_static, merge_single_frame, split_range, BindingDefaults};
pub use descriptors::{DepthAction, Placement, Zone, ZoneKind, DEFAULT_DEPTH_SPAN};
pub use error::SynthError;
pub use names::NameRegistry;
pub use rig::{BakeRoot, ReceiverKind, ReceiverSpec, RigService};
pub use skeleton::{BoneRow, NodeScope, SkeletonIndex};
pub use tournament::HANDOFF_THRESHOLD;
