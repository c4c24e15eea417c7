//! Depth-driven blend animation per declared zone action.

use rigzone_api_core::{
    BlendKind, BlendTree, Cond, FxGraph, Guard, Motion, Transition, TreeChild,
};

use crate::clip_algebra::is_static;
use crate::descriptors::Zone;
use crate::names::NameRegistry;
use crate::rig::{BakeRoot, ReceiverKind, ReceiverSpec, RigService};

/// Shared do-nothing pose used as the zero end of static-pose blends.
const NOOP_CLIP: &str = "noop";

fn noop_clip(fx: &mut FxGraph) -> rigzone_api_core::ClipId {
    match fx.find_clip(NOOP_CLIP) {
        Some(id) => id,
        None => fx.new_clip(NOOP_CLIP),
    }
}

/// Attach one 2-state layer per well-formed depth action: a boolean
/// contact gate at the minimum-depth boundary plus a continuous distance
/// sensor over the action's range, gating a depth-driven motion.
///
/// Static source clips become a 1-D blend between a no-op pose and the
/// clip's pose; clips with authored internal motion keep it by having
/// their playback position remapped to the depth fraction instead.
pub fn attach_depth_actions(
    fx: &mut FxGraph,
    zone: &Zone,
    name: &str,
    bake: &BakeRoot,
    rig: &mut dyn RigService,
    names: &mut NameRegistry,
) {
    for (idx, action) in zone.depth_actions.iter().enumerate() {
        let action_num = idx + 1;
        if action.clip.is_empty() {
            continue;
        }
        let (min, max) = match action.effective_range(zone.depth_limit) {
            Some(range) => range,
            None => continue,
        };
        let length = max - min;
        let prefix = format!("{name}{action_num}");

        let contacting_name = names.claim(&format!("{prefix}/AnimContacting"));
        let contacting = fx.new_bool(&contacting_name, false);
        rig.add_receiver(
            bake,
            &ReceiverSpec {
                offset: min,
                param: &contacting_name,
                label: &format!("AnimRoot{action_num}"),
                radius: 0.01,
                allow_self: action.allow_self,
                kind: ReceiverKind::Constant,
            },
        );

        let depth_name = names.claim(&format!("{prefix}/AnimDepth"));
        let depth = fx.new_float(&depth_name, false);
        rig.add_receiver(
            bake,
            &ReceiverSpec {
                offset: min + length,
                param: &depth_name,
                label: &format!("AnimInside{action_num}"),
                radius: length,
                allow_self: action.allow_self,
                kind: ReceiverKind::Proximity,
            },
        );

        let layer = fx.new_layer(&format!("Depth Animation {action_num} for {name}"));
        let off = fx.new_state(layer, "Off");
        let on = fx.new_state(layer, "On");

        let mut source = action.clip.clone();
        source.name = prefix.clone();
        let clip_id = fx.add_clip(source);

        if is_static(&action.clip) {
            let noop = noop_clip(fx);
            let tree = fx.new_tree(BlendTree {
                name: format!("{prefix} tree"),
                kind: BlendKind::Simple1D,
                param_x: depth,
                param_y: None,
                children: vec![
                    TreeChild {
                        motion: Motion::Clip(noop),
                        position: [0.0, 0.0],
                    },
                    TreeChild {
                        motion: Motion::Clip(clip_id),
                        position: [1.0, 0.0],
                    },
                ],
            });
            fx.state_mut(layer, on).motion = Some(Motion::Tree(tree));
        } else {
            let state = fx.state_mut(layer, on);
            state.motion = Some(Motion::Clip(clip_id));
            state.motion_time = Some(depth);
        }

        let on_when = Guard::when(Cond::FloatAbove(depth, 0.0)).and(Cond::BoolIs(contacting, true));
        fx.state_mut(layer, off)
            .transition(Transition::when(on, on_when.clone()));
        for guard in on_when.negate() {
            fx.state_mut(layer, on)
                .transition(Transition::when(off, guard));
        }
    }
}
