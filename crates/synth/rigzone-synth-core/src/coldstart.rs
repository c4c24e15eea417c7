//! Cold-start suppression.
//!
//! Receivers that load already touching an emitter report zero proximity
//! until they are cycled. The suppression layer force-disables every such
//! receiver for exactly one evaluation tick after scene entry, then
//! re-enables whatever the managed-enable policy requires.

use rigzone_api_core::{FxGraph, LayerId, Motion, NodePath, Transition};

/// Build the suppression layer, or skip it when nothing needs it.
pub fn build_cold_start(
    fx: &mut FxGraph,
    suppress: &[NodePath],
    force_enable: &[NodePath],
) -> Option<LayerId> {
    if suppress.is_empty() {
        return None;
    }

    let layer = fx.new_layer("Cold Start Suppression");
    let off = fx.new_state(layer, "Off");
    let on = fx.new_state(layer, "On");

    let first_frame = fx.new_clip("Load (First Frame)");
    for path in suppress {
        fx.clip_mut(first_frame).enable(path.clone(), false);
    }
    fx.state_mut(layer, off).motion = Some(Motion::Clip(first_frame));
    // Hold the first-frame pose for one tick, then leave unconditionally.
    fx.state_mut(layer, off)
        .transition(Transition::after(on, 1.0));

    let on_clip = fx.new_clip("Load (On)");
    for path in force_enable {
        fx.clip_mut(on_clip).enable(path.clone(), true);
    }
    fx.state_mut(layer, on).motion = Some(Motion::Clip(on_clip));

    Some(layer)
}
